use thiserror::Error;

/// Errors surfaced by a generation backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("generation backend is not reachable at {0}")]
    Unavailable(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Synchronous text-completion service.
///
/// Implementations block until the backend answers or the request times out.
/// Nothing is assumed about the shape of the generated text.
pub trait GenerationBackend {
    /// Generate a completion for `prompt` with the active model
    fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Names of the models the backend can serve
    fn list_models(&self) -> Result<Vec<String>, BackendError>;

    /// Cheap reachability probe
    fn is_available(&self) -> bool;

    /// Name of the active model
    fn model(&self) -> &str;

    /// Switch the active model without validation
    fn set_model(&mut self, model: &str);

    /// Human-readable location of the backend, for status output
    fn endpoint(&self) -> &str;
}
