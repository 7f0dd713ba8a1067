use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::data::{BackendError, GenerationBackend};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    host: String,
    model: String,
    client: Client,
    probe_timeout: Duration,
}

impl OllamaClient {
    pub fn new(
        host: &str,
        model: &str,
        generate_timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(generate_timeout)
            .build()
            .map_err(|e| BackendError::Transport {
                url: host.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            probe_timeout,
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, BackendError> {
        Self::new(
            &config.ollama_host,
            &config.default_model,
            Duration::from_secs(config.generate_timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.host)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.host)
    }
}

impl GenerationBackend for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let url = self.generate_url();
        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .map_err(|e| BackendError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| BackendError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_generate_response(&body)
    }

    fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let url = self.tags_url();
        let response = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .map_err(|e| BackendError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| BackendError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_tags_response(&body)
    }

    fn is_available(&self) -> bool {
        match self
            .client
            .get(self.tags_url())
            .timeout(self.probe_timeout)
            .send()
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Ollama not available: {}", e);
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    fn endpoint(&self) -> &str {
        &self.host
    }
}

fn parse_generate_response(body: &str) -> Result<String, BackendError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    Ok(parsed.response.trim().to_string())
}

fn parse_tags_response(body: &str) -> Result<Vec<String>, BackendError> {
    let parsed: TagsResponse =
        serde_json::from_str(body).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    Ok(parsed.models.into_iter().map(|m| m.name).collect())
}
