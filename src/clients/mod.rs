mod ollama;
mod web;

pub use ollama::OllamaClient;
pub use web::{render_html, WebClient};
