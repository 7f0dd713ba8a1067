//! Runtime configuration.
//!
//! Defaults, then an optional `cliagent.yml` in the working directory, then
//! environment variables (a `.env` file is loaded first if present).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cliagent.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Base URL of the Ollama server
    pub ollama_host: String,
    pub default_model: String,
    /// Where the session ledger lives
    pub state_dir: PathBuf,
    pub generate_timeout_secs: u64,
    /// Timeout for availability probes and model listing
    pub probe_timeout_secs: u64,
    /// How many past prompts go into the context prompt
    pub recent_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ollama_host: "http://localhost:11434".to_string(),
            default_model: "mistral".to_string(),
            state_dir: PathBuf::from("./.agent_state"),
            generate_timeout_secs: 30_000,
            probe_timeout_secs: 5,
            recent_limit: 5,
        }
    }
}

impl AgentConfig {
    /// Loads from the working directory and the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Loads from `path` (if it exists) and the given variable lookup.
    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(env);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(host) = env("OLLAMA_HOST").filter(|v| !v.is_empty()) {
            self.ollama_host = host;
        }
        if let Some(model) = env("DEFAULT_MODEL").filter(|v| !v.is_empty()) {
            self.default_model = model;
        }
        if let Some(dir) = env("STATE_DIR").filter(|v| !v.is_empty()) {
            self.state_dir = PathBuf::from(dir);
        }
    }
}
