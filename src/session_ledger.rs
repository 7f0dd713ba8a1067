//! Session ledger: what this interaction has produced so far.
//!
//! Stored as `current_session.json` inside the state directory. The file is
//! read once at startup and rewritten in full after every task. There is no
//! locking; two processes sharing a state directory overwrite each other.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::contexts::WorkflowResult;

const SESSION_FILE: &str = "current_session.json";
const PROMPT_PREVIEW_CHARS: usize = 100;
const CONTEXT_FILE_COUNT: usize = 5;

/// One submitted task and what came back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub prompt: String,
    pub result: WorkflowResult,
    /// RFC 3339, local time
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLedger {
    #[serde(default)]
    pub messages: Vec<MessageEntry>,
    #[serde(default)]
    pub files_created: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    #[serde(default)]
    pub project_context: String,
    #[serde(default)]
    pub current_working_dir: String,
    #[serde(default)]
    pub session_start: String,
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::blank()
    }
}

impl SessionLedger {
    /// A fresh ledger stamped with the working directory and start time.
    pub fn blank() -> Self {
        Self {
            messages: Vec::new(),
            files_created: Vec::new(),
            files_modified: Vec::new(),
            project_context: String::new(),
            current_working_dir: std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            session_start: chrono::Local::now().to_rfc3339(),
        }
    }

    /// Loads the ledger from `state_dir`, falling back to a blank one when
    /// the file is missing, unreadable, or corrupt.
    pub fn load(state_dir: &Path) -> Self {
        let path = Self::session_path(state_dir);
        if !path.exists() {
            debug!("No session file at {}, starting blank", path.display());
            return Self::blank();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read session file {}: {}, starting fresh", path.display(), e);
                return Self::blank();
            }
        };

        match serde_json::from_str(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!("Current session file corrupted ({}), starting fresh", e);
                Self::blank()
            }
        }
    }

    /// Writes the whole ledger to `state_dir`.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)
            .with_context(|| format!("Failed to create state directory {}", state_dir.display()))?;

        let path = Self::session_path(state_dir);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize session ledger")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;

        Ok(())
    }

    /// Copies the persisted session to a timestamped file next to it.
    /// Returns `None` when there is nothing persisted yet.
    pub fn archive(state_dir: &Path) -> Result<Option<PathBuf>> {
        let current = Self::session_path(state_dir);
        if !current.exists() {
            return Ok(None);
        }

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archive = state_dir.join(format!("session_{}.json", stamp));
        fs::copy(&current, &archive)
            .with_context(|| format!("Failed to archive session to {}", archive.display()))?;

        info!("Session archived to {}", archive.display());
        Ok(Some(archive))
    }

    /// Archives and deletes the persisted session, then blanks `self`.
    pub fn reset(&mut self, state_dir: &Path) -> Result<Option<PathBuf>> {
        let archived = Self::archive(state_dir)?;
        let current = Self::session_path(state_dir);
        if current.exists() {
            fs::remove_file(&current)
                .with_context(|| format!("Failed to remove {}", current.display()))?;
        }
        *self = Self::blank();
        info!("Session reset - starting fresh");
        Ok(archived)
    }

    pub fn session_path(state_dir: &Path) -> PathBuf {
        state_dir.join(SESSION_FILE)
    }

    pub fn record_created(&mut self, path: impl Into<String>) {
        self.files_created.push(path.into());
    }

    pub fn record_modified(&mut self, path: impl Into<String>) {
        self.files_modified.push(path.into());
    }

    pub fn record_message(&mut self, prompt: &str, result: WorkflowResult) {
        self.messages.push(MessageEntry {
            prompt: prompt.to_string(),
            result,
            timestamp: chrono::Local::now().to_rfc3339(),
        });
    }

    /// Regenerates the project summary from the created-files list.
    /// Leaves it untouched while nothing has been created.
    pub fn update_project_context(&mut self) {
        if self.files_created.is_empty() {
            return;
        }
        let start = self.files_created.len().saturating_sub(CONTEXT_FILE_COUNT);
        self.project_context = format!(
            "Working on project with {} file(s): {}",
            self.files_created.len(),
            self.files_created[start..].join(", ")
        );
    }

    /// Summary of the session for prepending to the next prompt.
    ///
    /// Empty when the ledger holds nothing worth mentioning.
    pub fn build_context(&self, recent_limit: usize) -> String {
        let mut parts = Vec::new();

        if !self.project_context.is_empty() {
            parts.push(format!("PROJECT CONTEXT:\n{}\n", self.project_context));
        }

        let start = self.messages.len().saturating_sub(recent_limit);
        let recent = &self.messages[start..];
        if !recent.is_empty() {
            parts.push("RECENT WORK:".to_string());
            for message in recent {
                let preview: String = message.prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
                parts.push(format!("- {}", preview));
            }
        }

        if !self.files_created.is_empty() {
            parts.push(format!(
                "\nFILES CREATED THIS SESSION:\n{}",
                self.files_created.join("\n")
            ));
        }

        parts.join("\n")
    }

    /// `prompt` with the session context in front of it, if there is any.
    pub fn contextualize(&self, prompt: &str, recent_limit: usize) -> String {
        let context = self.build_context(recent_limit);
        if context.is_empty() {
            prompt.to_string()
        } else {
            format!("{}\n\nCURRENT TASK:\n{}", context, prompt)
        }
    }
}
