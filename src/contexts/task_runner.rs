use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::file_manager;
use super::materializer::{MaterializationReport, Materializer};
use super::plan_reconciler::PlanReconciler;
use super::signal_extractor::extract_signals;
use super::workflow::{single_shot, think_plan_implement, WorkflowResult};
use crate::data::{GenerationBackend, PlannedAction};
use crate::session_ledger::SessionLedger;

/// Errors that end a task before or after generation
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("generation backend is not available at {0}")]
    BackendUnavailable(String),

    #[error("model '{model}' not found. Available: {}", .available.join(", "))]
    UnknownModel {
        model: String,
        available: Vec<String>,
    },

    #[error("task execution failed: {0:#}")]
    Execution(#[source] anyhow::Error),
}

/// Everything one task produced
#[derive(Debug)]
pub struct TaskOutcome {
    pub result: WorkflowResult,
    pub plan: Vec<PlannedAction>,
    /// `None` in dry-run mode
    pub report: Option<MaterializationReport>,
}

/// Snapshot for the status display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub endpoint: String,
    pub model: String,
    pub models_available: usize,
    pub files_created: usize,
    pub files_modified: usize,
    pub messages: usize,
}

/// Task runner owns the session for the lifetime of the process: the
/// backend, the ledger, and the auto-execution pipeline.
pub struct TaskRunner<B: GenerationBackend> {
    backend: B,
    ledger: SessionLedger,
    reconciler: PlanReconciler,
    materializer: Materializer,
    state_dir: PathBuf,
    recent_limit: usize,
    dry_run: bool,
}

impl<B: GenerationBackend> TaskRunner<B> {
    pub fn new(
        backend: B,
        ledger: SessionLedger,
        reconciler: PlanReconciler,
        materializer: Materializer,
        state_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            ledger,
            reconciler,
            materializer,
            state_dir: state_dir.into(),
            recent_limit: 5,
            dry_run: false,
        }
    }

    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Runs one task end to end: availability check, context prompt,
    /// generation, auto-execution, ledger update and flush.
    pub fn execute(&mut self, prompt: &str, use_workflow: bool) -> Result<TaskOutcome, TaskError> {
        let preview: String = prompt.chars().take(50).collect();
        info!("Agent executing: {}...", preview);

        if !self.backend.is_available() {
            error!("Generation backend is not running at {}", self.backend.endpoint());
            return Err(TaskError::BackendUnavailable(
                self.backend.endpoint().to_string(),
            ));
        }

        let context_prompt = self.ledger.contextualize(prompt, self.recent_limit);
        debug!("Context prompt:\n{}", context_prompt);

        let result = if use_workflow {
            think_plan_implement(&context_prompt, &self.backend)
        } else {
            single_shot(&context_prompt, &self.backend)
        };

        let (plan, report) = self.auto_execute(&result.implementation);

        self.ledger.record_message(prompt, result.clone());
        self.ledger.update_project_context();
        self.save().map_err(TaskError::Execution)?;

        Ok(TaskOutcome {
            result,
            plan,
            report,
        })
    }

    /// Extracts, reconciles and (unless dry-running) materialises the plan
    /// hidden in `implementation`. Written files go into the ledger.
    pub fn auto_execute(
        &mut self,
        implementation: &str,
    ) -> (Vec<PlannedAction>, Option<MaterializationReport>) {
        info!("Auto-executing generated code...");

        let signals = extract_signals(implementation);
        if !signals.directories.is_empty() {
            let names: Vec<&str> = signals.directories.iter().map(|d| d.name()).collect();
            info!("Found directories: {}", names.join(", "));
        }
        if !signals.code_blocks.is_empty() {
            info!("Found {} code blocks", signals.code_blocks.len());
        }
        if !signals.filenames.is_empty() {
            let names: Vec<&str> = signals.filenames.iter().map(|f| f.name()).collect();
            info!("Found files: {}", names.join(", "));
        }

        let plan = self.reconciler.reconcile(&signals);

        if self.dry_run {
            for action in &plan {
                info!("[dry-run] would {}", action.describe());
            }
            return (plan, None);
        }

        let report = self.materializer.apply(&plan);
        for path in report.written_files() {
            self.ledger.record_created(path.display().to_string());
        }

        (plan, Some(report))
    }

    /// Creates a file directly and records it.
    pub fn create_file(&mut self, path: &Path, content: &str, overwrite: bool) -> Result<()> {
        file_manager::create_file(path, content, overwrite)?;
        info!("File created: {}", path.display());
        self.ledger.record_created(path.display().to_string());
        self.ledger.update_project_context();
        self.save()
    }

    /// Edits an existing file and records it as modified.
    pub fn edit_file(&mut self, path: &Path, content: &str, append: bool) -> Result<()> {
        file_manager::edit_file(path, content, append)?;
        info!(
            "{}: {}",
            if append { "Content appended to" } else { "File updated" },
            path.display()
        );
        self.ledger.record_modified(path.display().to_string());
        self.save()
    }

    pub fn available_models(&self) -> Vec<String> {
        self.backend.list_models().unwrap_or_else(|e| {
            error!("Failed to list models: {}", e);
            Vec::new()
        })
    }

    /// Switches model only if the backend serves it.
    pub fn set_model(&mut self, model: &str) -> Result<(), TaskError> {
        let available = self.available_models();
        if !available.iter().any(|m| m == model) {
            return Err(TaskError::UnknownModel {
                model: model.to_string(),
                available,
            });
        }
        self.backend.set_model(model);
        info!("Model set to: {}", model);
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            endpoint: self.backend.endpoint().to_string(),
            model: self.backend.model().to_string(),
            models_available: self.available_models().len(),
            files_created: self.ledger.files_created.len(),
            files_modified: self.ledger.files_modified.len(),
            messages: self.ledger.messages.len(),
        }
    }

    /// Archives the session and starts a blank one.
    pub fn reset_session(&mut self) -> Result<Option<PathBuf>> {
        self.ledger.reset(&self.state_dir)
    }

    pub fn save(&self) -> Result<()> {
        self.ledger
            .save(&self.state_dir)
            .context("Failed to save session state")
            .inspect_err(|e| warn!("{:#}", e))
    }
}
