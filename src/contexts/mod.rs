pub mod file_manager;
mod materializer;
mod plan_reconciler;
pub mod signal_extractor;
mod task_runner;
mod workflow;

pub use materializer::{MaterializationReport, Materializer};
pub use plan_reconciler::{mentions_gui_toolkit, PlanReconciler, ToolkitPredicate};
pub use signal_extractor::{
    extract_code_blocks, extract_directories, extract_filenames, extract_signals, Signals,
};
pub use task_runner::{SessionStatus, TaskError, TaskOutcome, TaskRunner};
pub use workflow::{generate_or_empty, single_shot, think_plan_implement, WorkflowResult};
