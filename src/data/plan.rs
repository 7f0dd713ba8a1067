use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One filesystem step produced by the plan reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Recursive, idempotent directory creation
    MakeDirectory { path: PathBuf },
    /// Whole-file write; parents are created as needed
    WriteFile {
        path: PathBuf,
        content: String,
        overwrite: bool,
    },
}

impl PlannedAction {
    pub fn path(&self) -> &Path {
        match self {
            PlannedAction::MakeDirectory { path } => path,
            PlannedAction::WriteFile { path, .. } => path,
        }
    }

    pub fn is_make_directory(&self) -> bool {
        matches!(self, PlannedAction::MakeDirectory { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            PlannedAction::MakeDirectory { path } => format!("mkdir {}", path.display()),
            PlannedAction::WriteFile {
                path,
                content,
                overwrite,
            } => format!(
                "write {} ({} bytes{})",
                path.display(),
                content.len(),
                if *overwrite { ", overwrite" } else { "" }
            ),
        }
    }
}

/// Why a single action failed.
#[derive(Debug, Error)]
pub enum ActionFailure {
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionFailure {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => ActionFailure::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => ActionFailure::AlreadyExists { path },
            io::ErrorKind::InvalidInput
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::IsADirectory => ActionFailure::InvalidPath {
                path,
                reason: err.to_string(),
            },
            _ => ActionFailure::Io { path, source: err },
        }
    }
}

/// Outcome of applying one planned action. `Ok` carries the resolved path.
#[derive(Debug)]
pub struct ActionResult {
    pub action: PlannedAction,
    pub outcome: Result<PathBuf, ActionFailure>,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Resolved path of a file that was written successfully.
    pub fn written_file(&self) -> Option<&Path> {
        match (&self.action, &self.outcome) {
            (PlannedAction::WriteFile { .. }, Ok(path)) => Some(path),
            _ => None,
        }
    }
}
