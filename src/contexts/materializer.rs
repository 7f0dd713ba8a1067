use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::file_manager;
use crate::data::{ActionResult, PlannedAction};

/// Per-action results of one plan application
#[derive(Debug, Default)]
pub struct MaterializationReport {
    pub results: Vec<ActionResult>,
    pub elapsed: Duration,
}

impl MaterializationReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Resolved paths of every file written successfully, in write order.
    pub fn written_files(&self) -> Vec<&Path> {
        self.results.iter().filter_map(|r| r.written_file()).collect()
    }
}

/// Applies planned actions to the filesystem.
///
/// Relative `WriteFile` paths resolve against the working directory the
/// materializer was built with.
#[derive(Debug, Clone)]
pub struct Materializer {
    working_dir: PathBuf,
}

impl Materializer {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn in_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Runs every `MakeDirectory` first, then every `WriteFile`, each in
    /// plan order. A failed action is logged and recorded; later actions
    /// still run.
    pub fn apply(&self, plan: &[PlannedAction]) -> MaterializationReport {
        let start = Instant::now();
        let ordered = plan
            .iter()
            .filter(|a| a.is_make_directory())
            .chain(plan.iter().filter(|a| !a.is_make_directory()));

        let results = ordered.map(|action| self.apply_one(action)).collect();

        MaterializationReport {
            results,
            elapsed: start.elapsed(),
        }
    }

    fn apply_one(&self, action: &PlannedAction) -> ActionResult {
        let outcome = match action {
            PlannedAction::MakeDirectory { path } => {
                let resolved = self.resolve(path);
                file_manager::create_dir(&resolved).map(|_| resolved)
            }
            PlannedAction::WriteFile {
                path,
                content,
                overwrite,
            } => {
                let resolved = self.resolve(path);
                file_manager::create_file(&resolved, content, *overwrite).map(|_| resolved)
            }
        };

        match (&outcome, action) {
            (Ok(path), PlannedAction::MakeDirectory { .. }) => {
                info!("Created directory: {}", path.display());
            }
            (Ok(path), PlannedAction::WriteFile { .. }) => {
                info!("Auto-created file: {}", path.display());
            }
            (Err(e), _) => {
                error!("Failed to {}: {}", action.describe(), e);
            }
        }

        ActionResult {
            action: action.clone(),
            outcome,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ActionFailure;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: impl Into<PathBuf>, content: &str, overwrite: bool) -> PlannedAction {
        PlannedAction::WriteFile {
            path: path.into(),
            content: content.to_string(),
            overwrite,
        }
    }

    #[test]
    fn directories_run_before_writes() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Calc");
        let plan = vec![
            write(dir.join("main.py"), "print(1)", true),
            PlannedAction::MakeDirectory { path: dir.clone() },
        ];

        let report = Materializer::new(temp.path()).apply(&plan);

        assert!(report.results[0].action.is_make_directory());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(fs::read_to_string(dir.join("main.py")).unwrap(), "print(1)");
    }

    #[test]
    fn relative_writes_land_in_working_dir() {
        let temp = TempDir::new().unwrap();
        let report = Materializer::new(temp.path()).apply(&[write("file_0.py", "x = 1", true)]);

        assert_eq!(report.written_files(), vec![temp.path().join("file_0.py").as_path()]);
        assert_eq!(fs::read_to_string(temp.path().join("file_0.py")).unwrap(), "x = 1");
    }

    #[test]
    fn failure_does_not_stop_the_batch() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("taken.py"), "original").unwrap();
        fs::write(temp.path().join("blocker"), "a file, not a dir").unwrap();

        let plan = vec![
            write("taken.py", "new", false),
            write("blocker/inner.py", "nope", true),
            write("ok.py", "fine", true),
        ];
        let report = Materializer::new(temp.path()).apply(&plan);

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.results[0].outcome,
            Err(ActionFailure::AlreadyExists { .. })
        ));
        assert!(report.results[1].outcome.is_err());
        assert!(report.results[2].is_success());
        assert_eq!(fs::read_to_string(temp.path().join("taken.py")).unwrap(), "original");
        assert_eq!(fs::read_to_string(temp.path().join("ok.py")).unwrap(), "fine");
    }

    #[test]
    fn reapplying_is_idempotent_and_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("proj");
        let materializer = Materializer::new(temp.path());

        let first = vec![
            PlannedAction::MakeDirectory { path: dir.clone() },
            write(dir.join("app.py"), "v1", true),
        ];
        assert_eq!(materializer.apply(&first).failed(), 0);
        assert_eq!(materializer.apply(&first).failed(), 0);
        assert_eq!(fs::read_to_string(dir.join("app.py")).unwrap(), "v1");

        let second = vec![
            PlannedAction::MakeDirectory { path: dir.clone() },
            write(dir.join("app.py"), "v2", true),
        ];
        assert_eq!(materializer.apply(&second).failed(), 0);
        assert_eq!(fs::read_to_string(dir.join("app.py")).unwrap(), "v2");
    }

    #[test]
    fn empty_plan_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let report = Materializer::new(temp.path()).apply(&[]);
        assert!(report.results.is_empty());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
