//! Turns extracted signals into an ordered list of filesystem actions.
//!
//! Placement policy:
//! - no directory mentions: every code block goes to the working directory
//!   (as a relative path);
//! - one or more directories: each becomes a `MakeDirectory` under the
//!   anchor, and every code block is written into the first directory in
//!   set iteration order;
//! - block `i` takes the `i`-th filename mention when there are enough of
//!   them, otherwise a synthesized name.
//!
//! Filename mentions come from an order-losing set, so the pairing of
//! names with blocks can disagree with the text. That mismatch is accepted.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::signal_extractor::Signals;
use crate::data::{CodeBlock, FilenameToken, PlannedAction};

/// Predicate deciding whether a block looks like GUI-toolkit code.
pub type ToolkitPredicate = fn(&str) -> bool;

/// Default toolkit sniffing: a Tk import anywhere in the block.
pub fn mentions_gui_toolkit(content: &str) -> bool {
    content.to_lowercase().contains("tkinter") || content.contains("import tk")
}

#[derive(Debug, Clone)]
pub struct PlanReconciler {
    anchor: PathBuf,
    is_toolkit_block: ToolkitPredicate,
}

impl PlanReconciler {
    /// Reconciler that places directories under `anchor`.
    pub fn new(anchor: impl Into<PathBuf>) -> Self {
        Self {
            anchor: anchor.into(),
            is_toolkit_block: mentions_gui_toolkit,
        }
    }

    /// Reconciler anchored at the process owner's home directory.
    pub fn home_anchored() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(Self::new(home))
    }

    pub fn with_toolkit_predicate(mut self, predicate: ToolkitPredicate) -> Self {
        self.is_toolkit_block = predicate;
        self
    }

    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    /// Builds the plan. Never fails; no signals means an empty plan.
    pub fn reconcile(&self, signals: &Signals) -> Vec<PlannedAction> {
        let mut actions = Vec::new();

        let directories: Vec<PathBuf> = signals
            .directories
            .iter()
            .map(|dir| self.anchor.join(dir.name()))
            .collect();

        for path in &directories {
            actions.push(PlannedAction::MakeDirectory { path: path.clone() });
        }

        let filenames: Vec<&FilenameToken> = signals.filenames.iter().collect();
        let target_dir = directories.first();

        for block in &signals.code_blocks {
            let filename = match filenames.get(block.index) {
                Some(token) => token.name().to_string(),
                None => self.synthesize_filename(block, target_dir.is_some()),
            };

            let path = match target_dir {
                Some(dir) => dir.join(&filename),
                None => PathBuf::from(&filename),
            };

            actions.push(PlannedAction::WriteFile {
                path,
                content: block.trimmed().to_string(),
                overwrite: true,
            });
        }

        actions
    }

    fn synthesize_filename(&self, block: &CodeBlock, has_target_dir: bool) -> String {
        let toolkit = (self.is_toolkit_block)(&block.content);
        match (has_target_dir, toolkit) {
            (true, true) => "calculator.py".to_string(),
            (false, true) => format!("calculator_{}.py", block.index),
            (_, false) => format!("file_{}.py", block.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contexts::signal_extractor::extract_signals;
    use std::collections::HashSet;

    fn writes(plan: &[PlannedAction]) -> Vec<(PathBuf, String)> {
        plan.iter()
            .filter_map(|action| match action {
                PlannedAction::WriteFile { path, content, .. } => {
                    Some((path.clone(), content.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_plan_without_signals() {
        let reconciler = PlanReconciler::new("/home/tester");
        let plan = reconciler.reconcile(&extract_signals("Nothing to do here, see notes.md"));
        assert!(plan.is_empty());
    }

    #[test]
    fn single_block_goes_to_working_directory() {
        let reconciler = PlanReconciler::new("/home/tester");
        let plan = reconciler.reconcile(&extract_signals("```python\nprint('hi')\n```"));

        assert_eq!(
            plan,
            vec![PlannedAction::WriteFile {
                path: PathBuf::from("file_0.py"),
                content: "print('hi')".to_string(),
                overwrite: true,
            }]
        );
    }

    #[test]
    fn working_directory_names_follow_toolkit_rule() {
        let text = "```python\nimport tkinter as tk\nroot = tk.Tk()\n```\n\n```\nx = 1\n```";
        let plan = PlanReconciler::new("/home/tester").reconcile(&extract_signals(text));

        let paths: Vec<PathBuf> = writes(&plan).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("calculator_0.py"), PathBuf::from("file_1.py")]
        );
    }

    #[test]
    fn mkdir_with_toolkit_block() {
        let text = "Run `mkdir Calc` first.\n```python\nfrom tkinter import *\n```\n";
        let plan = PlanReconciler::new("/home/tester").reconcile(&extract_signals(text));

        assert_eq!(
            plan,
            vec![
                PlannedAction::MakeDirectory {
                    path: PathBuf::from("/home/tester/Calc"),
                },
                PlannedAction::WriteFile {
                    path: PathBuf::from("/home/tester/Calc/calculator.py"),
                    content: "from tkinter import *".to_string(),
                    overwrite: true,
                },
            ]
        );
    }

    #[test]
    fn all_blocks_target_first_directory() {
        let text = "mkdir alpha\nmkdir beta\nmkdir gamma\n```\na\n```\n```\nb\n```";
        let plan = PlanReconciler::new("/anchor").reconcile(&extract_signals(text));

        let mkdirs: Vec<&PlannedAction> = plan.iter().filter(|a| a.is_make_directory()).collect();
        assert_eq!(mkdirs.len(), 3);
        assert!(plan[..3].iter().all(|a| a.is_make_directory()));

        let first_dir = mkdirs[0].path().to_path_buf();
        let written = writes(&plan);
        assert_eq!(written.len(), 2);
        for (path, _) in &written {
            assert_eq!(path.parent(), Some(first_dir.as_path()));
        }
        assert!(written[0].0.ends_with("file_0.py"));
        assert!(written[1].0.ends_with("file_1.py"));
    }

    #[test]
    fn filename_pairing_is_positional_over_set_order() {
        let text = "mkdir project\nFirst app.py:\n```\nAPP\n```\nthen util.py:\n```\nUTIL\n```\nthen extra";
        let signals = extract_signals(text);
        let plan = PlanReconciler::new("/anchor").reconcile(&signals);

        let set_order: Vec<String> = signals.filenames.iter().map(|f| f.name().to_string()).collect();
        let written = writes(&plan);

        assert_eq!(written.len(), 2);
        for (i, (path, _)) in written.iter().enumerate() {
            assert_eq!(path, &PathBuf::from("/anchor/project").join(&set_order[i]));
        }

        let names: HashSet<String> = written
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            HashSet::from(["app.py".to_string(), "util.py".to_string()])
        );
        // contents stay in block order regardless of which name they got
        assert_eq!(written[0].1, "APP");
        assert_eq!(written[1].1, "UTIL");
    }

    #[test]
    fn synthesizes_when_filenames_run_out() {
        let text = "mkdir web\nSee index.html\n```html\n<p>1</p>\n```\n```\nprint(2)\n```";
        let plan = PlanReconciler::new("/anchor").reconcile(&extract_signals(text));
        let written = writes(&plan);

        assert_eq!(written[0].0, PathBuf::from("/anchor/web/index.html"));
        assert_eq!(written[1].0, PathBuf::from("/anchor/web/file_1.py"));
    }

    #[test]
    fn working_directory_uses_filename_mentions_too() {
        let text = "Save as hello.py\n```python\nprint('hello')\n```";
        let plan = PlanReconciler::new("/anchor").reconcile(&extract_signals(text));
        assert_eq!(writes(&plan)[0].0, PathBuf::from("hello.py"));
    }

    #[test]
    fn directories_only_plan() {
        let plan = PlanReconciler::new("/anchor").reconcile(&extract_signals("`mkdir assets`"));
        assert_eq!(
            plan,
            vec![PlannedAction::MakeDirectory {
                path: PathBuf::from("/anchor/assets"),
            }]
        );
    }

    #[test]
    fn toolkit_predicate_is_swappable() {
        fn never(_: &str) -> bool {
            false
        }
        let reconciler = PlanReconciler::new("/anchor").with_toolkit_predicate(never);
        let plan = reconciler.reconcile(&extract_signals("```\nimport tkinter\n```"));
        assert_eq!(writes(&plan)[0].0, PathBuf::from("file_0.py"));
    }

    #[test]
    fn toolkit_marker_detection() {
        assert!(mentions_gui_toolkit("import Tkinter"));
        assert!(mentions_gui_toolkit("import tk"));
        assert!(!mentions_gui_toolkit("import os"));
    }

    #[test]
    fn production_reconciler_is_home_anchored() {
        let reconciler = PlanReconciler::home_anchored().unwrap();
        assert_eq!(reconciler.anchor(), dirs::home_dir().unwrap().as_path());

        let plan = reconciler.reconcile(&extract_signals("mkdir site\n```\nx\n```"));
        assert!(plan.iter().all(|a| a.path().starts_with(reconciler.anchor())));
    }
}
