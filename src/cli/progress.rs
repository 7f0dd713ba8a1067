use console::style;
use std::time::Duration;

use cliagent::contexts::MaterializationReport;

/// Totals for one auto-execution batch
pub struct ProgressIndicator {
    total: usize,
    completed: usize,
    failed: usize,
    elapsed: Duration,
}

impl ProgressIndicator {
    /// Prints one line per action of `report` and keeps the totals.
    pub fn from_report(report: &MaterializationReport) -> Self {
        let mut progress = Self {
            total: report.results.len(),
            completed: 0,
            failed: 0,
            elapsed: report.elapsed,
        };

        for result in &report.results {
            match &result.outcome {
                Ok(path) => {
                    progress.completed += 1;
                    let verb = if result.action.is_make_directory() {
                        "Created directory"
                    } else {
                        "Wrote file"
                    };
                    println!("  {} {} {}", style("✓").green(), verb, path.display());
                }
                Err(e) => {
                    progress.failed += 1;
                    println!("  {} {}", style("✗").red(), e);
                }
            }
        }

        progress
    }

    pub fn finish(&self) {
        if self.total == 0 {
            println!("{}", style("No files or directories to create").dim());
            return;
        }
        println!("\n{}", "=".repeat(60));
        println!("Summary:");
        println!("  Total:     {}", self.total);
        println!("  Succeeded: {}", self.completed);
        println!("  Failed:    {}", self.failed);
        println!("  Duration:  {:.2}s", self.elapsed.as_secs_f64());
        println!("{}", "=".repeat(60));
    }
}
