//! Run reports
//!
//! [`RunReport`] folds the collected outcomes into the per-run aggregate:
//! the verdict (`has_errors`), the counts and a deterministic textual
//! rendering. Aggregation is pure; the wall-clock figure is measured by
//! the surrounding run and passed in.
//!
//! [`ReportWriter`] is the file-side collaborator: the last-run file is
//! rewritten on every run, the history file accumulates across runs.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::trace;

use crate::checks::outcome::CheckOutcome;

/// Aggregate of one full pass over the watchlist.
///
/// Assembled once all dispatched checks have completed; read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-check outcomes, in completion order (not meaningful; see
    /// [`RunReport::lines`] for the stable view)
    pub outcomes: Vec<CheckOutcome>,

    /// Number of checks dispatched in this run
    pub target_count: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// True iff at least one outcome is ERROR
    pub has_errors: bool,
}

impl RunReport {
    /// Fold outcomes into a report. Pure: the same outcomes and elapsed
    /// figure always produce identical fields.
    pub fn new(outcomes: Vec<CheckOutcome>, elapsed: Duration) -> Self {
        let has_errors = outcomes.iter().any(CheckOutcome::is_error);
        let target_count = outcomes.len();

        Self {
            outcomes,
            target_count,
            elapsed,
            has_errors,
        }
    }

    /// One report line per outcome, sorted by target so a given outcome
    /// set always renders the same way.
    pub fn lines(&self) -> Vec<String> {
        let mut by_target: Vec<&CheckOutcome> = self.outcomes.iter().collect();
        by_target.sort_by(|a, b| a.target.cmp(&b.target));
        by_target.into_iter().map(ToString::to_string).collect()
    }

    /// Closing line, e.g. `Checked 3 hosts in 1.204s.`
    pub fn summary(&self) -> String {
        format!(
            "Checked {} hosts in {:.3}s.",
            self.target_count,
            self.elapsed.as_secs_f64()
        )
    }

    /// Full textual report: the sorted lines, a blank line, the summary.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for line in self.lines() {
            text.push_str(&line);
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&self.summary());
        text.push('\n');
        text
    }
}

/// Writes the rendered report to the run artifacts.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    /// Rewritten on every run; holds the most recent report only
    report_path: PathBuf,

    /// Appended on every run; accumulates all reports
    history_path: PathBuf,
}

impl ReportWriter {
    pub fn new(report_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
            history_path: history_path.into(),
        }
    }

    /// Write both files, creating parent directories on first use. The
    /// banner carries the run's start time.
    pub fn write(&self, report: &RunReport, started_at: DateTime<Utc>) -> Result<()> {
        let banner = format!("Work started: {}\n\n", started_at.format("%Y/%m/%d %H:%M:%S"));
        let entry = format!("{banner}{}", report.render());

        ensure_parent(&self.report_path)?;
        ensure_parent(&self.history_path)?;

        fs::write(&self.report_path, &entry)
            .with_context(|| format!("failed to write {}", self.report_path.display()))?;

        let mut history = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.history_path)
            .with_context(|| format!("failed to open {}", self.history_path.display()))?;
        history
            .write_all(entry.as_bytes())
            .and_then(|()| history.write_all(b"\n"))
            .with_context(|| format!("failed to append to {}", self.history_path.display()))?;

        trace!(
            "report written to {} and {}",
            self.report_path.display(),
            self.history_path.display()
        );
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
