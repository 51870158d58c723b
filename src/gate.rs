//! One complete gate run: load, compare, report, persist, signal.

use std::{fs, path::PathBuf};

use chrono::Utc;
use tracing::info;

use crate::baseline::{ensure_parent_dir, load_baseline, save_baseline};
use crate::compare::{RunVerdict, aggregate};
use crate::config::GateConfig;
use crate::errors::PerfGateError;
use crate::markers::write_regression_markers;
use crate::report::{ReportContext, ReportMode, render};
use crate::results::collect_current;

/// Exit status when the gate fails.
pub const EXIT_REGRESSION: i32 = 1;

/// Input and output locations for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub baseline: PathBuf,
    pub timing_results: PathBuf,
    pub allocation_results: PathBuf,
    pub report: PathBuf,
    pub new_baseline: PathBuf,
    pub revision: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub verdict: RunVerdict,
    /// No baseline existed and this run established one.
    pub bootstrap: bool,
    pub gate_failed: bool,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.gate_failed { EXIT_REGRESSION } else { 0 }
    }
}

/// Runs the gate end to end.
///
/// The report is rendered completely before anything is written. The new
/// baseline is saved whether or not the gate fails; markers are written only
/// when it does.
pub fn run(options: &RunOptions, config: &GateConfig) -> Result<RunOutcome, PerfGateError> {
    config.validate()?;
    let baseline = load_baseline(&options.baseline)?;
    let current = collect_current(&options.timing_results, &options.allocation_results)?;
    let ctx = ReportContext {
        generated_at: Utc::now(),
        baseline_label: &baseline.captured_at,
        revision: &options.revision,
        fail_on: config.fail_on,
    };

    let (markdown, outcome) = if baseline.is_bootstrap() {
        let outcome = RunOutcome {
            verdict: RunVerdict {
                unmatched_count: current.len(),
                ..RunVerdict::default()
            },
            bootstrap: true,
            gate_failed: false,
        };
        (render(ReportMode::Bootstrap(&current), &ctx), outcome)
    } else {
        let comparison = aggregate(&baseline.records, &current, &config.thresholds);
        let verdict = comparison.verdict;
        let outcome = RunOutcome {
            verdict,
            bootstrap: false,
            gate_failed: !verdict.passed(config.fail_on),
        };
        (render(ReportMode::Comparison(&comparison), &ctx), outcome)
    };

    ensure_parent_dir(&options.report)?;
    fs::write(&options.report, markdown).map_err(|e| {
        PerfGateError::report(format!("writing {}: {e}", options.report.display()))
    })?;
    info!(path = %options.report.display(), "wrote performance review");

    save_baseline(&current, &options.new_baseline, &options.revision, &config.runtime)?;

    if outcome.gate_failed {
        write_regression_markers(&config.marker_dir, outcome.verdict.max_severity)?;
    }
    Ok(outcome)
}
