//! Aggregates per-measurement classifications into a run verdict.

use tracing::debug;

use crate::classify::{Direction, Severity, Thresholds, compare_records};
use crate::sample::{SampleKind, SampleRecord, SampleSet};

/// One measurement compared against its baseline entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonResult {
    pub name: String,
    pub baseline: SampleRecord,
    pub current: SampleRecord,
    pub direction: Direction,
    pub change_pct: f64,
    pub severity: Severity,
}

impl ComparisonResult {
    pub fn kind(&self) -> SampleKind {
        self.current.kind
    }

    pub fn is_regression(&self) -> bool {
        self.severity.is_regression()
    }

    pub fn is_improvement(&self) -> bool {
        self.direction == Direction::Improved
    }
}

/// Overall counts and worst severity for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunVerdict {
    /// Measurements that had a baseline entry and were compared.
    pub total_count: usize,
    pub regression_count: usize,
    pub improvement_count: usize,
    /// Current measurements skipped for lack of a baseline entry.
    pub unmatched_count: usize,
    pub max_severity: Severity,
}

impl RunVerdict {
    pub fn has_regressions(&self) -> bool {
        self.regression_count > 0
    }

    /// Whether the gate holds when `fail_on` is the lowest failing severity.
    ///
    /// `Severity::None` is treated as `Minor`: any regression fails.
    pub fn passed(&self, fail_on: Severity) -> bool {
        self.max_severity < fail_on.max(Severity::Minor)
    }
}

/// Every comparison of a run, in current-run recording order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Comparison {
    pub results: Vec<ComparisonResult>,
    pub verdict: RunVerdict,
}

impl Comparison {
    pub fn by_kind(&self, kind: SampleKind) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(move |r| r.kind() == kind)
    }

    pub fn timing(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.by_kind(SampleKind::Timing)
    }

    pub fn allocation(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.by_kind(SampleKind::Allocation)
    }

    pub fn regressions(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(|r| r.is_regression())
    }

    pub fn improvements(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(|r| r.is_improvement())
    }
}

/// Compares every current measurement that has a baseline entry.
///
/// The metric read from both records is chosen by the current record's kind.
pub fn aggregate(baseline: &SampleSet, current: &SampleSet, thresholds: &Thresholds) -> Comparison {
    let mut results = Vec::with_capacity(current.len());
    let mut verdict = RunVerdict::default();
    for record in current.iter() {
        let Some(base) = baseline.get(&record.name) else {
            debug!(name = %record.name, "no baseline entry, skipping");
            verdict.unmatched_count += 1;
            continue;
        };
        let outcome = compare_records(thresholds, record.kind.metric_field(), base, record);
        debug!(
            name = %record.name,
            kind = record.kind.label(),
            change_pct = outcome.change_pct,
            severity = %outcome.severity,
            "classified"
        );
        verdict.total_count += 1;
        if outcome.severity.is_regression() {
            verdict.regression_count += 1;
            verdict.max_severity = verdict.max_severity.max(outcome.severity);
        } else if outcome.direction == Direction::Improved {
            verdict.improvement_count += 1;
        }
        results.push(ComparisonResult {
            name: record.name.clone(),
            baseline: base.clone(),
            current: record.clone(),
            direction: outcome.direction,
            change_pct: outcome.change_pct,
            severity: outcome.severity,
        });
    }
    Comparison { results, verdict }
}
