//! Benchmark baseline comparison and regression gating.
//!
//! perfgate reads timing and allocation results from a benchmark run,
//! compares each measurement against a recorded baseline, grades every
//! increase into a severity tier and writes a Markdown review together with
//! an updated baseline.
//!
//! # Pipeline
//!
//! 1. [`results`] turns CSV exports into [`SampleRecord`]s, normalizing units
//!    through [`units`].
//! 2. [`baseline`] loads the previous baseline (a missing file bootstraps).
//! 3. [`compare::aggregate`] classifies every pair with [`classify::Thresholds`].
//! 4. [`report`] renders the review.
//! 5. [`gate::run`] ties it together, saves the new baseline and writes the
//!    regression markers.
//!
//! ```rust
//! use perfgate::{SampleRecord, SampleSet, Severity, Thresholds, aggregate};
//!
//! let baseline: SampleSet = [SampleRecord::timing("Slugify", 100.0)].into_iter().collect();
//! let current: SampleSet = [SampleRecord::timing("Slugify", 125.0)].into_iter().collect();
//! let comparison = aggregate(&baseline, &current, &Thresholds::default());
//! assert_eq!(comparison.verdict.max_severity, Severity::Critical);
//! ```

pub mod baseline;
pub mod classify;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod gate;
pub mod markers;
pub mod report;
pub mod results;
pub mod sample;
pub mod units;

pub use crate::baseline::{Baseline, INITIAL_RUN_LABEL, load_baseline, save_baseline};
pub use crate::classify::{Classification, Direction, Severity, Thresholds, classify};
pub use crate::compare::{Comparison, ComparisonResult, RunVerdict, aggregate};
pub use crate::config::GateConfig;
pub use crate::errors::PerfGateError;
pub use crate::gate::{RunOptions, RunOutcome, run};
pub use crate::sample::{MetricField, SampleKind, SampleRecord, SampleSet};
pub use crate::units::normalize;
