//! Regression classification for a single baseline/current metric pair.
//!
//! Both timing and allocation measurements share one threshold table: a
//! higher value is always worse. [`compare_records`] picks the metric field,
//! [`Thresholds::classify`] does the rest.

use std::fmt;
use std::str::FromStr;

use crate::errors::PerfGateError;
use crate::sample::{MetricField, SampleRecord};

pub const DEFAULT_MINOR_PCT: f64 = 5.0;
pub const DEFAULT_MAJOR_PCT: f64 = 10.0;
pub const DEFAULT_CRITICAL_PCT: f64 = 20.0;

/// Which way a metric moved relative to its baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Improved,
    Unchanged,
    Regressed,
}

impl Direction {
    /// Status glyph used in report tables.
    pub fn marker(self) -> &'static str {
        match self {
            Direction::Improved => "✅",
            Direction::Unchanged => "➡️",
            Direction::Regressed => "⚠️",
        }
    }
}

/// Regression severity tier, ordered from harmless to worst.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    None,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn is_regression(self) -> bool {
        self != Severity::None
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = PerfGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "minor" => Ok(Severity::Minor),
            "major" => Ok(Severity::Major),
            "critical" => Ok(Severity::Critical),
            other => Err(PerfGateError::invalid_input(format!(
                "unknown severity {other:?} (expected none, minor, major or critical)"
            ))),
        }
    }
}

/// Outcome of comparing one metric pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// Signed percentage change, `(current - baseline) / baseline * 100`.
    pub change_pct: f64,
    pub severity: Severity,
    pub direction: Direction,
}

impl Classification {
    fn unchanged(change_pct: f64) -> Self {
        Self {
            change_pct,
            severity: Severity::None,
            direction: Direction::Unchanged,
        }
    }
}

/// Percentage thresholds separating the severity tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub minor_pct: f64,
    pub major_pct: f64,
    pub critical_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            minor_pct: DEFAULT_MINOR_PCT,
            major_pct: DEFAULT_MAJOR_PCT,
            critical_pct: DEFAULT_CRITICAL_PCT,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), PerfGateError> {
        let values = [self.minor_pct, self.major_pct, self.critical_pct];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PerfGateError::invalid_input(
                "thresholds must be finite and non-negative",
            ));
        }
        if !(self.minor_pct <= self.major_pct && self.major_pct <= self.critical_pct) {
            return Err(PerfGateError::invalid_input(format!(
                "thresholds must ascend: minor {} major {} critical {}",
                self.minor_pct, self.major_pct, self.critical_pct
            )));
        }
        Ok(())
    }

    /// Classifies a metric pair where a larger value is worse.
    ///
    /// A zero baseline is reported as unchanged. Changes inside the
    /// `minor_pct` band (inclusive) are unchanged, any larger decrease is an
    /// improvement, and increases are graded minor, major or critical.
    pub fn classify(&self, baseline: f64, current: f64) -> Classification {
        if baseline == 0.0 {
            return Classification::unchanged(0.0);
        }
        let change_pct = (current - baseline) * 100.0 / baseline;
        if change_pct.abs() <= self.minor_pct {
            return Classification::unchanged(change_pct);
        }
        if change_pct < 0.0 {
            return Classification {
                change_pct,
                severity: Severity::None,
                direction: Direction::Improved,
            };
        }
        let severity = if change_pct > self.critical_pct {
            Severity::Critical
        } else if change_pct > self.major_pct {
            Severity::Major
        } else {
            Severity::Minor
        };
        Classification {
            change_pct,
            severity,
            direction: Direction::Regressed,
        }
    }
}

/// Classifies a metric pair with the default thresholds.
pub fn classify(baseline: f64, current: f64) -> Classification {
    Thresholds::default().classify(baseline, current)
}

/// Compares two records on the given metric field.
pub fn compare_records(
    thresholds: &Thresholds,
    field: MetricField,
    baseline: &SampleRecord,
    current: &SampleRecord,
) -> Classification {
    thresholds.classify(field.read(baseline), field.read(current))
}
