//! Gate policy and environment configuration.
//!
//! Defaults reproduce the historical policy: 5/10/20 percent tiers and any
//! regression failing the gate. Each knob can be overridden from the
//! environment and then again from command-line flags.

use std::{env, path::PathBuf};

use crate::classify::{Severity, Thresholds};
use crate::errors::PerfGateError;

pub const ENV_MINOR_PCT: &str = "PERFGATE_MINOR_PCT";
pub const ENV_MAJOR_PCT: &str = "PERFGATE_MAJOR_PCT";
pub const ENV_CRITICAL_PCT: &str = "PERFGATE_CRITICAL_PCT";
pub const ENV_FAIL_ON: &str = "PERFGATE_FAIL_ON";
pub const ENV_RUNTIME: &str = "PERFGATE_RUNTIME";

/// Environment tag written into new baselines unless overridden.
pub const DEFAULT_RUNTIME: &str = ".NET 9.0";

/// Tunables for one gate run.
///
/// ```rust
/// use perfgate::{GateConfig, Severity};
///
/// let config = GateConfig::default();
/// assert_eq!(config.fail_on, Severity::Minor);
/// assert_eq!(config.thresholds.critical_pct, 20.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GateConfig {
    pub thresholds: Thresholds,
    /// Lowest severity that fails the gate.
    pub fail_on: Severity,
    /// Free-text environment tag stored in the baseline.
    pub runtime: String,
    /// Directory receiving the regression marker files.
    pub marker_dir: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            fail_on: Severity::Minor,
            runtime: DEFAULT_RUNTIME.to_string(),
            marker_dir: PathBuf::from("."),
        }
    }
}

impl GateConfig {
    /// Defaults overlaid with any `PERFGATE_*` environment variables.
    pub fn from_env() -> Result<Self, PerfGateError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GateConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PerfGateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MINOR_PCT) {
            config.thresholds.minor_pct = parse_pct(ENV_MINOR_PCT, &value)?;
        }
        if let Some(value) = lookup(ENV_MAJOR_PCT) {
            config.thresholds.major_pct = parse_pct(ENV_MAJOR_PCT, &value)?;
        }
        if let Some(value) = lookup(ENV_CRITICAL_PCT) {
            config.thresholds.critical_pct = parse_pct(ENV_CRITICAL_PCT, &value)?;
        }
        if let Some(value) = lookup(ENV_FAIL_ON) {
            config.fail_on = value.parse()?;
        }
        if let Some(value) = lookup(ENV_RUNTIME) {
            config.runtime = value;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PerfGateError> {
        self.thresholds.validate()
    }
}

fn parse_pct(key: &str, value: &str) -> Result<f64, PerfGateError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| PerfGateError::invalid_input(format!("{key}={value:?}: {e}")))
}
