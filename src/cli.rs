use std::path::PathBuf;

use clap::Parser;

use crate::classify::Severity;
use crate::config::GateConfig;
use crate::errors::PerfGateError;
use crate::gate::RunOptions;

/// Compare benchmark results against a baseline and gate on regressions.
#[derive(Parser, Debug, Clone)]
#[command(name = "perfgate", version)]
pub struct Cli {
    /// Path to the baseline JSON file
    #[arg(long)]
    pub baseline: PathBuf,

    /// Path to the CPU (timing) benchmark CSV results
    #[arg(long = "cpu-results")]
    pub cpu_results: PathBuf,

    /// Path to the memory (allocation) benchmark CSV results
    #[arg(long = "memory-results")]
    pub memory_results: PathBuf,

    /// Output path for the performance review
    #[arg(long)]
    pub output: PathBuf,

    /// Output path for the new baseline JSON
    #[arg(long = "new-baseline")]
    pub new_baseline: PathBuf,

    /// Source revision recorded in the report and baseline
    #[arg(long, default_value = "")]
    pub commit: String,

    /// Lowest severity that fails the gate (minor, major, critical)
    #[arg(long = "fail-on", value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Environment tag stored in the new baseline
    #[arg(long)]
    pub runtime: Option<String>,

    /// Directory receiving the regression marker files
    #[arg(long = "marker-dir")]
    pub marker_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            baseline: self.baseline.clone(),
            timing_results: self.cpu_results.clone(),
            allocation_results: self.memory_results.clone(),
            report: self.output.clone(),
            new_baseline: self.new_baseline.clone(),
            revision: self.commit.clone(),
        }
    }

    /// Applies flag overrides on top of `base`.
    pub fn gate_config(&self, mut base: GateConfig) -> Result<GateConfig, PerfGateError> {
        if let Some(fail_on) = self.fail_on {
            base.fail_on = fail_on;
        }
        if let Some(runtime) = &self.runtime {
            base.runtime = runtime.clone();
        }
        if let Some(dir) = &self.marker_dir {
            base.marker_dir = dir.clone();
        }
        base.validate()?;
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = [
            "perfgate",
            "--baseline",
            "b.json",
            "--cpu-results",
            "cpu.csv",
            "--memory-results",
            "mem.csv",
            "--output",
            "review.md",
            "--new-baseline",
            "new.json",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    #[test]
    fn test_required_paths_map_to_run_options() {
        let cli = Cli::try_parse_from(args(&[])).unwrap();
        let options = cli.run_options();
        assert_eq!(options.timing_results, PathBuf::from("cpu.csv"));
        assert_eq!(options.allocation_results, PathBuf::from("mem.csv"));
        assert_eq!(options.revision, "");
    }

    #[test]
    fn test_missing_required_flag_is_rejected() {
        let mut argv = args(&[]);
        argv.truncate(argv.len() - 2);
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_flag_overrides_config() {
        let cli = Cli::try_parse_from(args(&["--commit", "abc123", "--fail-on", "critical"]))
            .unwrap();
        let config = cli.gate_config(GateConfig::default()).unwrap();
        assert_eq!(config.fail_on, Severity::Critical);
        assert_eq!(cli.run_options().revision, "abc123");
    }

    #[test]
    fn test_unknown_fail_on_is_rejected_by_parser() {
        let err = Cli::try_parse_from(args(&["--fail-on", "sometimes"])).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("--fail-on"));
    }

    #[test]
    fn test_fail_on_is_case_insensitive() {
        let cli = Cli::try_parse_from(args(&["--fail-on", "MAJOR"])).unwrap();
        assert_eq!(cli.fail_on, Some(Severity::Major));
    }
}
