use std::process;

use clap::Parser;
use perfgate::{GateConfig, cli::Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match GateConfig::from_env().and_then(|base| cli.gate_config(base)) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let options = cli.run_options();
    let outcome = match perfgate::run(&options, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    println!("Performance review generated: {}", options.report.display());
    if outcome.gate_failed {
        println!("Status: ⚠️ REGRESSIONS FOUND");
        println!("Severity: {}", outcome.verdict.max_severity);
    } else if outcome.bootstrap {
        println!("Status: ✅ INITIAL BASELINE ESTABLISHED");
    } else {
        println!("Status: ✅ PASS");
    }
    process::exit(outcome.exit_code());
}
