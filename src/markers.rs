//! Flag files read by downstream pipeline steps.

use std::{fs, path::Path};

use crate::classify::Severity;
use crate::errors::PerfGateError;

pub const REGRESSION_DETECTED_FILE: &str = ".regression-detected";
pub const REGRESSION_SEVERITY_FILE: &str = ".regression-severity";

/// Writes `.regression-detected` (`true`) and `.regression-severity`
/// (the severity label) into `dir`.
pub fn write_regression_markers(dir: &Path, severity: Severity) -> Result<(), PerfGateError> {
    fs::create_dir_all(dir)
        .map_err(|e| PerfGateError::io(format!("creating {}: {e}", dir.display())))?;
    write_marker(&dir.join(REGRESSION_DETECTED_FILE), "true")?;
    write_marker(&dir.join(REGRESSION_SEVERITY_FILE), severity.label())
}

fn write_marker(path: &Path, contents: &str) -> Result<(), PerfGateError> {
    fs::write(path, contents)
        .map_err(|e| PerfGateError::io(format!("writing marker {}: {e}", path.display())))
}
