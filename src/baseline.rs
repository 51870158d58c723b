//! Baseline persistence.
//!
//! The baseline is a pretty-printed JSON document holding the last accepted
//! measurements split into `cpu_benchmarks` and `memory_benchmarks`. Entries
//! carry an explicit `kind`; entries written before the tag existed take the
//! kind of the list they sit in.

use std::{fs, io::ErrorKind, path::Path};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::PerfGateError;
use crate::sample::{SampleKind, SampleRecord, SampleSet};

/// Label reported when no baseline file exists yet.
pub const INITIAL_RUN_LABEL: &str = "Initial Run";
const UNKNOWN_DATE_LABEL: &str = "unknown";

/// Prior measurements plus where they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Baseline {
    pub records: SampleSet,
    /// Capture timestamp, or [`INITIAL_RUN_LABEL`] when bootstrapping.
    pub captured_at: String,
    pub revision: String,
}

impl Baseline {
    pub fn initial() -> Self {
        Self {
            records: SampleSet::new(),
            captured_at: INITIAL_RUN_LABEL.to_string(),
            revision: String::new(),
        }
    }

    /// True when there is nothing to compare against.
    pub fn is_bootstrap(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BaselineDocument {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    commit: String,
    #[serde(default)]
    runtime: String,
    #[serde(default)]
    cpu_benchmarks: Vec<BaselineEntry>,
    #[serde(default)]
    memory_benchmarks: Vec<BaselineEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BaselineEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<SampleKind>,
    name: String,
    mean_ns: f64,
    #[serde(default)]
    error_ns: f64,
    #[serde(default)]
    stddev_ns: f64,
    #[serde(default)]
    allocated_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gen0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gen1: Option<f64>,
}

impl BaselineEntry {
    fn from_record(record: &SampleRecord) -> Self {
        let gens = record.kind == SampleKind::Allocation;
        Self {
            kind: Some(record.kind),
            name: record.name.clone(),
            mean_ns: record.mean_ns,
            error_ns: record.error_ns,
            stddev_ns: record.stddev_ns,
            allocated_bytes: record.allocated_bytes,
            gen0: gens.then_some(record.gen0),
            gen1: gens.then_some(record.gen1),
        }
    }

    fn into_record(self, list_kind: SampleKind) -> SampleRecord {
        SampleRecord {
            kind: self.kind.unwrap_or(list_kind),
            name: self.name,
            mean_ns: self.mean_ns,
            error_ns: self.error_ns,
            stddev_ns: self.stddev_ns,
            allocated_bytes: self.allocated_bytes,
            gen0: self.gen0.unwrap_or_default(),
            gen1: self.gen1.unwrap_or_default(),
        }
    }
}

/// Loads the baseline at `path`.
///
/// A missing file is the bootstrap case and yields [`Baseline::initial`].
/// A file that exists but cannot be read or parsed is an error.
pub fn load_baseline(path: &Path) -> Result<Baseline, PerfGateError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "no baseline found, this run establishes the initial baseline"
            );
            return Ok(Baseline::initial());
        }
        Err(err) => {
            return Err(PerfGateError::io(format!(
                "reading baseline {}: {err}",
                path.display()
            )));
        }
    };
    let document: BaselineDocument = serde_json::from_slice(&data).map_err(|e| {
        PerfGateError::baseline(format!("corrupt baseline {}: {e}", path.display()))
    })?;
    let mut records = SampleSet::new();
    for entry in document.cpu_benchmarks {
        records.insert(entry.into_record(SampleKind::Timing));
    }
    for entry in document.memory_benchmarks {
        records.insert(entry.into_record(SampleKind::Allocation));
    }
    info!(path = %path.display(), count = records.len(), "loaded baseline");
    Ok(Baseline {
        records,
        captured_at: document
            .date
            .unwrap_or_else(|| UNKNOWN_DATE_LABEL.to_string()),
        revision: document.commit,
    })
}

/// Writes `records` as the new baseline, replacing whatever is at `path`.
pub fn save_baseline(
    records: &SampleSet,
    path: &Path,
    revision: &str,
    runtime: &str,
) -> Result<(), PerfGateError> {
    let (cpu, memory): (Vec<_>, Vec<_>) = records
        .iter()
        .partition(|record| record.kind == SampleKind::Timing);
    let document = BaselineDocument {
        date: Some(Utc::now().to_rfc3339()),
        commit: revision.to_string(),
        runtime: runtime.to_string(),
        cpu_benchmarks: cpu.into_iter().map(BaselineEntry::from_record).collect(),
        memory_benchmarks: memory.into_iter().map(BaselineEntry::from_record).collect(),
    };
    let data = serde_json::to_vec_pretty(&document)
        .map_err(|e| PerfGateError::baseline(e.to_string()))?;
    ensure_parent_dir(path)?;
    fs::write(path, data)
        .map_err(|e| PerfGateError::io(format!("writing baseline {}: {e}", path.display())))?;
    info!(path = %path.display(), count = records.len(), "saved baseline");
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), PerfGateError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| PerfGateError::io(format!("creating {}: {e}", parent.display()))),
        _ => Ok(()),
    }
}
