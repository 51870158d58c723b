//! Reads benchmark exports (BenchmarkDotNet CSV layout) into sample records.

use std::{borrow::Cow, fs::File, io::ErrorKind, io::Read, path::Path};

use csv::{ByteRecord, ReaderBuilder};
use tracing::{info, warn};

use crate::errors::PerfGateError;
use crate::sample::{SampleKind, SampleRecord, SampleSet};
use crate::units::{normalize, normalize_bytes};

const NAME_COLUMN: &str = "Method";
const MEAN_COLUMN: &str = "Mean";
const ERROR_COLUMN: &str = "Error";
const STDDEV_COLUMN: &str = "StdDev";
const ALLOCATED_COLUMN: &str = "Allocated";
const GEN0_COLUMN: &str = "Gen0";
const GEN1_COLUMN: &str = "Gen1";

#[derive(Clone, Copy, Debug)]
struct ColumnMap {
    name: usize,
    mean: Option<usize>,
    error: Option<usize>,
    stddev: Option<usize>,
    allocated: Option<usize>,
    gen0: Option<usize>,
    gen1: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &ByteRecord) -> Option<Self> {
        let find = |column: &str| headers.iter().position(|h| lossy(h).trim() == column);
        Some(Self {
            name: find(NAME_COLUMN)?,
            mean: find(MEAN_COLUMN),
            error: find(ERROR_COLUMN),
            stddev: find(STDDEV_COLUMN),
            allocated: find(ALLOCATED_COLUMN),
            gen0: find(GEN0_COLUMN),
            gen1: find(GEN1_COLUMN),
        })
    }

    fn record(&self, row: &ByteRecord, kind: SampleKind) -> SampleRecord {
        let cell = |idx: Option<usize>| lossy(idx.and_then(|i| row.get(i)).unwrap_or_default());
        SampleRecord {
            name: cell(Some(self.name)).trim().to_string(),
            kind,
            mean_ns: normalize(&cell(self.mean), 0.0),
            error_ns: normalize(&cell(self.error), 0.0),
            stddev_ns: normalize(&cell(self.stddev), 0.0),
            allocated_bytes: normalize_bytes(&cell(self.allocated), 0),
            gen0: normalize(&cell(self.gen0), 0.0),
            gen1: normalize(&cell(self.gen1), 0.0),
        }
    }
}

/// Cells that are not valid UTF-8 are decoded with replacement characters
/// and then fall back to defaults in the normalizer.
fn lossy(cell: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(cell)
}

/// Reads every row of the export at `path` as a `kind` record.
///
/// A missing file or a header without a `Method` column yields no records
/// and a warning. Undecodable cells degrade like any other malformed cell;
/// structurally broken CSV is an error.
pub fn read_results(path: &Path, kind: SampleKind) -> Result<Vec<SampleRecord>, PerfGateError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), kind = kind.label(), "results file not found");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(PerfGateError::io(format!(
                "opening results {}: {err}",
                path.display()
            )));
        }
    };
    let records = parse_results(file, kind)
        .map_err(|e| PerfGateError::parse(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), kind = kind.label(), count = records.len(), "read results");
    Ok(records)
}

/// Parses CSV text from any reader. See [`read_results`].
pub fn parse_results<R: Read>(
    reader: R,
    kind: SampleKind,
) -> Result<Vec<SampleRecord>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.byte_headers()?.clone();
    let Some(columns) = ColumnMap::from_headers(&headers) else {
        warn!(kind = kind.label(), "results header has no {NAME_COLUMN} column");
        return Ok(Vec::new());
    };
    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        let record = columns.record(&row, kind);
        if record.name.is_empty() {
            warn!(kind = kind.label(), "skipping results row without a name");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Reads both exports into one set, timing rows first.
pub fn collect_current(
    timing_path: &Path,
    allocation_path: &Path,
) -> Result<SampleSet, PerfGateError> {
    let mut current = SampleSet::new();
    current.extend(read_results(timing_path, SampleKind::Timing)?);
    current.extend(read_results(allocation_path, SampleKind::Allocation)?);
    Ok(current)
}
