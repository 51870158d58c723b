use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which family a measurement belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Latency-style measurement compared on mean time.
    Timing,
    /// Allocation-style measurement compared on bytes allocated.
    Allocation,
}

impl SampleKind {
    /// The field the classifier reads for this kind.
    pub fn metric_field(self) -> MetricField {
        match self {
            SampleKind::Timing => MetricField::MeanTime,
            SampleKind::Allocation => MetricField::Allocated,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SampleKind::Timing => "timing",
            SampleKind::Allocation => "allocation",
        }
    }
}

/// Selects the comparison metric out of a [`SampleRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricField {
    MeanTime,
    Allocated,
}

impl MetricField {
    pub fn read(self, record: &SampleRecord) -> f64 {
        match self {
            MetricField::MeanTime => record.mean_ns,
            MetricField::Allocated => record.allocated_bytes as f64,
        }
    }
}

/// One named measurement from a benchmark run.
///
/// Times are nanoseconds, sizes are bytes. Only the field selected by
/// `kind` takes part in classification; the rest is carried for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub name: String,
    pub kind: SampleKind,
    pub mean_ns: f64,
    pub error_ns: f64,
    pub stddev_ns: f64,
    pub allocated_bytes: u64,
    pub gen0: f64,
    pub gen1: f64,
}

impl SampleRecord {
    pub fn timing(name: impl Into<String>, mean_ns: f64) -> Self {
        Self::new(name, SampleKind::Timing, mean_ns, 0)
    }

    pub fn allocation(name: impl Into<String>, mean_ns: f64, allocated_bytes: u64) -> Self {
        Self::new(name, SampleKind::Allocation, mean_ns, allocated_bytes)
    }

    pub fn new(
        name: impl Into<String>,
        kind: SampleKind,
        mean_ns: f64,
        allocated_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            mean_ns,
            error_ns: 0.0,
            stddev_ns: 0.0,
            allocated_bytes,
            gen0: 0.0,
            gen1: 0.0,
        }
    }

    /// The value the classifier compares for this record's kind.
    pub fn metric(&self) -> f64 {
        self.kind.metric_field().read(self)
    }
}

/// Measurements keyed by name, kept in the order they were first recorded.
///
/// Re-inserting a name replaces the record but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    records: IndexMap<String, SampleRecord>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SampleRecord) -> Option<SampleRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&SampleRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.values()
    }

    pub fn by_kind(&self, kind: SampleKind) -> impl Iterator<Item = &SampleRecord> {
        self.iter().filter(move |record| record.kind == kind)
    }
}

impl FromIterator<SampleRecord> for SampleSet {
    fn from_iter<I: IntoIterator<Item = SampleRecord>>(iter: I) -> Self {
        let mut set = SampleSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl Extend<SampleRecord> for SampleSet {
    fn extend<I: IntoIterator<Item = SampleRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
