use std::fs;

use perfgate::{
    INITIAL_RUN_LABEL, PerfGateError, SampleKind, SampleRecord, SampleSet, load_baseline,
    save_baseline,
};
use serde_json::Value;
use tempfile::tempdir;

fn sample_set() -> SampleSet {
    let mut cpu = SampleRecord::timing("Slugify_Short", 123.456);
    cpu.error_ns = 1.5;
    cpu.stddev_ns = 0.75;
    cpu.allocated_bytes = 96;
    let mut mem = SampleRecord::allocation("Slugify_Bulk", 45_000.0, 1_048_576);
    mem.gen0 = 12.5;
    mem.gen1 = 0.25;
    [cpu, mem].into_iter().collect()
}

#[test]
fn test_missing_file_is_initial_run() {
    let dir = tempdir().unwrap();
    let baseline = load_baseline(&dir.path().join("absent.json")).unwrap();
    assert!(baseline.is_bootstrap());
    assert_eq!(baseline.captured_at, INITIAL_RUN_LABEL);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_baseline(&path).unwrap_err();
    assert!(matches!(err, PerfGateError::BaselineError(_)));
}

#[test]
fn test_entry_missing_mean_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    fs::write(&path, r#"{"cpu_benchmarks": [{"name": "A"}]}"#).unwrap();
    assert!(load_baseline(&path).is_err());
}

#[test]
fn test_save_then_load_preserves_records_and_kinds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/dir/baseline.json");
    let records = sample_set();
    save_baseline(&records, &path, "abc123", ".NET 9.0").unwrap();
    let loaded = load_baseline(&path).unwrap();
    assert_eq!(loaded.records, records);
    assert_eq!(loaded.revision, "abc123");
    assert_ne!(loaded.captured_at, INITIAL_RUN_LABEL);
}

#[test]
fn test_saved_document_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    save_baseline(&sample_set(), &path, "", "rust").unwrap();
    let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert!(doc["date"].is_string());
    assert_eq!(doc["commit"], "");
    assert_eq!(doc["runtime"], "rust");
    let cpu = doc["cpu_benchmarks"].as_array().unwrap();
    let mem = doc["memory_benchmarks"].as_array().unwrap();
    assert_eq!(cpu.len(), 1);
    assert_eq!(mem.len(), 1);
    assert_eq!(cpu[0]["name"], "Slugify_Short");
    assert_eq!(cpu[0]["kind"], "timing");
    assert!(cpu[0].get("gen0").is_none());
    assert_eq!(mem[0]["allocated_bytes"], 1_048_576);
    assert_eq!(mem[0]["gen0"], 12.5);
}

#[test]
fn test_timing_record_with_allocation_keeps_its_kind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    let mut record = SampleRecord::timing("Hybrid", 10.0);
    record.allocated_bytes = 4_096;
    record.gen0 = 1.0;
    let records: SampleSet = [record].into_iter().collect();
    save_baseline(&records, &path, "", "rust").unwrap();
    let loaded = load_baseline(&path).unwrap();
    assert_eq!(loaded.records.get("Hybrid").unwrap().kind, SampleKind::Timing);
}

#[test]
fn test_untagged_entries_take_kind_from_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    fs::write(
        &path,
        r#"{
            "date": "2025-01-02T03:04:05",
            "commit": "deadbeef",
            "runtime": ".NET 9.0",
            "cpu_benchmarks": [
                {"name": "Cpu", "mean_ns": 10.5, "error_ns": 0.1, "stddev_ns": 0.2, "allocated_bytes": 32}
            ],
            "memory_benchmarks": [
                {"name": "Mem", "mean_ns": 99.0, "allocated_bytes": 2048, "gen0": 0.5, "gen1": 0.0}
            ]
        }"#,
    )
    .unwrap();
    let loaded = load_baseline(&path).unwrap();
    assert_eq!(loaded.captured_at, "2025-01-02T03:04:05");
    assert_eq!(loaded.revision, "deadbeef");
    let cpu = loaded.records.get("Cpu").unwrap();
    assert_eq!(cpu.kind, SampleKind::Timing);
    assert_eq!(cpu.allocated_bytes, 32);
    let mem = loaded.records.get("Mem").unwrap();
    assert_eq!(mem.kind, SampleKind::Allocation);
    assert_eq!(mem.gen0, 0.5);
}

#[test]
fn test_missing_date_is_unknown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    fs::write(&path, r#"{"cpu_benchmarks": []}"#).unwrap();
    let loaded = load_baseline(&path).unwrap();
    assert_eq!(loaded.captured_at, "unknown");
    assert!(loaded.is_bootstrap());
}
