use chrono::{TimeZone, Utc};
use perfgate::report::{
    Block, ReportContext, ReportMode, action_items_section, bootstrap_report, comparison_report,
    recommendation, regression_sections, render,
};
use perfgate::{Comparison, SampleRecord, SampleSet, Severity, Thresholds, aggregate};

fn ctx() -> ReportContext<'static> {
    ReportContext {
        generated_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
        baseline_label: "2026-03-01T00:00:00+00:00",
        revision: "abc123",
        fail_on: Severity::Minor,
    }
}

fn set(records: Vec<SampleRecord>) -> SampleSet {
    records.into_iter().collect()
}

fn mixed_comparison() -> Comparison {
    let baseline = set(vec![
        SampleRecord::timing("Fast", 100.0),
        SampleRecord::timing("Slow", 100.0),
        SampleRecord::allocation("Bulk", 1_000.0, 10_000),
    ]);
    let current = set(vec![
        SampleRecord::timing("Fast", 80.0),
        SampleRecord::timing("Slow", 125.0),
        SampleRecord::allocation("Bulk", 1_000.0, 10_700),
    ]);
    aggregate(&baseline, &current, &Thresholds::default())
}

#[test]
fn test_comparison_report_sections_in_order() {
    let report = comparison_report(&mixed_comparison(), &ctx());
    let headings: Vec<_> = report.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec![
            "Summary",
            "CPU Benchmarks",
            "Memory Benchmarks",
            "Regressions",
            "Slow - CRITICAL",
            "Bulk - MINOR",
            "Action Items",
            "Conclusion",
        ]
    );
}

#[test]
fn test_comparison_markdown_contents() {
    let markdown = render(ReportMode::Comparison(&mixed_comparison()), &ctx());
    assert!(markdown.starts_with("# Performance Review Results\n"));
    assert!(markdown.contains("**Date**: 2026-03-04 05:06:07 UTC"));
    assert!(markdown.contains("**Commit**: abc123"));
    assert!(markdown.contains("- **Regressions**: 2"));
    assert!(markdown.contains("- **Status**: ⚠️ REGRESSIONS FOUND (CRITICAL)"));
    assert!(markdown.contains("| Slow | 100.000 ns | 125.000 ns | +25.0% | ⚠️ CRITICAL |"));
    assert!(markdown.contains("| Fast | 100.000 ns | 80.000 ns | -20.0% | ✅ |"));
    assert!(markdown.contains("| Bulk | 10,000 B | 10,700 B | +7.0% | 0.0/0.0 | ⚠️ MINOR |"));
    assert!(markdown.contains("- **Recommendation**: Fix before merge"));
    assert!(markdown.contains("- **Recommendation**: Monitor"));
    assert!(markdown.contains("- [ ] Review regression details above"));
    assert!(markdown.contains("2 regression(s) detected with CRITICAL severity."));
}

#[test]
fn test_empty_comparison_renders_passing_report() {
    let markdown = render(ReportMode::Comparison(&Comparison::default()), &ctx());
    assert!(markdown.contains("- **Total Benchmarks**: 0"));
    assert!(markdown.contains("- **Status**: ✅ PASS"));
    assert!(markdown.contains("| Benchmark | Baseline | Current | Change | Status |"));
    assert!(!markdown.contains("## Regressions"));
    assert!(markdown.contains("- [x] No regressions detected"));
    assert!(markdown.contains("All benchmarks passed."));
}

#[test]
fn test_unchanged_row_has_no_severity_and_plus_sign() {
    let baseline = set(vec![SampleRecord::timing("Flat", 100.0)]);
    let current = set(vec![SampleRecord::timing("Flat", 100.0)]);
    let comparison = aggregate(&baseline, &current, &Thresholds::default());
    let markdown = render(ReportMode::Comparison(&comparison), &ctx());
    assert!(markdown.contains("| Flat | 100.000 ns | 100.000 ns | +0.0% | ➡️ |"));
}

#[test]
fn test_recommendations_by_severity() {
    assert_eq!(recommendation(Severity::Critical), "Fix before merge");
    assert_eq!(recommendation(Severity::Major), "Investigate");
    assert_eq!(recommendation(Severity::Minor), "Monitor");
    assert_eq!(recommendation(Severity::None), "Investigate");
}

#[test]
fn test_regression_detail_blocks() {
    let sections = regression_sections(&mixed_comparison());
    assert_eq!(sections.len(), 2);
    let Block::Facts(facts) = &sections[0].blocks[0] else {
        panic!("expected facts block");
    };
    assert_eq!(facts[0].0, "Baseline");
    assert_eq!(facts[0].1, "100.000 ns (0 B allocated)");
    assert_eq!(facts[2].1, "+25.0%");
}

#[test]
fn test_regressions_below_gate_are_reported_but_pass() {
    let mut context = ctx();
    context.fail_on = Severity::Major;
    let baseline = set(vec![SampleRecord::timing("Drift", 100.0)]);
    let current = set(vec![SampleRecord::timing("Drift", 107.0)]);
    let comparison = aggregate(&baseline, &current, &Thresholds::default());
    let markdown = render(ReportMode::Comparison(&comparison), &context);
    assert!(markdown.contains("✅ PASS (regressions below MAJOR gate)"));
    assert!(markdown.contains("### Drift - MINOR"));
    let actions = action_items_section(&comparison.verdict);
    assert!(matches!(&actions.blocks[0], Block::Checklist(items) if !items[0].0));
}

#[test]
fn test_bootstrap_report_lists_every_measurement() {
    let mut bulk = SampleRecord::allocation("Bulk", 2_000.0, 1_234_567);
    bulk.gen0 = 3.0;
    let current = set(vec![
        SampleRecord::timing("One", 1.0),
        SampleRecord::timing("Two", 2.0),
        bulk,
    ]);
    let mut context = ctx();
    context.baseline_label = "Initial Run";
    let report = bootstrap_report(&current, &context);
    assert_eq!(report.title, "Performance Review Results - Initial Baseline");
    assert!(report.section("Next Steps").is_some());
    let markdown = report.to_markdown();
    assert!(markdown.contains("**Baseline**: Initial Run"));
    assert!(markdown.contains("- **Total Benchmarks**: 3"));
    assert!(markdown.contains("✅ INITIAL BASELINE ESTABLISHED"));
    assert!(markdown.contains("- **One**: 1.000 ns (0 B)"));
    assert!(markdown.contains("- **Bulk**: 2000.000 ns (1,234,567 B, Gen0/1: 3.0/0.0)"));
    assert!(!markdown.contains("REGRESSIONS"));
}
