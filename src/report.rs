//! Performance review rendering.
//!
//! A review is assembled as an ordered [`Report`] of [`Section`]s and turned
//! into Markdown once, at the end. Builders for each section are public so
//! they can be inspected in isolation.

use chrono::{DateTime, Utc};

use crate::classify::Severity;
use crate::compare::{Comparison, ComparisonResult, RunVerdict};
use crate::sample::{SampleKind, SampleSet};

const REVIEW_TITLE: &str = "Performance Review Results";
const BOOTSTRAP_TITLE: &str = "Performance Review Results - Initial Baseline";
const TIMING_HEADING: &str = "CPU Benchmarks";
const ALLOCATION_HEADING: &str = "Memory Benchmarks";

/// A unit of content inside a section.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(String),
    /// `**Label**: value` lines without bullets.
    Meta(Vec<(String, String)>),
    /// `- **Label**: value` bullets.
    Facts(Vec<(String, String)>),
    Bullets(Vec<String>),
    /// `- [x]` / `- [ ]` items.
    Checklist(Vec<(bool, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Block {
    fn facts<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Block::Facts(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    fn to_markdown(&self) -> String {
        match self {
            Block::Paragraph(text) => format!("{text}\n"),
            Block::Meta(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("**{k}**: {v}\n"))
                .collect(),
            Block::Facts(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("- **{k}**: {v}\n"))
                .collect(),
            Block::Bullets(items) => items.iter().map(|item| format!("- {item}\n")).collect(),
            Block::Checklist(items) => items
                .iter()
                .map(|(done, item)| format!("- [{}] {item}\n", if *done { "x" } else { " " }))
                .collect(),
            Block::Table { headers, rows } => {
                let mut out = table_row(headers);
                let rule: Vec<String> = headers.iter().map(|h| "-".repeat(h.len() + 2)).collect();
                out.push('|');
                out.push_str(&rule.join("|"));
                out.push_str("|\n");
                for row in rows {
                    out.push_str(&table_row(row));
                }
                out
            }
        }
    }
}

fn table_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// A headed group of blocks. `level` is the Markdown heading depth.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub level: usize,
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(level: usize, heading: impl Into<String>) -> Self {
        Self {
            level,
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("{} {}\n", "#".repeat(self.level), self.heading);
        for block in &self.blocks {
            out.push('\n');
            out.push_str(&block.to_markdown());
        }
        out
    }
}

/// A complete review document.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub title: String,
    pub preamble: Vec<Block>,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for block in &self.preamble {
            out.push('\n');
            out.push_str(&block.to_markdown());
        }
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.to_markdown());
        }
        out
    }
}

/// Facts about the run that are not part of the comparison itself.
#[derive(Clone, Debug)]
pub struct ReportContext<'a> {
    pub generated_at: DateTime<Utc>,
    pub baseline_label: &'a str,
    pub revision: &'a str,
    /// Lowest severity that fails the gate.
    pub fail_on: Severity,
}

impl ReportContext<'_> {
    fn gate_failed(&self, verdict: &RunVerdict) -> bool {
        !verdict.passed(self.fail_on)
    }

    fn meta(&self) -> Block {
        Block::Meta(vec![
            (
                "Date".into(),
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
            ("Baseline".into(), self.baseline_label.to_string()),
            ("Commit".into(), self.revision.to_string()),
        ])
    }
}

/// What the review is about.
#[derive(Clone, Copy, Debug)]
pub enum ReportMode<'a> {
    /// No baseline existed; `current` becomes the baseline.
    Bootstrap(&'a SampleSet),
    Comparison(&'a Comparison),
}

/// Renders the review as Markdown.
pub fn render(mode: ReportMode<'_>, ctx: &ReportContext<'_>) -> String {
    let report = match mode {
        ReportMode::Bootstrap(current) => bootstrap_report(current, ctx),
        ReportMode::Comparison(comparison) => comparison_report(comparison, ctx),
    };
    report.to_markdown()
}

pub fn comparison_report(comparison: &Comparison, ctx: &ReportContext<'_>) -> Report {
    let verdict = &comparison.verdict;
    let mut sections = vec![
        summary_section(verdict, ctx),
        timing_table_section(comparison),
        allocation_table_section(comparison),
    ];
    let regressions = regression_sections(comparison);
    if !regressions.is_empty() {
        sections.push(Section::new(2, "Regressions"));
        sections.extend(regressions);
    }
    sections.push(action_items_section(verdict));
    sections.push(conclusion_section(verdict, ctx));
    Report {
        title: REVIEW_TITLE.to_string(),
        preamble: vec![ctx.meta()],
        sections,
    }
}

pub fn summary_section(verdict: &RunVerdict, ctx: &ReportContext<'_>) -> Section {
    let status = if !verdict.has_regressions() {
        "✅ PASS".to_string()
    } else if ctx.gate_failed(verdict) {
        format!("⚠️ REGRESSIONS FOUND ({})", verdict.max_severity)
    } else {
        format!("✅ PASS (regressions below {} gate)", ctx.fail_on.max(Severity::Minor))
    };
    let mut facts = vec![
        ("Total Benchmarks", verdict.total_count.to_string()),
        ("Regressions", verdict.regression_count.to_string()),
        ("Improvements", verdict.improvement_count.to_string()),
    ];
    if verdict.unmatched_count > 0 {
        facts.push(("New (no baseline)", verdict.unmatched_count.to_string()));
    }
    facts.push(("Status", status));
    Section::new(2, "Summary").with(Block::facts(facts))
}

pub fn timing_table_section(comparison: &Comparison) -> Section {
    let rows = comparison
        .timing()
        .map(|r| {
            vec![
                r.name.clone(),
                format!("{:.3} ns", r.baseline.mean_ns),
                format!("{:.3} ns", r.current.mean_ns),
                signed_pct(r.change_pct),
                status_cell(r),
            ]
        })
        .collect();
    Section::new(2, TIMING_HEADING).with(Block::Table {
        headers: columns(&["Benchmark", "Baseline", "Current", "Change", "Status"]),
        rows,
    })
}

pub fn allocation_table_section(comparison: &Comparison) -> Section {
    let rows = comparison
        .allocation()
        .map(|r| {
            vec![
                r.name.clone(),
                format!("{} B", group_thousands(r.baseline.allocated_bytes)),
                format!("{} B", group_thousands(r.current.allocated_bytes)),
                signed_pct(r.change_pct),
                format!("{:.1}/{:.1}", r.current.gen0, r.current.gen1),
                status_cell(r),
            ]
        })
        .collect();
    Section::new(2, ALLOCATION_HEADING).with(Block::Table {
        headers: columns(&[
            "Benchmark",
            "Baseline",
            "Current",
            "Alloc Change",
            "Gen0/1",
            "Status",
        ]),
        rows,
    })
}

/// One level-3 section per regression, in recording order.
pub fn regression_sections(comparison: &Comparison) -> Vec<Section> {
    comparison
        .regressions()
        .map(|r| {
            Section::new(3, format!("{} - {}", r.name, r.severity)).with(Block::facts([
                (
                    "Baseline",
                    format!(
                        "{:.3} ns ({} B allocated)",
                        r.baseline.mean_ns,
                        group_thousands(r.baseline.allocated_bytes)
                    ),
                ),
                (
                    "Current",
                    format!(
                        "{:.3} ns ({} B allocated)",
                        r.current.mean_ns,
                        group_thousands(r.current.allocated_bytes)
                    ),
                ),
                ("Change", signed_pct(r.change_pct)),
                ("Recommendation", recommendation(r.severity).to_string()),
            ]))
        })
        .collect()
}

pub fn recommendation(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Fix before merge",
        Severity::Minor => "Monitor",
        _ => "Investigate",
    }
}

pub fn action_items_section(verdict: &RunVerdict) -> Section {
    let items = if verdict.has_regressions() {
        vec![
            (false, "Review regression details above".to_string()),
            (false, "Investigate root cause of performance degradation".to_string()),
            (false, "Fix regression or document justification".to_string()),
        ]
    } else {
        vec![
            (true, "No regressions detected".to_string()),
            (true, "Baseline will be automatically updated".to_string()),
        ]
    };
    Section::new(2, "Action Items").with(Block::Checklist(items))
}

pub fn conclusion_section(verdict: &RunVerdict, ctx: &ReportContext<'_>) -> Section {
    let text = if !verdict.has_regressions() {
        "✅ **All benchmarks passed.** Performance is within acceptable range of baseline."
            .to_string()
    } else if ctx.gate_failed(verdict) {
        format!(
            "⚠️ **{} regression(s) detected with {} severity.** \
             Please review and address before baseline is updated.",
            verdict.regression_count, verdict.max_severity
        )
    } else {
        format!(
            "✅ **{} regression(s) detected with {} severity, below the {} gate.** \
             Keep an eye on them in upcoming runs.",
            verdict.regression_count,
            verdict.max_severity,
            ctx.fail_on.max(Severity::Minor)
        )
    };
    Section::new(2, "Conclusion").with(Block::Paragraph(text))
}

pub fn bootstrap_report(current: &SampleSet, ctx: &ReportContext<'_>) -> Report {
    let summary = Section::new(2, "Summary")
        .with(Block::Paragraph(
            "This is the **initial benchmark run**. No baseline exists for comparison.".into(),
        ))
        .with(Block::facts([
            ("Total Benchmarks", current.len().to_string()),
            ("Status", "✅ INITIAL BASELINE ESTABLISHED".to_string()),
        ]));
    let mut sections = vec![
        summary,
        Section::new(2, "Benchmarks Recorded").with(Block::Paragraph(
            "The following benchmarks will serve as the baseline for future comparisons:".into(),
        )),
    ];
    let timing: Vec<String> = current
        .by_kind(SampleKind::Timing)
        .map(|r| {
            format!(
                "**{}**: {:.3} ns ({} B)",
                r.name,
                r.mean_ns,
                group_thousands(r.allocated_bytes)
            )
        })
        .collect();
    if !timing.is_empty() {
        sections.push(Section::new(3, TIMING_HEADING).with(Block::Bullets(timing)));
    }
    let allocation: Vec<String> = current
        .by_kind(SampleKind::Allocation)
        .map(|r| {
            format!(
                "**{}**: {:.3} ns ({} B, Gen0/1: {:.1}/{:.1})",
                r.name,
                r.mean_ns,
                group_thousands(r.allocated_bytes),
                r.gen0,
                r.gen1
            )
        })
        .collect();
    if !allocation.is_empty() {
        sections.push(Section::new(3, ALLOCATION_HEADING).with(Block::Bullets(allocation)));
    }
    sections.push(Section::new(2, "Next Steps").with(Block::Checklist(vec![
        (true, "Initial baseline established".to_string()),
        (true, "Future runs will compare against this baseline".to_string()),
        (true, "Performance regressions will be automatically detected".to_string()),
    ])));
    sections.push(Section::new(2, "Conclusion").with(Block::Paragraph(
        "✅ **Initial baseline successfully established.** \
         Future benchmark runs will compare against these values."
            .into(),
    )));
    Report {
        title: BOOTSTRAP_TITLE.to_string(),
        preamble: vec![ctx.meta()],
        sections,
    }
}

fn status_cell(result: &ComparisonResult) -> String {
    let marker = result.direction.marker();
    if result.severity.is_regression() {
        format!("{marker} {}", result.severity)
    } else {
        marker.to_string()
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Percentage with one decimal and an explicit `+` for non-negative values.
pub fn signed_pct(change_pct: f64) -> String {
    if change_pct >= 0.0 {
        format!("+{change_pct:.1}%")
    } else {
        format!("{change_pct:.1}%")
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
