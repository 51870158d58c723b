//! Unit normalization for benchmark result cells.
//!
//! Benchmark exports carry values like `"1,234.5 ns"`, `"1.5 ms"` or `"2 KB"`.
//! Times are normalized to nanoseconds and sizes to bytes. Malformed cells
//! never fail: they collapse to the caller-supplied default.

use std::sync::LazyLock;

use regex::Regex;

/// Leading numeral with optional thousands separators and fraction, then an
/// optional unit token. The `regex` crate matches in linear time.
static NUMERAL_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9,]+(?:\.[0-9]+)?)\s*(.*)$").expect("numeral regex")
});

const NANOS_PER_SEC: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_MICRO: f64 = 1_000.0;
const KIB: f64 = 1_024.0;

/// Multiplier that maps a unit token onto the canonical scale.
///
/// Time units map to nanoseconds, size units to bytes. `None` for anything
/// unrecognized.
pub fn unit_scale(unit: &str) -> Option<f64> {
    let unit = unit.trim().to_lowercase();
    let scale = match unit.as_str() {
        "s" | "sec" => NANOS_PER_SEC,
        "ms" | "msec" => NANOS_PER_MILLI,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ns" => 1.0,
        "" | "b" => 1.0,
        "kb" => KIB,
        "mb" => KIB * KIB,
        "gb" => KIB * KIB * KIB,
        _ => return None,
    };
    Some(scale)
}

/// Converts a raw cell into its canonical numeric value, or `default`.
pub fn normalize(raw: &str, default: f64) -> f64 {
    parse_scaled(raw).unwrap_or(default)
}

/// Like [`normalize`] but truncates to a whole byte count.
pub fn normalize_bytes(raw: &str, default: u64) -> u64 {
    parse_scaled(raw).map_or(default, |value| value as u64)
}

fn parse_scaled(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    let captures = NUMERAL_WITH_UNIT.captures(cleaned)?;
    let digits = captures.get(1)?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;
    let scale = unit_scale(captures.get(2).map_or("", |m| m.as_str()))?;
    Some(value * scale).filter(|scaled| scaled.is_finite())
}
