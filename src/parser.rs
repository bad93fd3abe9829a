// ===============================
// src/parser.rs
// ===============================
//
// Turns the raw inventory payload into validated rows.
//
// The payload is a JSON array of strings; each string is a comma-separated
// record "style,color,size,warehouse,qty_in,qty_out[,...]". The upstream
// format is not contractually guaranteed, so every malformed piece is
// skipped with an explicit reason instead of failing the whole fetch:
// the only observable outcomes are "some rows" or "fewer rows".

use tracing::{debug, warn};

use crate::domain::InventoryRow;
use crate::metrics::{LINES_SKIPPED, ROWS_PARSED};

/// Why a payload element produced no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or whitespace-only element.
    Blank,
    /// Fewer than 6 non-empty fields after tokenizing.
    TooFewFields(usize),
    /// 5th or 6th field is not an integer.
    BadQty(String),
}

impl SkipReason {
    fn metric_label(&self) -> &'static str {
        match self {
            SkipReason::Blank => "blank",
            SkipReason::TooFewFields(_) => "short",
            SkipReason::BadQty(_) => "bad_qty",
        }
    }
}

/// Per-element outcome; the skip policy is a value, not a swallowed exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Row(InventoryRow),
    Skipped(SkipReason),
}

/// Parse one candidate record. Tolerates the full-width comma `，` as a
/// separator; splits on comma, trims every token, drops empty tokens; needs
/// at least 6 tokens, extras beyond the 6th are ignored.
pub fn parse_line(line: &str) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Skipped(SkipReason::Blank);
    }

    let norm = line.replace('，', ",");
    let parts: Vec<&str> = norm
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if parts.len() < 6 {
        return LineOutcome::Skipped(SkipReason::TooFewFields(parts.len()));
    }

    let qty_in: i64 = match parts[4].parse() {
        Ok(v) => v,
        Err(_) => return LineOutcome::Skipped(SkipReason::BadQty(parts[4].to_string())),
    };
    let qty_out: i64 = match parts[5].parse() {
        Ok(v) => v,
        Err(_) => return LineOutcome::Skipped(SkipReason::BadQty(parts[5].to_string())),
    };

    LineOutcome::Row(InventoryRow {
        style: parts[0].to_string(),
        color: parts[1].to_string(),
        size: parts[2].to_string(),
        warehouse: parts[3].to_string(),
        qty_in,
        qty_out,
    })
}

/// Parse the whole payload. A payload that is not a JSON array of strings
/// is treated as "no data", never as an error.
pub fn parse_payload(payload: &str) -> Vec<InventoryRow> {
    let lines: Vec<String> = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            warn!(%e, "payload is not a JSON string array, dropping");
            LINES_SKIPPED.with_label_values(&["bad_payload"]).inc();
            return Vec::new();
        }
    };

    let mut rows = Vec::with_capacity(lines.len());
    for line in &lines {
        match parse_line(line) {
            LineOutcome::Row(row) => {
                rows.push(row);
                ROWS_PARSED.inc();
            }
            LineOutcome::Skipped(reason) => {
                debug!(?reason, %line, "skipping payload element");
                LINES_SKIPPED.with_label_values(&[reason.metric_label()]).inc();
            }
        }
    }
    rows
}
