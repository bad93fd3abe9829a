// ===============================
// src/domain.rs
// ===============================
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One size/color/warehouse stock line for a style.
///
/// Built only by the parser; quantities may be negative (an upstream data
/// anomaly we keep and surface, not an error we reject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub style: String,
    pub color: String,
    pub size: String,
    pub warehouse: String,
    pub qty_in: i64,
    pub qty_out: i64,
}

/// The full row set fetched for one query input, timestamped.
///
/// Replaced (never mutated) on refresh; `fetched_at` is non-decreasing per
/// key because cache writes are sequenced by the per-key fetch gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub input: String,
    pub fetched_at: DateTime<Utc>,
    pub rows: Vec<InventoryRow>,
}

impl InventorySnapshot {
    pub fn empty(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            fetched_at: Utc::now(),
            rows: Vec::new(),
        }
    }
}

/// Events for the optional JSONL recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    FetchOk { input: String, rows: usize, ms: u64 },
    FetchErr { input: String, error: String },
    CacheHit { input: String, age_secs: i64 },
    Fallback { input: String, error: String },
    Note(String),
}
