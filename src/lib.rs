// ===============================
// src/lib.rs
// ===============================
//
// style_watcher: per-style inventory pivot pipeline.
//
// Fetches a loose comma-separated payload from a remote inventory endpoint,
// parses it into validated rows, caches snapshots per query with a TTL, and
// derives color x size pivot views, warehouse rankings, and aggregate
// summaries. The CLI in main.rs is one consumer; the library surface is the
// service (get_view) plus the pure pivot functions.

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod parser;
pub mod pivot;
pub mod recorder;
pub mod render;
pub mod service;

pub use client::{HttpTransport, Transport, TransportError};
pub use domain::{Event, InventoryRow, InventorySnapshot};
pub use service::{InventoryService, ViewResult, ViewStatus};
