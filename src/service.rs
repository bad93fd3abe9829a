// ===============================
// src/service.rs
// ===============================
//
// Orchestrator: transport + parser + cache behind one "get the current
// view for input X" call. Failure never aborts the view; the worst outcome
// is stale or empty data with an advisory status the consumer can show.

use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap as HashMap;
use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::cache::{is_fresh, SnapshotCache};
use crate::client::{Transport, TransportError};
use crate::domain::{Event, InventorySnapshot};
use crate::metrics::{CACHE_LOOKUPS, FETCHES, FETCH_LATENCY};
use crate::parser;

/// Advisory side-channel next to the returned snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    /// Input was empty/whitespace; nothing was fetched or cached.
    NoQuery,
    /// Served from cache within the TTL, no transport call.
    Cached,
    /// Freshly fetched and stored.
    Live,
    /// Fetch failed; the previous snapshot (however stale) is returned.
    Stale(TransportError),
    /// Fetch failed and nothing was cached; the snapshot is empty.
    Unavailable(TransportError),
}

impl ViewStatus {
    pub fn failure(&self) -> Option<&TransportError> {
        match self {
            ViewStatus::Stale(e) | ViewStatus::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    pub snapshot: InventorySnapshot,
    pub status: ViewStatus,
}

pub struct InventoryService {
    transport: Arc<dyn Transport>,
    cache: Mutex<SnapshotCache>,
    // Per-key fetch gates: at most one in-flight transport call per key.
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    ttl_secs: i64,
    events: Option<mpsc::Sender<Event>>,
}

impl InventoryService {
    pub fn new(transport: Arc<dyn Transport>, cache_ttl_secs: i64) -> Self {
        Self {
            transport,
            cache: Mutex::new(SnapshotCache::new()),
            gates: Mutex::new(HashMap::new()),
            ttl_secs: cache_ttl_secs,
            events: None,
        }
    }

    /// Attach a recorder channel; events are fire-and-forget (`try_send`).
    pub fn with_recorder(mut self, tx: mpsc::Sender<Event>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, ev: Event) {
        if let Some(tx) = &self.events {
            let _ = tx.try_send(ev);
        }
    }

    /// Clone of whatever is cached for `input`, fresh or not.
    pub async fn cached(&self, input: &str) -> Option<InventorySnapshot> {
        self.cache.lock().await.get(input.trim()).cloned()
    }

    async fn fresh_cached(&self, key: &str, count_lookup: bool) -> Option<ViewResult> {
        let cache = self.cache.lock().await;
        let snap = cache.get(key);
        let now = Utc::now();
        match snap {
            Some(s) if is_fresh(s, self.ttl_secs, now) => {
                if count_lookup {
                    CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                }
                let age = now.signed_duration_since(s.fetched_at).num_seconds();
                self.emit(Event::CacheHit {
                    input: key.to_string(),
                    age_secs: age,
                });
                Some(ViewResult {
                    snapshot: s.clone(),
                    status: ViewStatus::Cached,
                })
            }
            Some(_) => {
                if count_lookup {
                    CACHE_LOOKUPS.with_label_values(&["stale"]).inc();
                }
                None
            }
            None => {
                if count_lookup {
                    CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                }
                None
            }
        }
    }

    /// Get the current snapshot for `input`, fetching if the cache is cold,
    /// stale, or a refresh is forced. Concurrent callers for the same key
    /// are coalesced; whoever waits behind an in-flight fetch re-reads the
    /// cache instead of fetching again.
    pub async fn get_view(&self, input: &str, force: bool) -> ViewResult {
        let key = input.trim();
        if key.is_empty() {
            return ViewResult {
                snapshot: InventorySnapshot::empty(""),
                status: ViewStatus::NoQuery,
            };
        }

        if !force {
            if let Some(res) = self.fresh_cached(key, true).await {
                return res;
            }
        }

        let gate = {
            let mut gates = self.gates.lock().await;
            gates
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _inflight = gate.lock().await;

        // A concurrent caller may have refreshed while we waited on the gate.
        if !force {
            if let Some(res) = self.fresh_cached(key, false).await {
                return res;
            }
        }

        let started = Instant::now();
        match self.transport.fetch_raw(key).await {
            Ok(payload) => {
                let ms = started.elapsed().as_millis() as u64;
                FETCH_LATENCY.observe(ms as f64);
                FETCHES.with_label_values(&["ok"]).inc();

                let rows = parser::parse_payload(&payload);
                let snap = InventorySnapshot {
                    input: key.to_string(),
                    fetched_at: Utc::now(),
                    rows,
                };
                info!(input = %key, rows = snap.rows.len(), ms, "inventory fetched");
                self.emit(Event::FetchOk {
                    input: key.to_string(),
                    rows: snap.rows.len(),
                    ms,
                });

                self.cache.lock().await.put(key, snap.clone());
                ViewResult {
                    snapshot: snap,
                    status: ViewStatus::Live,
                }
            }
            Err(err) => {
                FETCHES.with_label_values(&[err.metric_label()]).inc();
                warn!(input = %key, %err, "inventory fetch failed");
                self.emit(Event::FetchErr {
                    input: key.to_string(),
                    error: err.to_string(),
                });

                let prev = self.cache.lock().await.get(key).cloned();
                match prev {
                    Some(snap) => {
                        self.emit(Event::Fallback {
                            input: key.to_string(),
                            error: err.to_string(),
                        });
                        ViewResult {
                            snapshot: snap,
                            status: ViewStatus::Stale(err),
                        }
                    }
                    None => ViewResult {
                        snapshot: InventorySnapshot::empty(key),
                        status: ViewStatus::Unavailable(err),
                    },
                }
            }
        }
    }
}
