// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Pipeline metrics --------
pub static FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "inventory_fetches_total",
            "transport fetches (labels: outcome = ok|timeout|status|network)",
        ),
        &["outcome"],
    )
    .unwrap()
});

pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "inventory_cache_lookups_total",
            "snapshot cache lookups (labels: result = hit|miss|stale)",
        ),
        &["result"],
    )
    .unwrap()
});

pub static ROWS_PARSED: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("inventory_rows_parsed_total", "rows parsed from payloads").unwrap());

pub static LINES_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "inventory_lines_skipped_total",
            "payload elements skipped (labels: reason = blank|short|bad_qty|bad_payload)",
        ),
        &["reason"],
    )
    .unwrap()
});

// Fetch latency (milliseconds)
pub static FETCH_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(HistogramOpts::new(
        "inventory_fetch_latency_ms",
        "Latency of a transport fetch (ms)",
    ))
    .unwrap()
});

// ---- Config visibility ----
pub static CONFIG_VALUE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "config_value",
            "effective config values (label: key = timeout_secs|cache_ttl_secs|low_threshold|top_warehouses)",
        ),
        &["key"],
    )
    .unwrap()
});

pub fn init() {
    // Register all metrics to the custom registry
    for m in [
        REGISTRY.register(Box::new(FETCHES.clone())),
        REGISTRY.register(Box::new(CACHE_LOOKUPS.clone())),
        REGISTRY.register(Box::new(ROWS_PARSED.clone())),
        REGISTRY.register(Box::new(LINES_SKIPPED.clone())),
        REGISTRY.register(Box::new(FETCH_LATENCY.clone())),
        REGISTRY.register(Box::new(CONFIG_VALUE.clone())),
    ] {
        let _ = m;
    }
}

// Encode all metrics in Prometheus text format
fn encode_metrics() -> Vec<u8> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() || buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    buf
}

// Serve one HTTP request (GET / or /metrics) — tiny HTTP 1.1 responder
fn handle_client(mut stream: TcpStream) {
    // Read a bit to consume headers (no full parse)
    let mut _req_buf = [0u8; 1024];
    let _ = stream.read(&mut _req_buf);

    let body = encode_metrics();
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

// Run the metrics server in a dedicated OS thread (keeps Tokio runtime clean)
pub async fn serve_metrics(port: u16) {
    thread::spawn(move || {
        let addr = format!("0.0.0.0:{port}");
        let listener = match TcpListener::bind(&addr) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(%addr, %e, "metrics bind failed, metrics disabled");
                return;
            }
        };
        tracing::info!("metrics listening on http://{addr}/ (and /metrics)");

        for conn in listener.incoming() {
            match conn {
                Ok(stream) => handle_client(stream),
                Err(e) => tracing::warn!(%e, "metrics accept error"),
            }
        }
    });
}
