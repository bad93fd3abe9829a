// ===============================
// src/main.rs
// ===============================
//
// CLI consumer of the inventory pipeline: query one style, print the
// warehouse chips, the summary line, and the color x size matrix.
//
//   style-watcher ST01
//   style-watcher ST01 --force
//   style-watcher ST01 --warehouse 总仓
//   style-watcher ST01 --list-warehouses
//
// RUST_LOG / env config as in src/config.rs; metrics on METRICS_PORT.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use url::Url;

use style_watcher::config;
use style_watcher::domain::Event;
use style_watcher::metrics;
use style_watcher::pivot::{self, ALL_WAREHOUSES};
use style_watcher::recorder;
use style_watcher::render;
use style_watcher::{HttpTransport, InventoryService};

#[derive(Debug, Parser)]
#[command(name = "style-watcher", about = "Per-style inventory pivot viewer")]
struct Cli {
    /// Style name or code to query
    style: String,

    /// Bypass the snapshot cache and refetch
    #[arg(long)]
    force: bool,

    /// Show only this warehouse (default: all warehouses combined)
    #[arg(long)]
    warehouse: Option<String>,

    /// Print every warehouse in ranked order instead of the matrix
    #[arg(long)]
    list_warehouses: bool,
}

#[tokio::main]
async fn main() {
    // ---- Logging ----
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    // ---- Load config ----
    let cfg = config::load();
    // Malformed endpoint is a fatal startup condition
    let _ = Url::parse(&cfg.api_url).expect("INVENTORY_API_URL is not a valid URL");

    // ---- Metrics ----
    metrics::init();
    tokio::spawn(metrics::serve_metrics(cfg.metrics_port));
    metrics::CONFIG_VALUE
        .with_label_values(&["timeout_secs"])
        .set(cfg.timeout_secs as i64);
    metrics::CONFIG_VALUE
        .with_label_values(&["cache_ttl_secs"])
        .set(cfg.cache_ttl_secs);
    metrics::CONFIG_VALUE
        .with_label_values(&["low_threshold"])
        .set(cfg.low_threshold);
    metrics::CONFIG_VALUE
        .with_label_values(&["top_warehouses"])
        .set(cfg.top_warehouses as i64);

    info!(
        api_url = %cfg.api_url,
        timeout_secs = cfg.timeout_secs,
        cache_ttl_secs = cfg.cache_ttl_secs,
        low_threshold = cfg.low_threshold,
        top_warehouses = cfg.top_warehouses,
        "startup config"
    );

    // ---- Recorder (optional) ----
    let mut rec_handle = None;
    let mut rec_tx = None;
    if let Some(path) = cfg.record_file.clone() {
        let (tx, rx) = mpsc::channel::<Event>(8192);
        rec_handle = Some(tokio::spawn(recorder::run(rx, path)));
        rec_tx = Some(tx);
    }

    // ---- Service ----
    let transport = HttpTransport::new(&cfg.api_url, cfg.timeout_secs).expect("http client");
    let mut service = InventoryService::new(Arc::new(transport), cfg.cache_ttl_secs);
    if let Some(tx) = rec_tx.clone() {
        service = service.with_recorder(tx);
    }

    // ---- Query + render ----
    let res = service.get_view(&cli.style, cli.force).await;
    if let Some(err) = res.status.failure() {
        println!("{}", render::render_stale_notice(&err.to_string()));
    }

    let rows = &res.snapshot.rows;
    if cli.list_warehouses {
        for (i, wh) in pivot::ranked_warehouses(rows, usize::MAX).iter().enumerate() {
            println!("{}. {}", i + 1, wh);
        }
    } else {
        let top = pivot::ranked_warehouses(rows, cfg.top_warehouses);
        println!("{}", render::render_warehouse_chips(&top));

        let wh_key = cli.warehouse.as_deref().unwrap_or(ALL_WAREHOUSES);
        let view = pivot::filter_by_warehouse(rows, wh_key);
        let summary = pivot::summarize(&view, cfg.low_threshold);
        println!("{}", render::render_summary(&res.snapshot, wh_key, &summary));
        print!("{}", render::render_matrix(&view));
    }

    // ---- Shutdown: let the recorder drain ----
    drop(service);
    drop(rec_tx);
    if let Some(handle) = rec_handle {
        let _ = handle.await;
    }
}
