// ===============================
// src/config.rs
// ===============================
use std::env;

use dotenvy::dotenv;

/// In-house endpoint of the pilot deployment; override with INVENTORY_API_URL.
const DEFAULT_API_URL: &str = "http://192.168.40.97:8000/inventory";

const DEFAULT_TIMEOUT_SECS: u64 = 4;
const DEFAULT_LOW_THRESHOLD: i64 = 10;
const DEFAULT_CACHE_TTL_SECS: i64 = 300;
const DEFAULT_TOP_WAREHOUSES: usize = 3;
const DEFAULT_METRICS_PORT: u16 = 9898;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub low_threshold: i64,
    pub cache_ttl_secs: i64,
    pub top_warehouses: usize,
    pub metrics_port: u16,
    pub record_file: Option<String>,
}

/// Fetch timeout floor: anything below 1s is bumped up to 1s.
pub fn clamp_timeout(secs: u64) -> u64 {
    secs.max(1)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

pub fn load() -> Config {
    // Make sure .env is read (INVENTORY_API_URL, RECORD_FILE, ...)
    let _ = dotenv();

    let api_url = env::var("INVENTORY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let timeout_secs = clamp_timeout(env_parse("INVENTORY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));
    let low_threshold = env_parse("INVENTORY_LOW_THRESHOLD", DEFAULT_LOW_THRESHOLD);
    let cache_ttl_secs = env_parse("INVENTORY_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS);
    let top_warehouses = env_parse("INVENTORY_TOP_WAREHOUSES", DEFAULT_TOP_WAREHOUSES);
    let metrics_port = env_parse("METRICS_PORT", DEFAULT_METRICS_PORT);
    let record_file = env::var("RECORD_FILE").ok();

    Config {
        api_url,
        timeout_secs,
        low_threshold,
        cache_ttl_secs,
        top_warehouses,
        metrics_port,
        record_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_floor_is_one_second() {
        assert_eq!(clamp_timeout(0), 1);
        assert_eq!(clamp_timeout(1), 1);
        assert_eq!(clamp_timeout(4), 4);
    }
}
