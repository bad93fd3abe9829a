// ===============================
// src/client.rs
// ===============================
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    pub fn metric_label(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Status(_) => "status",
            TransportError::Network(_) => "network",
        }
    }
}

/// The one expensive/unreliable step of the pipeline: given a query string,
/// return the raw payload text or fail. Everything downstream is local.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_raw(&self, query: &str) -> Result<String, TransportError>;
}

/// GET `{base}?style_name={query}` against the inventory endpoint, with the
/// configured timeout baked into the client.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(api_url: &str, timeout_secs: u64) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn url_for(&self, query: &str) -> String {
        format!("{}?style_name={}", self.base_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_raw(&self, query: &str) -> Result<String, TransportError> {
        let url = self.url_for(query);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout_secs)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        resp.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout_secs)
            } else {
                TransportError::Network(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_url_encoded_onto_the_base() {
        let t = HttpTransport::new("http://host:8000/inventory/", 4).unwrap();
        assert_eq!(
            t.url_for("款式 A/B"),
            "http://host:8000/inventory?style_name=%E6%AC%BE%E5%BC%8F%20A%2FB"
        );
    }
}
