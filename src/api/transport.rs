use async_trait::async_trait;
use reqwest::{header, Client};
use thiserror::Error;
use tracing::debug;

use super::client::RequestOptions;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// A response drained at the transport seam.
///
/// The underlying body is a one-shot stream, so it is consumed into text
/// exactly once here; everything downstream derives from that text.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl TransportResponse {
    /// Whether the response declared structured (JSON) content.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|c| c.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The capability to perform one HTTP-style exchange.
///
/// Injected into the pipeline so it can be tested without real network I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(
        &self,
        target: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport over reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Resolve a target against the base URL; absolute targets pass through.
    fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), target)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        target: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(target);
        debug!(url = %url, method = %options.method, "Sending request");

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(options.headers.clone());
        if let Some(ref body) = options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // Single read: the body stream is consumed here and nowhere else.
        let body = response.text().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_relative_targets() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(
            transport.resolve("/auth/login"),
            "http://localhost:8080/auth/login"
        );
    }

    #[test]
    fn test_resolve_passes_absolute_targets_through() {
        let transport = HttpTransport::new("http://localhost:8080").unwrap();
        assert_eq!(
            transport.resolve("https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_is_json_matches_declared_content_type() {
        let mut resp = TransportResponse {
            status: 200,
            status_text: "OK".to_string(),
            content_type: Some("application/json;charset=UTF-8".to_string()),
            body: "{}".to_string(),
        };
        assert!(resp.is_json());

        resp.content_type = Some("text/plain".to_string());
        assert!(!resp.is_json());

        resp.content_type = None;
        assert!(!resp.is_json());
    }
}
