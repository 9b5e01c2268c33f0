//! The I/O seam between request shapes and the network.
//!
//! The sync client is generic over `Transport`, so the fallback protocol
//! and cache contract can be exercised against a scripted transport
//! without a live server.

use tracing::debug;

use crate::error::SyncResult;
use crate::shape::RequestShape;

/// Raw result of one request attempt.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a request shape against the remote store.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, shape: &RequestShape) -> SyncResult<RawResponse>;
}

/// reqwest-backed transport against a configured base URL.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> HttpTransport {
        HttpTransport {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, shape: &RequestShape) -> SyncResult<RawResponse> {
        let url = format!("{}{}", self.base_url, shape.path);
        debug!(method = %shape.method, %url, "executing request");

        let mut request = self.http.request(shape.method.clone(), &url);
        if let Some(body) = &shape.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
