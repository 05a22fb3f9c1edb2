use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

// ── Constants ────────────────────────────────────────────────────────────────

const USER_AGENT: &str = "album-images-api/1.0";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REDIRECTS: usize = 10;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch album content with status: {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Request(String),
}

// ── Fetcher seam ─────────────────────────────────────────────────────────────

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the response body as text.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

// ── reqwest implementation ───────────────────────────────────────────────────

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, insecure_ssl: bool) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let mut builder = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if insecure_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Request(format!("TimeoutError: {}", e))
            } else if e.is_connect() {
                FetchError::Request(format!("ConnectError: {}", e))
            } else {
                FetchError::Request(format!("RequestError: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        tracing::debug!(url, %status, final_url = %response.url(), "fetched album page");

        response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))
    }
}
