use reqwest::{Client, Response, StatusCode, Url};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for HTTP client operations
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Response error: status={status}, body={body}")]
    ResponseError { status: StatusCode, body: String },
}

/// HTTP client wrapper for webhook delivery
#[derive(Debug, Clone)]
pub struct WebhookHttpClient {
    client: Client,
    timeout: Duration,
}

impl WebhookHttpClient {
    /// Create a new HTTP client with default timeout (10 seconds)
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_timeout(Duration::from_secs(10))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("EventStreamRelay/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpClientError::RequestFailed(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// POST a JSON document.
    ///
    /// Returns the status code and the response time in milliseconds. Any
    /// non-2xx status is an error.
    pub async fn post_json(&self, url: &Url, payload: String) -> Result<(u16, u64), HttpClientError> {
        debug!(url = %url, "Sending webhook");

        let start = Instant::now();

        let response = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Webhook request failed");
                self.classify(e)
            })?;

        let response_time_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        debug!(
            url = %url,
            status = %status.as_u16(),
            response_time_ms = %response_time_ms,
            "Webhook response received"
        );

        if !status.is_success() {
            let body = self.read_response_body(response).await?;
            return Err(HttpClientError::ResponseError { status, body });
        }

        Ok((status.as_u16(), response_time_ms))
    }

    fn classify(&self, err: reqwest::Error) -> HttpClientError {
        if err.is_timeout() {
            HttpClientError::Timeout(self.timeout)
        } else if err.is_connect() {
            HttpClientError::NetworkError(err.to_string())
        } else {
            HttpClientError::RequestFailed(err.to_string())
        }
    }

    /// Read response body with size limit
    async fn read_response_body(&self, response: Response) -> Result<String, HttpClientError> {
        // Error bodies only end up in logs
        const MAX_BODY_SIZE: usize = 4 * 1024;

        let bytes = response.bytes().await.map_err(|e| {
            HttpClientError::RequestFailed(format!("Failed to read response body: {e}"))
        })?;

        if bytes.len() > MAX_BODY_SIZE {
            debug!(
                size = bytes.len(),
                max_size = MAX_BODY_SIZE,
                "Response body too large, truncating"
            );
        }

        let body = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_BODY_SIZE)]).to_string();
        Ok(body)
    }

    /// Get configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parse and check a webhook URL up front.
pub fn parse_webhook_url(raw: &str) -> Result<Url, HttpClientError> {
    let url = Url::parse(raw).map_err(|e| HttpClientError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpClientError::InvalidUrl(format!(
            "{raw}: unsupported scheme {other}"
        ))),
    }
}
