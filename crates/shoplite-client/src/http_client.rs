//! HTTP transport for the Shoplite QA service.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{AnswerResult, AskRequest, Endpoint};
use crate::QaClient;

/// Seconds a single exchange may take before it is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client for a remote Shoplite QA service.
///
/// One request per question, no retries. The only suspension point of the
/// whole program is the `send` below, bounded by the per-request timeout;
/// an in-flight call cannot be cancelled earlier.
pub struct HttpQaClient {
    endpoint: Endpoint,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpQaClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            ClientError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl QaClient for HttpQaClient {
    async fn ask(&self, question: &str) -> Result<AnswerResult, ClientError> {
        let chat_url = self.endpoint.join("/chat");
        log::debug!("POST {chat_url}");

        let response = self
            .client
            .post(&chat_url)
            .timeout(self.timeout)
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            // Non-200 bodies are surfaced verbatim, not parsed as JSON.
            let body = response.text().await.unwrap_or_default();
            log::warn!("service returned status {status}");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
