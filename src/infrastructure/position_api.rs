use crate::domain::errors::PollError;
use crate::domain::ports::PositionSource;
use crate::domain::position::RawPosition;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetches the current position from an HTTP JSON endpoint.
pub struct HttpPositionSource {
    client: Client,
    url: String,
}

impl HttpPositionSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PositionSource for HttpPositionSource {
    async fn fetch_position(&self, cancel: &CancellationToken) -> Result<RawPosition, PollError> {
        debug!("Fetching position from {}", self.url);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::cancelled()),
            result = self.client.get(&self.url).send() => result.map_err(|e| PollError::Transport {
                message: e.to_string(),
            })?,
        };

        let status = response.status();

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::cancelled()),
            result = response.bytes() => result.map_err(|e| PollError::Transport {
                message: e.to_string(),
            })?,
        };

        // Body is parsed before the status is checked, so a non-JSON error
        // page surfaces as a parse failure.
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| PollError::Parse {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: self.url.clone(),
                body,
            });
        }

        if !body.is_object() {
            return Err(PollError::Validation {
                reason: "payload is not a JSON object".to_string(),
                payload: body,
            });
        }

        serde_json::from_value::<RawPosition>(body.clone()).map_err(|e| PollError::Validation {
            reason: format!("payload is not a position object: {}", e),
            payload: body,
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
