use crate::domain::errors::PollError;
use crate::domain::ports::{PositionSource, ScheduledTask};
use crate::domain::position::{PositionReading, ValidationPolicy};
use crate::infrastructure::observability::Metrics;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Polls a [`PositionSource`] and publishes the reading to the position
/// gauges.
///
/// Built once at startup; every call to [`poll`](Self::poll) is one tick.
pub struct PositionPoller {
    source: Arc<dyn PositionSource>,
    metrics: Metrics,
    policy: ValidationPolicy,
}

impl PositionPoller {
    pub fn new(
        source: Arc<dyn PositionSource>,
        metrics: Metrics,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            source,
            metrics,
            policy,
        }
    }

    /// Run one poll. Never fails: errors are logged and the gauges keep
    /// their previous values.
    pub async fn poll(&self, cancel: CancellationToken) {
        if let Err(e) = self.try_poll(cancel).await {
            self.log_failure(&e);
        }
    }

    /// Run one poll and return its outcome.
    ///
    /// Gauges are only written when every step succeeds.
    pub async fn try_poll(&self, cancel: CancellationToken) -> Result<PositionReading, PollError> {
        let _timer = self.metrics.poll_duration_seconds.start_timer();

        let outcome = match self.source.fetch_position(&cancel).await {
            Ok(raw) => raw.validate(self.policy),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(reading) => {
                self.metrics.set_position(&reading);
                self.metrics.inc_polls("success");
                debug!("Position updated: {}", reading);
                Ok(reading)
            }
            Err(e) => {
                self.metrics.inc_polls(e.kind());
                Err(e)
            }
        }
    }

    fn log_failure(&self, err: &PollError) {
        let source = self.source.describe();
        match err {
            PollError::Transport { message } | PollError::Parse { message } => {
                error!(
                    source = %source,
                    kind = err.kind(),
                    "Failed to fetch position: {}",
                    message
                );
            }
            PollError::Status {
                status,
                status_text,
                body,
                ..
            } => {
                error!(
                    source = %source,
                    status = *status,
                    response = %body,
                    "Failed to fetch position: {}",
                    status_text
                );
            }
            PollError::Validation { reason, payload } => {
                error!(
                    source = %source,
                    reason = %reason,
                    data = %payload,
                    "Unexpected payload"
                );
            }
        }
    }
}

#[async_trait]
impl ScheduledTask for PositionPoller {
    async fn run(&self, cancel: CancellationToken) -> Result<()> {
        self.poll(cancel).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "position-poller"
    }
}
