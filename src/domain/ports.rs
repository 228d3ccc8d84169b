use crate::domain::errors::PollError;
use crate::domain::position::RawPosition;
use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Source of raw position payloads.
///
/// Implementations perform the fetch, parse and status checks and return
/// the parsed body on success. Validation is left to the caller.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch_position(&self, cancel: &CancellationToken) -> Result<RawPosition, PollError>;

    /// Human readable location of the source, used in logs.
    fn describe(&self) -> String;
}

/// A unit of work run repeatedly by the scheduler.
///
/// `cancel` is scoped to a single invocation.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    async fn run(&self, cancel: CancellationToken) -> Result<()>;

    fn name(&self) -> &str {
        "task"
    }
}
