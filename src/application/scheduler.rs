use crate::domain::ports::ScheduledTask;
use anyhow::{Context, Result, anyhow};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs a [`ScheduledTask`] on a fixed cadence.
///
/// The first invocation starts immediately. Each invocation is awaited
/// before the interval for the next one is armed, so runs never overlap and
/// a slow run only delays the schedule.
pub struct Scheduler;

impl Scheduler {
    /// Start the schedule on the current tokio runtime.
    ///
    /// Errors returned by the task, and panics inside it, are passed to
    /// `on_error`; the schedule keeps going either way.
    pub fn schedule<F>(
        task: Arc<dyn ScheduledTask>,
        interval: Duration,
        on_error: F,
    ) -> ScheduleHandle
    where
        F: Fn(anyhow::Error) + Send + Sync + 'static,
    {
        let shutdown = CancellationToken::new();
        let current: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
        let invocations = Arc::new(AtomicU64::new(0));

        let join = tokio::spawn(run_loop(
            task,
            interval,
            on_error,
            shutdown.clone(),
            current.clone(),
            invocations.clone(),
        ));

        ScheduleHandle {
            shutdown,
            current,
            invocations,
            join,
        }
    }
}

async fn run_loop<F>(
    task: Arc<dyn ScheduledTask>,
    interval: Duration,
    on_error: F,
    shutdown: CancellationToken,
    current: Arc<Mutex<Option<CancellationToken>>>,
    invocations: Arc<AtomicU64>,
) where
    F: Fn(anyhow::Error) + Send + Sync + 'static,
{
    let name = task.name().to_string();
    info!("Scheduler[{}]: started (interval: {:?})", name, interval);

    while !shutdown.is_cancelled() {
        // Child token: stopping the schedule also aborts the running invocation.
        let invocation = shutdown.child_token();
        *current.lock().unwrap_or_else(PoisonError::into_inner) = Some(invocation.clone());
        let run = invocations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Scheduler[{}]: invocation #{}", name, run);

        let task = task.clone();
        let result = tokio::spawn(async move { task.run(invocation).await }).await;

        *current.lock().unwrap_or_else(PoisonError::into_inner) = None;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => on_error(e),
            Err(join_err) => on_error(anyhow!("Task {} aborted: {}", name, join_err)),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!(
        "Scheduler[{}]: stopped after {} invocations",
        name,
        invocations.load(Ordering::SeqCst)
    );
}

/// Control handle for a running schedule
pub struct ScheduleHandle {
    shutdown: CancellationToken,
    current: Arc<Mutex<Option<CancellationToken>>>,
    invocations: Arc<AtomicU64>,
    join: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Abort the in-flight invocation, if any. Future runs are unaffected.
    ///
    /// Returns `true` when an invocation was running.
    pub fn cancel_current(&self) -> bool {
        match self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Stop scheduling. The in-flight invocation is cancelled and no further
    /// ticks fire.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Number of invocations started so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Wait for the scheduling loop to exit.
    pub async fn join(self) -> Result<()> {
        self.join.await.context("Scheduler loop terminated abnormally")
    }
}
