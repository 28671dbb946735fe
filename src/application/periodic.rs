//! Periodic background tasks.
//!
//! A task exposes one iteration through [`PeriodicTask::run_once`] so tests
//! can drive it deterministically; [`spawn_periodic`] runs it on a timer until
//! the shutdown signal flips.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait PeriodicTask: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Delay between iterations.
    fn interval(&self) -> Duration;

    /// One full iteration.
    async fn run_once(&self) -> Result<(), DomainError>;
}

/// Runs `task` immediately and then once per interval.
///
/// A failed iteration is logged and the next tick retries from scratch.
/// Shutdown is observed between iterations; an iteration in flight completes.
pub fn spawn_periodic(task: Arc<dyn PeriodicTask>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(task.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(task = task.name(), interval_secs = task.interval().as_secs(), "Periodic task started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = task.run_once().await {
                        tracing::error!(task = task.name(), error = %e, "Periodic iteration failed");
                    }
                }
            }
        }

        tracing::info!(task = task.name(), "Periodic task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTask {
        runs: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PeriodicTask for CountingTask {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn interval(&self) -> Duration {
            Duration::from_millis(10)
        }

        async fn run_once(&self) -> Result<(), DomainError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DomainError::new(ErrorCode::DatabaseError, "boom"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_until_shutdown() {
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
            fail: false,
        });
        let (tx, rx) = watch::channel(false);
        let handle = spawn_periodic(task.clone(), rx);

        time::sleep(Duration::from_millis(55)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let runs = task.runs.load(Ordering::SeqCst);
        assert!(runs >= 2, "expected several iterations, got {}", runs);

        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(task.runs.load(Ordering::SeqCst), runs);
    }

    #[tokio::test]
    async fn failing_iteration_does_not_stop_loop() {
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
            fail: true,
        });
        let (tx, rx) = watch::channel(false);
        let handle = spawn_periodic(task.clone(), rx);

        time::sleep(Duration::from_millis(35)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(task.runs.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn dropped_sender_stops_loop() {
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
            fail: false,
        });
        let (tx, rx) = watch::channel(false);
        let handle = spawn_periodic(task, rx);
        drop(tx);

        handle.await.unwrap();
    }
}
