//! Single-consumer background handlers for in-process queues.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::foundation::DomainError;

/// Handles items of one in-process queue, one at a time.
#[async_trait]
pub trait QueueConsumer<T: Send + 'static>: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn consume(&self, item: T) -> Result<(), DomainError>;
}

/// Drains `queue` into `consumer` until shutdown or until every sender is
/// dropped. A failed item is logged and dropped.
pub fn spawn_consumer<T: Send + 'static>(
    consumer: Arc<dyn QueueConsumer<T>>,
    mut queue: mpsc::UnboundedReceiver<T>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(consumer = consumer.name(), "Queue consumer started");
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                item = queue.recv() => {
                    let Some(item) = item else { break };
                    if let Err(e) = consumer.consume(item).await {
                        tracing::warn!(consumer = consumer.name(), error = %e, "Queue item failed");
                    }
                }
            }
        }
        tracing::info!(consumer = consumer.name(), "Queue consumer stopped");
    })
}
