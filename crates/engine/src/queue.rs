//! Bounded dispatch channel carrying job descriptors to the worker pool.
//!
//! Multi-producer, multi-consumer: any number of request handlers enqueue,
//! the worker pool shares a single receiver. FIFO per producer, which
//! preserves insertion order within a batch submission; no ordering is
//! promised across independent submissions.

use std::sync::Arc;
use std::time::Duration;

use facebytes_core::JobDescriptor;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::Mutex;

/// Enqueue failures. `submit` never blocks indefinitely on a full queue.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Dispatch queue is full")]
    Full,

    #[error("Dispatch queue is shut down")]
    Closed,
}

/// Create a bounded dispatch channel.
///
/// `enqueue_wait` bounds how long a producer may wait for space before
/// [`QueueError::Full`] is returned.
pub fn channel(capacity: usize, enqueue_wait: Duration) -> (JobSender, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        JobSender { tx, enqueue_wait },
        JobReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer half, cheap to clone.
#[derive(Clone)]
pub struct JobSender {
    tx: mpsc::Sender<JobDescriptor>,
    enqueue_wait: Duration,
}

impl JobSender {
    /// Enqueue a descriptor, applying backpressure for at most the
    /// configured wait before failing fast.
    pub async fn enqueue(&self, descriptor: JobDescriptor) -> Result<(), QueueError> {
        self.tx
            .send_timeout(descriptor, self.enqueue_wait)
            .await
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => QueueError::Full,
                SendTimeoutError::Closed(_) => QueueError::Closed,
            })
    }
}

/// Consumer half, shared by all workers in the pool.
///
/// Ownership of a dequeued descriptor transfers exclusively to the worker
/// that received it.
#[derive(Clone)]
pub struct JobReceiver {
    rx: Arc<Mutex<mpsc::Receiver<JobDescriptor>>>,
}

impl JobReceiver {
    /// Wait for the next descriptor. Returns `None` once the channel is
    /// closed and drained, which signals the worker to exit.
    pub async fn dequeue(&self) -> Option<JobDescriptor> {
        self.rx.lock().await.recv().await
    }
}
