//! Bounded wait on a background lookup
//!
//! A [`SideFetch`] runs a future on its own task and hands the single result
//! back through a oneshot channel. The waiter gives up after a fixed bound;
//! the task is left running and its late result is dropped on send.

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;

/// How a side fetch ended, from the waiter's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideFetchOutcome<T> {
    /// The task reported within the bound
    Completed(T),
    /// The bound elapsed first
    TimedOut,
    /// The task ended without reporting (it panicked)
    Dropped,
}

/// Handle to a launched side fetch
#[derive(Debug)]
pub struct SideFetch<T> {
    rx: oneshot::Receiver<T>,
}

impl<T: Send + 'static> SideFetch<T> {
    /// Spawn `fetch` on the runtime and return a handle to its result
    pub fn launch<F>(fetch: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = fetch.await;
            if tx.send(result).is_err() {
                tracing::debug!("Side fetch finished after its waiter gave up; result discarded");
            }
        });
        Self { rx }
    }

    /// Wait at most `bound` for the result
    pub async fn wait(self, bound: Duration) -> SideFetchOutcome<T> {
        match tokio::time::timeout(bound, self.rx).await {
            Ok(Ok(result)) => SideFetchOutcome::Completed(result),
            Ok(Err(_)) => SideFetchOutcome::Dropped,
            Err(_) => SideFetchOutcome::TimedOut,
        }
    }
}
