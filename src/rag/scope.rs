//! Per-request cancellation and deadline
//!
//! Every awaited collaborator or store call runs through
//! [`RequestScope::guard`]. When the scope fires first, the in-flight future
//! is dropped, which aborts the HTTP request or store query underneath it.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::errors::{RagError, Result};

/// Pipeline stages, as named in errors and logs
pub mod stage {
    pub const EMBED: &str = "embed";
    pub const SEARCH: &str = "search";
    pub const RERANK: &str = "rerank";
    pub const ANSWER: &str = "answer";
    pub const INSERT: &str = "insert";
    pub const LOOKUP: &str = "lookup";
}

/// Cancellation signal and optional deadline for one request
#[derive(Debug, Clone)]
pub struct RequestScope {
    cancelled: watch::Receiver<bool>,
    deadline: Option<(Instant, Duration)>,
}

/// Fires the paired [`RequestScope`]
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl RequestScope {
    /// A scope that never fires
    pub fn unbounded() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self {
            cancelled: receiver,
            deadline: None,
        }
    }

    /// A scope that fires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::unbounded().deadline_in(timeout)
    }

    /// A cancellable scope and the handle that cancels it
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                cancelled: receiver,
                deadline: None,
            },
            CancelHandle { sender },
        )
    }

    /// Add (or replace) a deadline `timeout` from now
    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Run `future` unless the scope is cancelled or its deadline passes first
    pub async fn guard<F, T>(&self, stage: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(RagError::Cancelled { stage });
        }

        let mut cancelled = self.cancelled.clone();
        let deadline = async {
            match self.deadline {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = wait_for_cancel(&mut cancelled) => {
                tracing::warn!(stage, "request cancelled");
                Err(RagError::Cancelled { stage })
            }
            _ = deadline => {
                let timeout_ms = self
                    .deadline
                    .map(|(_, timeout)| timeout.as_millis() as u64)
                    .unwrap_or_default();
                tracing::warn!(stage, timeout_ms, "request deadline exceeded");
                Err(RagError::DeadlineExceeded { stage, timeout_ms })
            }
            result = future => result,
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Resolves once the flag flips to true. Never resolves if the sender is gone.
async fn wait_for_cancel(receiver: &mut watch::Receiver<bool>) {
    loop {
        if *receiver.borrow_and_update() {
            return;
        }
        if receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
