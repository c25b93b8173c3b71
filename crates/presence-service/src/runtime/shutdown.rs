//! Shutdown signalling
//!
//! One `ShutdownTrigger` fans out to any number of `Shutdown` handles over a
//! `watch` channel. Dropping the trigger counts as triggering it.

use std::future::Future;

use tokio::sync::watch;

use presence_core::{DomainError, RepoResult};

/// Sending half; fires once
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Receiving half, cheap to clone
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: Option<watch::Receiver<bool>>,
}

/// Create a connected trigger/handle pair
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx: Some(rx) })
}

impl ShutdownTrigger {
    /// Signal every handle
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Another handle for the same signal
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: Some(self.tx.subscribe()),
        }
    }
}

impl Shutdown {
    /// A handle that never fires
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_triggered(&self) -> bool {
        self.rx
            .as_ref()
            .is_some_and(|rx| *rx.borrow() || rx.has_changed().is_err())
    }

    /// Resolve once shutdown has been signalled
    pub async fn wait(&mut self) {
        match self.rx.as_mut() {
            // Err means the trigger was dropped
            Some(rx) => {
                let _ = rx.wait_for(|triggered| *triggered).await;
            }
            None => std::future::pending().await,
        }
    }

    /// Race a collaborator call against shutdown. When shutdown wins the call
    /// is dropped and `DomainError::Cancelled` is returned.
    pub async fn guard<T, F>(&self, call: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        let mut signal = self.clone();
        tokio::select! {
            biased;
            () = signal.wait() => Err(DomainError::Cancelled),
            result = call => result,
        }
    }
}
