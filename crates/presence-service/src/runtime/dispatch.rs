//! Notification dispatcher
//!
//! Drains the detector's queue into a `NotificationSink`. Ends when every
//! sender is gone and the queue is empty.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use presence_core::traits::NotificationSink;
use presence_core::VoiceTransitionEvent;

/// Counts kept by one dispatcher run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Deliver events until the channel closes
pub async fn dispatch(
    mut rx: mpsc::Receiver<VoiceTransitionEvent>,
    sink: Arc<dyn NotificationSink>,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    while let Some(event) = rx.recv().await {
        match sink.notify(&event).await {
            Ok(()) => {
                stats.delivered += 1;
                debug!(
                    user_id = %event.user_id,
                    event_type = %event.event_type,
                    state = event.state,
                    "Notification delivered"
                );
            }
            Err(e) => {
                stats.failed += 1;
                warn!(user_id = %event.user_id, error = %e, "Notification failed");
            }
        }
    }

    info!(
        delivered = stats.delivered,
        failed = stats.failed,
        "Notification queue closed, dispatcher finished"
    );
    stats
}

pub fn spawn_dispatcher(
    rx: mpsc::Receiver<VoiceTransitionEvent>,
    sink: Arc<dyn NotificationSink>,
) -> JoinHandle<DispatchStats> {
    tokio::spawn(dispatch(rx, sink))
}
