use async_trait::async_trait;
use tracing::info;

use presence_core::traits::{NotificationSink, RepoResult};
use presence_core::VoiceTransitionEvent;

/// Logs each relayed transition as one structured line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, event: &VoiceTransitionEvent) -> RepoResult<()> {
        info!(
            guild_id = %event.guild_id,
            user_id = %event.user_id,
            display_name = %event.display_name,
            channel = %event.channel_name,
            event_type = %event.event_type,
            state = event.state,
            at = %event.timestamp,
            "Voice transition"
        );
        Ok(())
    }
}
