//! Notification sinks for relayed voice transitions

mod log;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use presence_common::NotifyConfig;
use presence_core::traits::NotificationSink;

pub use log::LogSink;
pub use webhook::WebhookSink;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook when a URL is configured, otherwise structured logging
pub fn create_sink(config: &NotifyConfig) -> Result<Arc<dyn NotificationSink>, reqwest::Error> {
    match config.webhook_url.as_deref() {
        Some(url) => Ok(Arc::new(WebhookSink::new(url, WEBHOOK_TIMEOUT)?)),
        None => Ok(Arc::new(LogSink)),
    }
}
