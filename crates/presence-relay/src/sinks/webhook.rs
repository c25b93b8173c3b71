//! JSON webhook notification sink

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use presence_core::traits::{NotificationSink, RepoResult};
use presence_core::{DomainError, VoiceTransitionEvent};

/// POSTs each event as JSON to a fixed URL
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("presence-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, url))
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    #[instrument(skip(self, event), fields(user_id = %event.user_id))]
    async fn notify(&self, event: &VoiceTransitionEvent) -> RepoResult<()> {
        let response = self
            .http
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| DomainError::NotifierError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::NotifierError(format!(
                "webhook returned {status}"
            )));
        }
        debug!(%status, "Webhook delivered");
        Ok(())
    }
}
