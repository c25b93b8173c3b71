//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context and configuration.

use std::sync::Arc;

use presence_common::AppConfig;
use presence_service::{AggregateQueryEngine, QuerySettings, ServiceContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    query_settings: QuerySettings,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let query_settings = QuerySettings::from(&config);
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            query_settings,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Query engine bound to this state's context and lookback settings
    pub fn query_engine(&self) -> AggregateQueryEngine<'_> {
        AggregateQueryEngine::new(&self.service_context, self.query_settings)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("query_settings", &self.query_settings)
            .finish_non_exhaustive()
    }
}
