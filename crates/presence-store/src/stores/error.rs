//! Store error type and its mapping into the domain

use presence_core::DomainError;

/// Failures talking to a time-series backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not encode point: {0}")]
    Encode(String),

    #[error("Could not decode query result: {0}")]
    Decode(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Trim long response bodies so errors stay loggable
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        const MAX_BODY: usize = 512;
        let body = match body.char_indices().nth(MAX_BODY) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::Status {
            status: status.as_u16(),
            body,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::StoreError(err.to_string())
    }
}
