//! Request DTOs for API endpoints
//!
//! Query strings implement `Deserialize` and `Validate`.

use chrono::{Datelike, Utc};
use serde::Deserialize;
use validator::Validate;

/// `?year=` for the voice-time endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VoiceTimeQuery {
    #[validate(range(min = 2015, max = 9999, message = "Year must be between 2015 and 9999"))]
    pub year: Option<i32>,
}

impl VoiceTimeQuery {
    /// Requested year, defaulting to the current one
    pub fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }
}
