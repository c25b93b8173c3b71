//! Data transfer objects for the read API

pub mod requests;
pub mod responses;

pub use requests::VoiceTimeQuery;
pub use responses::{
    HeadcountResponse, HealthChecks, HealthResponse, RankEntryResponse, ReadinessResponse,
    VoiceCallStatusResponse, VoiceRankResponse, VoiceTimeResponse,
};
