//! Guild presence handlers
//!
//! Read-only views over the latest snapshots and the published ranking.

use axum::{
    extract::{Path, State},
    Json,
};
use presence_service::dto::{
    HeadcountResponse, VoiceCallStatusResponse, VoiceRankResponse, VoiceTimeQuery,
    VoiceTimeResponse,
};

use crate::extractors::{GuildIdPath, GuildUsernamePath, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Members currently in a voice call
///
/// GET /guilds/{guild_id}/oncall
pub async fn get_oncall_users(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<HeadcountResponse>> {
    let headcount = state.query_engine().get_oncall_users(path.guild_id()?).await?;
    Ok(Json(headcount.into()))
}

/// Members online but not in a call
///
/// GET /guilds/{guild_id}/online
pub async fn get_online_users(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<HeadcountResponse>> {
    let headcount = state.query_engine().get_online_users(path.guild_id()?).await?;
    Ok(Json(headcount.into()))
}

/// GET /guilds/{guild_id}/status
pub async fn get_voice_call_status(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<VoiceCallStatusResponse>> {
    let status = state
        .query_engine()
        .get_voice_call_status(path.guild_id()?)
        .await?;
    Ok(Json(status.into()))
}

/// GET /guilds/{guild_id}/rank
pub async fn get_voice_rank(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<VoiceRankResponse>> {
    let rank = state.query_engine().get_voice_rank(path.guild_id()?).await?;
    Ok(Json(rank.into()))
}

/// Cumulative voice time for one member since the start of a year
///
/// GET /guilds/{guild_id}/users/{username}/voice-time?year=YYYY
pub async fn get_user_voice_time(
    State(state): State<AppState>,
    Path(path): Path<GuildUsernamePath>,
    ValidatedQuery(query): ValidatedQuery<VoiceTimeQuery>,
) -> ApiResult<Json<VoiceTimeResponse>> {
    let guild_id = path.guild_id()?;
    let username = path.username()?;
    let year = query.year_or_current();

    let total = state
        .query_engine()
        .get_user_voice_time(
            username,
            guild_id,
            state.config().discord.ignored_channel_id,
            year,
        )
        .await?;

    Ok(Json(VoiceTimeResponse::new(guild_id, username, year, total)))
}
