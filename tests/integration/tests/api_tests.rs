//! API Integration Tests
//!
//! Run the read API over an in-memory store; no external services needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{Datelike, Duration, TimeZone, Utc};
use integration_tests::{
    assert_json, assert_status, fixtures::*, TestServer, AFK_CHANNEL_ID, TEST_GUILD_ID,
};
use presence_core::MeasurementKind;
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_follows_store() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    server.store.set_unavailable(true);
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["checks"]["store"], "unhealthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Headcount Tests
// ============================================================================

#[tokio::test]
async fn test_oncall_latest_snapshot() {
    let server = TestServer::start().await.unwrap();
    seed_snapshot(&server.store, MeasurementKind::Oncall, &["Alice"], Duration::seconds(90))
        .await
        .unwrap();
    seed_snapshot(&server.store, MeasurementKind::Oncall, &["Alice", "Bob"], Duration::seconds(30))
        .await
        .unwrap();

    let response = server.get(&server.guild_path("/oncall")).await.unwrap();
    let body: HeadcountBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.guild_name, "Test Guild");
    assert_eq!(body.count, 2);
    assert_eq!(body.members, "Alice,Bob");
}

#[tokio::test]
async fn test_empty_status_keeps_sentinel_asymmetry() {
    let server = TestServer::start().await.unwrap();
    seed_snapshot(&server.store, MeasurementKind::Oncall, &[], Duration::seconds(5))
        .await
        .unwrap();
    seed_snapshot(&server.store, MeasurementKind::Online, &[], Duration::seconds(5))
        .await
        .unwrap();

    let response = server.get(&server.guild_path("/status")).await.unwrap();
    let body: StatusBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.oncall.count, 0);
    assert_eq!(body.oncall.members, "Empty Discord. Crowded streets.");
    assert_eq!(body.online.count, 0);
    assert_eq!(body.online.members, "");
}

#[tokio::test]
async fn test_quiet_guild_is_not_found() {
    let server = TestServer::start().await.unwrap();
    seed_snapshot(&server.store, MeasurementKind::Online, &["Alice"], Duration::minutes(30))
        .await
        .unwrap();

    let response = server.get(&server.guild_path("/online")).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "SNAPSHOT_NOT_FOUND");
}

#[tokio::test]
async fn test_store_failure_is_bad_gateway() {
    let server = TestServer::start().await.unwrap();
    server.store.set_unavailable(true);

    let response = server.get(&server.guild_path("/oncall")).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_GATEWAY).await.unwrap();
    assert_eq!(body.error.code, "STORE_ERROR");
}

#[tokio::test]
async fn test_invalid_guild_id() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/guilds/general/oncall").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[tokio::test]
async fn test_voice_rank() {
    let server = TestServer::start().await.unwrap();
    seed_ranking(&server.store, &[("Alice", 300), ("Carol", 300), ("Bob", 100)])
        .await
        .unwrap();

    let response = server.get(&server.guild_path("/rank")).await.unwrap();
    let body: RankBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.guild_name, "Test Guild");
    assert_eq!(body.user_count, 3);
    assert_eq!(body.total_seconds, 700);
    assert_eq!(body.ranking, "Alice:300,Carol:300,Bob:100");

    let names: Vec<_> = body
        .entries
        .iter()
        .map(|e| (e.position, e.display_name.as_str(), e.seconds))
        .collect();
    assert_eq!(names, vec![(1, "Alice", 300), (2, "Carol", 300), (3, "Bob", 100)]);
}

#[tokio::test]
async fn test_missing_rank_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let response = server.get(&server.guild_path("/rank")).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Voice Time Tests
// ============================================================================

#[tokio::test]
async fn test_user_voice_time_excludes_ignored_channel() {
    let server = TestServer::start().await.unwrap();
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
    let at = |secs: i64| base + Duration::seconds(secs);

    for (channel, state, secs) in [
        (10, true, 0),
        (10, false, 600),
        (AFK_CHANNEL_ID, true, 700),
        (AFK_CHANNEL_ID, false, 4000),
        (10, true, 5000),
    ] {
        seed_voice(&server.store, "alice", channel, state, at(secs))
            .await
            .unwrap();
    }

    let response = server
        .get(&server.guild_path("/users/alice/voice-time?year=2024"))
        .await
        .unwrap();
    let body: VoiceTimeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.guild_id, TEST_GUILD_ID.to_string());
    assert_eq!(body.username, "alice");
    assert_eq!(body.year, 2024);
    assert_eq!(body.total_seconds, 600);
}

#[tokio::test]
async fn test_voice_time_defaults_to_current_year() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .get(&server.guild_path("/users/nobody/voice-time"))
        .await
        .unwrap();
    let body: VoiceTimeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.year, Utc::now().year());
    assert_eq!(body.total_seconds, 0);
}

#[tokio::test]
async fn test_voice_time_rejects_bad_year() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&server.guild_path("/users/alice/voice-time?year=1999"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server
        .get(&server.guild_path("/users/alice/voice-time?year=soon"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_QUERY_PARAMETER");
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_graceful_stop() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let addr = server.addr;
    server.stop().await.unwrap();

    let client = reqwest::Client::new();
    assert!(client.get(format!("http://{addr}/health")).send().await.is_err());
}
