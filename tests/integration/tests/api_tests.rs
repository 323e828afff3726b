//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: TEST_DATABASE_URL (or DATABASE_URL)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer, TEST_API_KEY,
};
use reqwest::StatusCode;
use track_api::handlers::pixel::TRACKING_PIXEL;
use uuid::Uuid;

/// Register a track and parse the response
async fn create_track(server: &TestServer, request: &CreateTrackRequest) -> TrackResponse {
    let response = server
        .post_auth("/api/tracks", request)
        .await
        .expect("Request failed");
    assert_json(response, StatusCode::CREATED)
        .await
        .expect("Create track failed")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ok");
}

// ============================================================================
// Pixel Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_pixel_known_and_unknown_ids_are_indistinguishable() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    let known = server.fetch_pixel(&track.id).await.expect("Request failed");
    let unknown = server
        .fetch_pixel(&Uuid::new_v4().to_string())
        .await
        .expect("Request failed");
    let malformed = server
        .fetch_pixel("not-a-valid-id")
        .await
        .expect("Request failed");

    for response in [known, unknown, malformed] {
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/gif");
        assert_eq!(
            response.headers()["cache-control"],
            "no-cache, no-store, must-revalidate"
        );
        let bytes = response.bytes().await.expect("Body read failed");
        assert_eq!(bytes.as_ref(), TRACKING_PIXEL.as_slice());
    }
}

#[tokio::test]
async fn test_opens_within_suppression_window_are_stored_but_not_genuine() {
    if !check_test_env().await {
        return;
    }

    // Default config: 5 second suppression window
    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    for _ in 0..3 {
        let response = server.fetch_pixel(&track.id).await.expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = server
        .get_auth(&format!("/api/tracks/{}/opens", track.id))
        .await
        .expect("Request failed");
    let opens: Vec<OpenEventResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(opens.len(), 3);
    assert!(opens.iter().all(|open| !open.genuine));

    let response = server
        .get_auth(&format!("/api/tracks/{}", track.id))
        .await
        .expect("Request failed");
    let summary: TrackSummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(summary.open_count, 3);
    assert_eq!(summary.genuine_open_count, 0);
    assert!(!summary.opened);
}

#[tokio::test]
async fn test_open_outside_suppression_window_is_genuine() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_without_suppression()
        .await
        .expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    let response = server.fetch_pixel(&track.id).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .get_auth(&format!("/api/tracks/{}/opens", track.id))
        .await
        .expect("Request failed");
    let opens: Vec<OpenEventResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(opens.len(), 1);
    assert!(opens[0].genuine);
    assert!(opens[0].proxy.is_none());
    assert_eq!(opens[0].ip_address.as_deref(), Some("127.0.0.1"));

    let response = server
        .get_auth(&format!("/api/tracks/{}", track.id))
        .await
        .expect("Request failed");
    let summary: TrackSummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(summary.genuine_open_count, 1);
    assert!(summary.opened);
    assert!(summary.first_open_at.is_some());
    assert!(summary.last_open_at.is_some());
}

#[tokio::test]
async fn test_proxy_range_open_is_stored_but_not_genuine() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_without_suppression()
        .await
        .expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    // 17.0.0.0/8 is in the default Apple Mail Privacy Protection ranges
    let response = server
        .fetch_pixel_from(&track.id, "17.1.2.3")
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .get_auth(&format!("/api/tracks/{}/opens", track.id))
        .await
        .expect("Request failed");
    let opens: Vec<OpenEventResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(opens.len(), 1);
    assert_eq!(opens[0].proxy.as_deref(), Some("apple"));
    assert!(!opens[0].genuine);

    let response = server
        .get_auth(&format!("/api/tracks/{}", track.id))
        .await
        .expect("Request failed");
    let summary: TrackSummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(summary.open_count, 1);
    assert_eq!(summary.genuine_open_count, 0);
}

#[tokio::test]
async fn test_opens_listed_newest_first() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    server.fetch_pixel(&track.id).await.expect("Request failed");
    server.fetch_pixel(&track.id).await.expect("Request failed");

    let response = server
        .get_auth(&format!("/api/tracks/{}/opens", track.id))
        .await
        .expect("Request failed");
    let opens: Vec<OpenEventResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(opens.len(), 2);
    assert!(opens[0].opened_at >= opens[1].opened_at);
    assert!(opens[0].id > opens[1].id);
}

// ============================================================================
// Track CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_create_track_returns_pixel_url() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateTrackRequest::unique();
    let track = create_track(&server, &request).await;

    assert_eq!(track.recipient, request.recipient);
    assert_eq!(track.subject, request.subject);
    assert!(!track.pinned);
    assert_eq!(
        track.pixel_url,
        format!("http://tracker.test/p/{}.gif", track.id)
    );
    assert!(track.html_snippet.contains(&track.pixel_url));
    // The opaque id must not leak the recipient address
    assert!(Uuid::parse_str(&track.id).is_ok());
}

#[tokio::test]
async fn test_create_track_with_empty_body() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::default()).await;

    assert!(track.recipient.is_none());
    assert!(track.subject.is_none());
    assert!(track.pixel_url.ends_with(".gif"));
}

#[tokio::test]
async fn test_create_track_validation_error() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateTrackRequest {
        recipient: Some("a".repeat(300)),
        ..Default::default()
    };

    let response = server
        .post_auth("/api/tracks", &request)
        .await
        .expect("Request failed");
    let body: ErrorBody = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_unknown_track_returns_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let unknown = Uuid::new_v4();

    for path in [
        format!("/api/tracks/{unknown}"),
        format!("/api/tracks/{unknown}/opens"),
    ] {
        let response = server.get_auth(&path).await.expect("Request failed");
        let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
        assert_eq!(body.error.code, "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_invalid_track_id_is_bad_request() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get_auth("/api/tracks/not-a-uuid")
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_update_track_pinned_and_notes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;

    let update = UpdateTrackRequest {
        pinned: Some(true),
        notes: Some("Followed up by phone".to_string()),
    };
    let response = server
        .patch_auth(&format!("/api/tracks/{}", track.id), &update)
        .await
        .expect("Request failed");
    let updated: TrackSummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(updated.pinned);
    assert_eq!(updated.notes.as_deref(), Some("Followed up by phone"));
    // Untouched fields survive
    assert_eq!(updated.recipient, track.recipient);
}

#[tokio::test]
async fn test_delete_track_cascades_and_pixel_still_responds() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;
    server.fetch_pixel(&track.id).await.expect("Request failed");

    let response = server
        .delete_auth(&format!("/api/tracks/{}", track.id))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // The record and its opens are gone
    let response = server
        .get_auth(&format!("/api/tracks/{}", track.id))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth(&format!("/api/tracks/{}/opens", track.id))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // But the pixel never reveals the deletion
    let response = server.fetch_pixel(&track.id).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.bytes().await.expect("Body read failed");
    assert_eq!(bytes.as_ref(), TRACKING_PIXEL.as_slice());
}

#[tokio::test]
async fn test_list_tracks_with_filters() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateTrackRequest::unique();
    let recipient = request.recipient.clone().unwrap();
    let track = create_track(&server, &request).await;

    // Free-text search narrows a shared database down to this test's track
    let response = server
        .get_auth(&format!("/api/tracks?q={recipient}"))
        .await
        .expect("Request failed");
    let tracks: Vec<TrackSummaryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, track.id);

    // Nothing has fetched the pixel yet
    let response = server
        .get_auth(&format!("/api/tracks?q={recipient}&opened=true"))
        .await
        .expect("Request failed");
    let tracks: Vec<TrackSummaryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tracks.is_empty());

    server.fetch_pixel(&track.id).await.expect("Request failed");

    let response = server
        .get_auth(&format!("/api/tracks?q={recipient}&opened=true"))
        .await
        .expect("Request failed");
    let tracks: Vec<TrackSummaryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(tracks.len(), 1);

    // Date filter in the future excludes it
    let response = server
        .get_auth(&format!(
            "/api/tracks?q={recipient}&created_after=2999-01-01T00:00:00Z"
        ))
        .await
        .expect("Request failed");
    let tracks: Vec<TrackSummaryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tracks.is_empty());
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_api_requires_key() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    for path in ["/api/tracks", "/api/stats", "/api/recipients"] {
        let response = server.get(path).await.expect("Request failed");
        let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(body.error.code, "MISSING_API_KEY");
    }

    let response = server
        .post("/api/tracks", &CreateTrackRequest::unique())
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_api_rejects_wrong_key() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let url = format!("{}/api/tracks", server.base_url());
    let response = server
        .client
        .get(&url)
        .header("x-api-key", format!("{TEST_API_KEY}-wrong"))
        .send()
        .await
        .expect("Request failed");

    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(body.error.code, "INVALID_API_KEY");
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
async fn test_global_stats_invariants() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_without_suppression()
        .await
        .expect("Failed to start server");
    let track = create_track(&server, &CreateTrackRequest::unique()).await;
    server.fetch_pixel(&track.id).await.expect("Request failed");

    let response = server.get_auth("/api/stats").await.expect("Request failed");
    let stats: StatsResponse = assert_json(response, StatusCode::OK).await.unwrap();

    // The database is shared, so assert invariants rather than exact counts
    assert!(stats.total_tracks >= 1);
    assert!(stats.genuine_opens >= 1);
    assert!(stats.total_opens >= stats.genuine_opens);
    assert!(stats.tracks_with_opens >= stats.tracks_with_genuine_opens);
    assert!(stats.tracks_with_genuine_opens >= 1);
    assert!((0.0..=1.0).contains(&stats.open_rate));
    assert_eq!(stats.opens_by_hour.len(), 24);
    assert_eq!(stats.opens_by_weekday.len(), 7);
    assert!(stats.opens_by_hour.iter().sum::<i64>() >= 1);
    assert!(stats.opens_by_weekday.iter().sum::<i64>() >= 1);
}

// ============================================================================
// Recipient Engagement Tests
// ============================================================================

async fn recipient_entry(
    server: &TestServer,
    recipient: &str,
) -> Option<RecipientEngagementResponse> {
    let response = server
        .get_auth("/api/recipients")
        .await
        .expect("Request failed");
    let recipients: Vec<RecipientEngagementResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    recipients.into_iter().find(|r| r.recipient == recipient)
}

#[tokio::test]
async fn test_recipient_with_no_opens_scores_zero() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let recipient = CreateTrackRequest::unique_recipient("silent");
    create_track(&server, &CreateTrackRequest::for_recipient(&recipient)).await;

    let entry = recipient_entry(&server, &recipient)
        .await
        .expect("Recipient missing from ranking");

    assert_eq!(entry.tracks_sent, 1);
    assert_eq!(entry.tracks_opened, 0);
    assert_eq!(entry.genuine_opens, 0);
    assert!(entry.last_open_at.is_none());
    assert_eq!(entry.engagement_score, 0.0);
}

#[tokio::test]
async fn test_engagement_score_increases_with_additional_open() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_without_suppression()
        .await
        .expect("Failed to start server");
    let recipient = CreateTrackRequest::unique_recipient("engaged");
    let track = create_track(&server, &CreateTrackRequest::for_recipient(&recipient)).await;

    server.fetch_pixel(&track.id).await.expect("Request failed");
    let first = recipient_entry(&server, &recipient)
        .await
        .expect("Recipient missing from ranking");

    server.fetch_pixel(&track.id).await.expect("Request failed");
    let second = recipient_entry(&server, &recipient)
        .await
        .expect("Recipient missing from ranking");

    assert!(first.engagement_score > 0.0);
    assert!(second.engagement_score > first.engagement_score);
    assert!(second.engagement_score <= 100.0);
    assert_eq!(second.genuine_opens, 2);
}

#[tokio::test]
async fn test_comma_separated_recipients_are_ranked_individually() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_without_suppression()
        .await
        .expect("Failed to start server");
    let first = CreateTrackRequest::unique_recipient("pair-a");
    let second = CreateTrackRequest::unique_recipient("pair-b");
    let track = create_track(
        &server,
        &CreateTrackRequest::for_recipient(&format!("{first}, {second}")),
    )
    .await;

    server.fetch_pixel(&track.id).await.expect("Request failed");

    for recipient in [&first, &second] {
        let entry = recipient_entry(&server, recipient)
            .await
            .expect("Recipient missing from ranking");
        assert_eq!(entry.tracks_sent, 1);
        assert_eq!(entry.tracks_opened, 1);
        assert!(entry.engagement_score > 0.0);
    }
}
