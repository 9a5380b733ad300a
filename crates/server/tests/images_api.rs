//! E2E tests for the image relocation API.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

use common::{imgur_config, TestFixture};

async fn start(fixture: &TestFixture, urls: &[&str]) -> String {
    let response = fixture
        .post("/v1/images/upload", json!({ "urls": urls }))
        .await;
    assert_status!(response, StatusCode::OK);
    response.body["jobId"]
        .as_str()
        .expect("jobId missing")
        .to_string()
}

// =============================================================================
// Start job
// =============================================================================

#[tokio::test]
async fn test_start_job_returns_job_id() {
    let fixture = TestFixture::new();

    let job_id = start(&fixture, &["https://example.com/a.png"]).await;

    assert!(job_id.parse::<relocator_core::JobId>().is_ok());
}

#[tokio::test]
async fn test_start_job_accepts_empty_list() {
    let fixture = TestFixture::new();

    let job_id = start(&fixture, &[]).await;

    let response = fixture
        .get(&format!("/v1/images/upload/{}", job_id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "complete");
}

#[tokio::test]
async fn test_start_job_malformed_json() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/v1/images/upload", "{not json").await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_start_job_missing_urls() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/v1/images/upload", json!({ "links": ["a"] }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_job_wrong_url_type() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/v1/images/upload", json!({ "urls": [1, 2] }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_job_wrong_content_type() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_with_content_type(
            "/v1/images/upload",
            r#"{"urls":["https://example.com/a.png"]}"#,
            "text/plain",
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Job status
// =============================================================================

#[tokio::test]
async fn test_job_status_pending_then_complete() {
    let fixture = TestFixture::new();
    fixture.retriever.set_delay(Duration::from_millis(100)).await;

    let job_id = start(&fixture, &["https://example.com/a.png"]).await;

    let response = fixture
        .get(&format!("/v1/images/upload/{}", job_id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["id"], job_id.as_str());
    assert_eq!(response.body["status"], "pending");
    assert!(response.body["finished"].is_null());
    assert_eq!(
        response.body["uploaded"]["pending"],
        json!(["https://example.com/a.png"])
    );

    fixture.wait_idle().await;

    let response = fixture
        .get(&format!("/v1/images/upload/{}", job_id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "complete");
    assert!(response.body["finished"].is_string());
    assert_eq!(response.body["uploaded"]["pending"], json!([]));
    assert_eq!(
        response.body["uploaded"]["complete"],
        json!(["https://example.com/a.png/uploaded"])
    );
    assert_eq!(response.body["uploaded"]["failed"], json!([]));
}

#[tokio::test]
async fn test_job_status_reports_failures() {
    let fixture = TestFixture::new();
    fixture.retriever.fail_url("https://example.com/missing.png").await;

    let job_id = start(
        &fixture,
        &["https://example.com/a.png", "https://example.com/missing.png"],
    )
    .await;
    fixture.wait_idle().await;

    let response = fixture
        .get(&format!("/v1/images/upload/{}", job_id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "complete");
    assert_eq!(
        response.body["uploaded"]["complete"],
        json!(["https://example.com/a.png/uploaded"])
    );
    assert_eq!(
        response.body["uploaded"]["failed"],
        json!(["https://example.com/missing.png"])
    );
}

#[tokio::test]
async fn test_job_status_invalid_id() {
    let fixture = TestFixture::new();

    let response = fixture.get("/v1/images/upload/not-a-uuid").await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("not-a-uuid"));
}

#[tokio::test]
async fn test_job_status_unknown_id() {
    let fixture = TestFixture::new();

    let response = fixture
        .get("/v1/images/upload/550e8400-e29b-41d4-a716-446655440000")
        .await;

    assert_status!(response, StatusCode::NOT_FOUND);
}

// =============================================================================
// Uploaded list
// =============================================================================

#[tokio::test]
async fn test_list_uploaded_empty() {
    let fixture = TestFixture::new();

    let response = fixture.get("/v1/images").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["uploaded"], json!([]));
}

#[tokio::test]
async fn test_list_uploaded_across_jobs() {
    let fixture = TestFixture::new();

    start(&fixture, &["https://example.com/a.png"]).await;
    start(&fixture, &["https://example.com/b.png"]).await;
    fixture.wait_idle().await;

    let response = fixture.get("/v1/images").await;
    assert_status!(response, StatusCode::OK);

    let mut uploaded: Vec<String> = response.body["uploaded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    uploaded.sort();
    assert_eq!(
        uploaded,
        vec![
            "https://example.com/a.png/uploaded",
            "https://example.com/b.png/uploaded",
        ]
    );
}

#[tokio::test]
async fn test_list_uploaded_skips_failed_storage() {
    let fixture = TestFixture::new();
    fixture.storage.set_fail(true).await;

    let job_id = start(&fixture, &["https://example.com/a.png"]).await;
    fixture.wait_idle().await;

    let response = fixture.get("/v1/images").await;
    assert_eq!(response.body["uploaded"], json!([]));

    let response = fixture
        .get(&format!("/v1/images/upload/{}", job_id))
        .await;
    assert_eq!(
        response.body["uploaded"]["failed"],
        json!(["https://example.com/a.png"])
    );
}

// =============================================================================
// Health, config, metrics
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_hides_client_id() {
    let fixture = TestFixture::with_config(imgur_config("very-secret-id"));

    let response = fixture.get("/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["storage"]["backend"], "imgur");
    assert_eq!(response.body["storage"]["imgur"]["client_id_configured"], true);
    assert!(response.body["storage"]["imgur"]["client_id"].is_null());
    assert!(!response.body.to_string().contains("very-secret-id"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();

    start(&fixture, &["https://example.com/a.png"]).await;
    fixture.wait_idle().await;

    let (status, body) = fixture.get_text("/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("relocator_jobs_created_total"));
    assert!(body.contains("relocator_jobs"));
}

#[tokio::test]
async fn test_metrics_path_labels_stay_bounded() {
    let fixture = TestFixture::new();

    for i in 0..50 {
        let response = fixture
            .get(&format!("/v1/images/upload/not-a-job-{}", i))
            .await;
        assert_status!(response, StatusCode::BAD_REQUEST);

        let response = fixture.get(&format!("/v1/no-such-route-{}", i)).await;
        assert_status!(response, StatusCode::NOT_FOUND);
    }

    let (_, body) = fixture.get_text("/metrics").await;
    let series: Vec<&str> = body
        .lines()
        .filter(|line| line.starts_with("relocator_http_requests_total{"))
        .collect();

    assert!(!body.contains("not-a-job"));
    assert!(!body.contains("no-such-route"));
    assert!(series
        .iter()
        .any(|line| line.contains(r#"path="/v1/images/upload/{job_id}""#) && line.contains(r#"status="400""#)));
    assert!(series
        .iter()
        .any(|line| line.contains(r#"path="unmatched""#) && line.contains(r#"status="404""#)));
}
