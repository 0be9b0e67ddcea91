/*!
 * HTTP endpoint tests driving the router in-process
 */

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use llbp::briefing_service::BriefingService;
use llbp::docx::{extract_text, DOCX_CONTENT_TYPE};
use llbp::file_utils::ReportKind;
use llbp::providers::mock::MockProvider;
use llbp::server::{self, AppState, REPORT_FIELD};
use crate::common;

const BOUNDARY: &str = "llbp-test-boundary";

fn app(provider: MockProvider, upload_dir: &Path) -> Router {
    app_with_upload_limit(provider, upload_dir, common::test_config().server.max_upload_bytes)
}

fn app_with_upload_limit(provider: MockProvider, upload_dir: &Path, max_upload_bytes: usize) -> Router {
    common::init_logger();
    let mut config = common::test_config();
    config.server.upload_dir = upload_dir.to_string_lossy().to_string();
    config.server.max_upload_bytes = max_upload_bytes;

    let service = Arc::new(BriefingService::new(&config, Arc::new(provider)));
    let state = AppState::new(service, &config.server, &config.document);
    server::router(state, &config.server).unwrap()
}

fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, field, file_name
    ).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(multipart_body(field, file_name, data)))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn error_message(response: axum::response::Response) -> String {
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    json["error"].as_str().unwrap().to_string()
}

fn staged_files(upload_dir: &Path) -> usize {
    std::fs::read_dir(upload_dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_process_withDocxReport_shouldReturnBriefingAttachment() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();
    let report = common::docx_report(&["Drain valve left open after pump overhaul."]);

    let response = app(provider.clone(), dir.path())
        .oneshot(upload_request(REPORT_FIELD, "incident.docx", &report))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], DOCX_CONTENT_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=LLBP_Briefing.docx"
    );

    let docx = body_bytes(response).await;
    let text = extract_text(&docx, ReportKind::Docx).unwrap();
    assert!(text.contains("Valve Left Open During Maintenance"));

    let prompts = provider.received_prompts();
    assert!(prompts[0].user.ends_with("Drain valve left open after pump overhaul."));
    assert_eq!(staged_files(dir.path()), 0);
}

#[tokio::test]
async fn test_process_withTextReport_shouldSucceed() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::working(), dir.path())
        .oneshot(upload_request(REPORT_FIELD, "incident.txt", b"Forklift struck a rack."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"PK\x03\x04"));
}

#[tokio::test]
async fn test_process_withCorruptDocx_shouldReturn500Json() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();

    let response = app(provider.clone(), dir.path())
        .oneshot(upload_request(REPORT_FIELD, "incident.docx", b"not a zip at all"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(response.headers()[header::CONTENT_TYPE], DOCX_CONTENT_TYPE);
    assert!(!error_message(response).await.is_empty());
    assert_eq!(provider.request_count(), 0);
    assert_eq!(staged_files(dir.path()), 0);
}

#[tokio::test]
async fn test_process_withFailingProvider_shouldReturn500Json() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::failing(), dir.path())
        .oneshot(upload_request(REPORT_FIELD, "incident.txt", b"Pump tripped."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response).await.contains("Simulated provider failure"));
    assert_eq!(staged_files(dir.path()), 0);
}

#[tokio::test]
async fn test_process_withoutReportField_shouldReturn400() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();

    let response = app(provider.clone(), dir.path())
        .oneshot(upload_request("attachment", "incident.txt", b"Pump tripped."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("report"));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_process_withOversizedUpload_shouldReturn413Json() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();
    let report = vec![b'x'; 4096];

    let response = app_with_upload_limit(provider.clone(), dir.path(), 1024)
        .oneshot(upload_request(REPORT_FIELD, "incident.txt", &report))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!error_message(response).await.is_empty());
    assert_eq!(provider.request_count(), 0);
    assert_eq!(staged_files(dir.path()), 0);
}

#[tokio::test]
async fn test_process_withEmptyCompletion_shouldReturnFallbackDocument() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::empty(), dir.path())
        .oneshot(upload_request(REPORT_FIELD, "incident.txt", b"Pump tripped."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let docx = body_bytes(response).await;
    let text = extract_text(&docx, ReportKind::Docx).unwrap();
    assert_eq!(text, "GPT did not return a response.");
}

#[tokio::test]
async fn test_health_shouldReturnOk() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::working(), dir.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_preflight_fromAllowedOrigin_shouldAllowCredentials() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::working(), dir.path())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/process")
                .header(header::ORIGIN, "https://llbp-backend.onrender.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://llbp-backend.onrender.com");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_preflight_fromOtherOrigin_shouldNotAllowOrigin() {
    let dir = common::create_temp_dir().unwrap();

    let response = app(MockProvider::working(), dir.path())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/process")
                .header(header::ORIGIN, "https://evil.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
