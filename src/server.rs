/*!
 * HTTP service for briefing generation.
 *
 * - `POST /process`: multipart upload with a `report` file field, answered
 *   with the generated .docx as an attachment
 * - `GET /health`: liveness probe
 *
 * Failures are answered with `{"error": "<message>"}`.
 */

use anyhow::{anyhow, Context, Result};
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::app_config::{Config, DocumentConfig, ServerConfig};
use crate::briefing_service::BriefingService;
use crate::docx::DOCX_CONTENT_TYPE;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::Provider;

/// Multipart field carrying the uploaded report
pub const REPORT_FIELD: &str = "report";

/// Shared, read-only state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Briefing pipeline
    pub service: Arc<BriefingService>,
    /// Directory uploads are staged in
    pub upload_dir: PathBuf,
    /// Attachment filename of the generated document
    pub filename: String,
}

impl AppState {
    /// Build the state from the server and document sections of the config
    pub fn new(service: Arc<BriefingService>, server: &ServerConfig, document: &DocumentConfig) -> Self {
        Self {
            service,
            upload_dir: PathBuf::from(&server.upload_dir),
            filename: document.filename.clone(),
        }
    }
}

/// Error answered as a JSON body
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut message = self.0.to_string();
        if message.is_empty() {
            message = "Internal server error.".to_string();
        }
        (self.status(), Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the router with CORS and the upload size limit applied
pub fn router(state: AppState, server: &ServerConfig) -> Result<Router> {
    if server.allowed_origin.trim() == "*" {
        return Err(anyhow!("Allowed origin '*' cannot be used with credentialed CORS"));
    }
    let origin = server.allowed_origin.parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin: {}", server.allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/process", post(process_report))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors)
        .with_state(state))
}

/// Run the HTTP service until Ctrl-C
pub async fn serve(config: &Config, provider: Arc<dyn Provider>) -> Result<()> {
    let service = Arc::new(BriefingService::new(config, provider));
    if let Err(e) = service.check_provider().await {
        warn!("Connection check against {} failed, serving anyway: {}", service.provider_name(), e);
    }
    let state = AppState::new(service, &config.server, &config.document);
    let app = router(state, &config.server)?;

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Backend running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn process_report(State(state): State<AppState>, multipart: Multipart) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    match generate_briefing(&state, multipart, request_id).await {
        Ok(docx) => {
            info!("[{}] Sent {} byte briefing", request_id, docx.len());
            let disposition = HeaderValue::from_str(&format!("attachment; filename={}", state.filename))
                .map_err(|e| AppError::Config(format!("Invalid output filename: {}", e)))?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                Bytes::from(docx),
            ).into_response())
        }
        Err(e) => {
            error!("[{}] Briefing failed: {}", request_id, e);
            Err(ApiError(e))
        }
    }
}

fn multipart_error(context: &str, error: MultipartError) -> AppError {
    let message = format!("{}: {}", context, error.body_text());
    match error.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        _ => AppError::BadRequest(message),
    }
}

async fn generate_briefing(state: &AppState, mut multipart: Multipart, request_id: Uuid) -> Result<Vec<u8>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() == Some(REPORT_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await
                .map_err(|e| multipart_error("Failed to read uploaded report", e))?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) = upload
        .ok_or_else(|| AppError::BadRequest(format!("No '{}' file uploaded", REPORT_FIELD)))?;
    info!(
        "[{}] Received report {} ({} bytes)",
        request_id,
        file_name.as_deref().unwrap_or("<unnamed>"),
        data.len()
    );

    let kind = FileManager::detect_report_kind(file_name.as_deref(), &data);

    // Removed when dropped, whichever way this returns
    let staged = FileManager::stage_upload(&state.upload_dir, &data)
        .map_err(|e| AppError::File(format!("{:#}", e)))?;

    state.service.render_file(staged.path(), kind).await
}
