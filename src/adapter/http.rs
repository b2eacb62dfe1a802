//! Upload HTTP Server
//!
//! `POST /parse` accepts a multipart CSV upload and stages it; `GET /health` is a liveness probe.

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::application::use_cases::parse_upload::ParseUploadUseCase;
use crate::domain::entities::price_row::REQUIRED_COLUMNS;
use crate::domain::errors::PipelineError;
use crate::domain::repositories::price_source_repository::PriceSourceRepository;

const FILE_FIELD: &str = "file";

/// JSON error body `{error, message}` with its status code
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::Schema { .. } => Self::bad_request(
                err.to_string(),
                format!("Required columns: {}", REQUIRED_COLUMNS.join(", ")),
            ),
            PipelineError::Malformed { source } => {
                Self::bad_request("Invalid file format", format!("{source:#}"))
            }
            PipelineError::Read { .. } => Self::bad_request("Invalid file format", err.to_string()),
            PipelineError::Persistence { source, .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Processing failed".to_string(),
                message: format!("Could not save output file: {source:#}"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ParseResponse {
    message: &'static str,
    items_processed: usize,
    batch_id: String,
}

/// Build the router
///
/// # Arguments
///
/// * `use_case` - upload ingestion use case shared by all requests
/// * `max_upload_bytes` - request body limit for `/parse`
pub fn router<P>(use_case: Arc<ParseUploadUseCase<P>>, max_upload_bytes: usize) -> Router
where
    P: PriceSourceRepository + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/parse", post(parse::<P>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(use_case)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Upload server listening on {}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Upload server failed")
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    }))
}

async fn parse<P>(
    State(use_case): State<Arc<ParseUploadUseCase<P>>>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, ApiError>
where
    P: PriceSourceRepository + 'static,
{
    let (file_name, bytes) = read_file_field(&mut multipart).await?;

    let report = use_case
        .execute(&file_name, &bytes, Local::now().naive_local())
        .await
        .map_err(|e| {
            if e.is_client_error() {
                warn!("Rejected upload {}: {}", file_name, e);
            } else {
                error!("Error in parse_upload: {:#}", e);
            }
            ApiError::from(e)
        })?;

    Ok(Json(ParseResponse {
        message: "File processed successfully",
        items_processed: report.items_processed,
        batch_id: report.batch.batch_id().to_string(),
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;
        let Some(field) = field else {
            return Err(ApiError::bad_request(
                "No file provided",
                format!("multipart field '{FILE_FIELD}' is required"),
            ));
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::bad_request(
                "No file selected",
                "the uploaded file has no filename",
            ));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((file_name, bytes.to_vec()));
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError {
        status: err.status(),
        error: "Invalid upload".to_string(),
        message: err.body_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_bad_request_naming_columns() {
        let api: ApiError = PipelineError::Schema {
            missing: vec!["NEW PRICE".to_string()],
        }
        .into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.error.contains("NEW PRICE"));
    }

    #[test]
    fn test_malformed_is_bad_request() {
        let api: ApiError = PipelineError::Malformed {
            source: anyhow::anyhow!("invalid utf-8"),
        }
        .into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Invalid file format");
    }

    #[test]
    fn test_persistence_is_server_error() {
        let api: ApiError = PipelineError::Persistence {
            target: "/app/data/price_update_20250102-030405.csv".to_string(),
            source: anyhow::anyhow!("read-only file system"),
        }
        .into();

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Processing failed");
        assert!(api.message.contains("read-only file system"));
    }

    #[test]
    fn test_error_body_omits_status() {
        let body = serde_json::to_value(ApiError::bad_request("No file provided", "x")).unwrap();

        assert_eq!(body, json!({"error": "No file provided", "message": "x"}));
    }
}
