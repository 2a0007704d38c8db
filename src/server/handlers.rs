//! Route handlers

use super::upload::{convert_upload, format_file_size, ApiError, Upload};
use super::AppState;
use crate::converters::AidxConverter;
use crate::locations::Source;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use std::time::Instant;

const SELF_TEST_XML: &str =
    r#"<Flight><Leg><Airline CodeContext="3">JQ</Airline><Num>255</Num></Leg></Flight>"#;

fn multipart_error(err: MultipartError, max_upload_size: usize) -> ApiError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::too_large(max_upload_size);
    }
    tracing::warn!("Invalid multipart request: {}", err.body_text());
    ApiError::new(status, "Invalid upload", err.body_text())
}

/// Read every part named `field` into memory
async fn read_uploads(
    multipart: Result<Multipart, MultipartRejection>,
    field: &str,
    max_upload_size: usize,
) -> Result<Vec<Upload>, ApiError> {
    let mut multipart = multipart
        .map_err(|rejection| ApiError::bad_request("Invalid upload", rejection.body_text()))?;

    let mut uploads = Vec::new();
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_size))?
    {
        if part.name() != Some(field) {
            continue;
        }
        let filename = part.file_name().unwrap_or_default().to_string();
        let bytes = part
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_size))?;
        uploads.push(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Ok(uploads)
}

fn no_file() -> ApiError {
    ApiError::bad_request("No file uploaded", "Please select an XML file to convert")
}

/// `POST /convert`
pub async fn convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();
    let upload = read_uploads(multipart, "file", state.max_upload_size)
        .await?
        .into_iter()
        .next()
        .ok_or_else(no_file)?;

    let converter = state.converter.clone();
    let max_upload_size = state.max_upload_size;
    let body = tokio::task::spawn_blocking(move || {
        convert_upload(&converter, upload, max_upload_size, started)
    })
    .await
    .map_err(|e| {
        tracing::error!("Conversion task failed: {}", e);
        ApiError::internal()
    })??;

    Ok(Json(body))
}

/// `POST /convert/batch`
pub async fn convert_batch(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let uploads = read_uploads(multipart, "files", state.max_upload_size).await?;
    if uploads.is_empty() {
        return Err(no_file());
    }

    let converter = state.converter.clone();
    let max_upload_size = state.max_upload_size;
    let results = tokio::task::spawn_blocking(move || {
        uploads
            .into_iter()
            .map(|upload| {
                let filename = upload.filename.clone();
                match convert_upload(&converter, upload, max_upload_size, Instant::now()) {
                    Ok(body) => body,
                    Err(err) => {
                        let mut entry = err.to_json();
                        entry["success"] = json!(false);
                        entry["filename"] = json!(filename);
                        entry["status"] = json!(err.status.as_u16());
                        entry
                    }
                }
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| {
        tracing::error!("Batch conversion task failed: {}", e);
        ApiError::internal()
    })?;

    let failed = results.iter().filter(|r| r["success"] == json!(false)).count();
    tracing::info!(
        "Batch converted {} files ({} failed)",
        results.len(),
        failed
    );

    Ok(Json(json!({ "results": results })))
}

fn self_test(converter: &AidxConverter) -> bool {
    converter
        .convert_source(&Source::Text(SELF_TEST_XML.to_string()))
        .map(|node| node.root_name() == Some("Flight"))
        .unwrap_or(false)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let converter = state.converter.clone();
    let healthy = tokio::task::spawn_blocking(move || self_test(&converter))
        .await
        .unwrap_or(false);
    let timestamp = chrono::Utc::now().to_rfc3339();

    if healthy {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "version": crate::VERSION,
                "timestamp": timestamp,
                "parser_status": "operational",
            })),
        )
    } else {
        tracing::error!("Health check self-test failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "unhealthy",
                "error": "Parser self-test failed",
                "timestamp": timestamp,
            })),
        )
    }
}

/// `GET /api/info`
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "AIDX to JSON Converter API",
        "version": crate::VERSION,
        "description": "Convert IATA AIDX XML files to JSON format",
        "endpoints": {
            "POST /convert": "Convert single AIDX XML file to JSON",
            "POST /convert/batch": "Convert multiple AIDX XML files",
            "GET /health": "Health check endpoint",
            "GET /api/info": "API information",
        },
        "supported_formats": ["xml"],
        "max_file_size": format_file_size(state.max_upload_size),
        "parser_config": state.converter.config(),
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        "Not found",
        "The requested endpoint does not exist",
    )
}
