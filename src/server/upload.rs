//! Upload validation and conversion responses

use crate::converters::{serialize, AidxConverter, DEFAULT_INDENT};
use crate::error::{Error, ParseErrorKind};
use crate::locations::Source;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::time::Instant;

/// Version reported in conversion metadata
pub const PARSER_VERSION: &str = "1.0";

const ALLOWED_EXTENSIONS: &[&str] = &["xml"];

/// One uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name
    pub filename: String,
    /// File body
    pub bytes: Vec<u8>,
}

/// Error response returned to clients
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Short error title
    pub error: String,
    /// Detail the user can act on
    pub details: String,
    /// File the error refers to
    pub filename: Option<String>,
}

impl ApiError {
    /// Create an error response
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: details.into(),
            filename: None,
        }
    }

    /// 400 Bad Request
    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, details)
    }

    /// 413 Payload Too Large
    pub fn too_large(max_upload_size: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "File too large",
            format!("Maximum file size is {}", format_file_size(max_upload_size)),
        )
    }

    /// 500 with a generic message
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Conversion failed",
            "An unexpected server error occurred",
        )
    }

    /// Attach the file name
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Map a converter error onto a client-facing error
    pub fn from_conversion(err: &Error, max_upload_size: usize) -> Self {
        match err.parse_kind() {
            Some(ParseErrorKind::EmptyInput) | Some(ParseErrorKind::MalformedXml) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "AIDX parsing failed",
                match err {
                    Error::Parse(e) => e.to_string(),
                    other => other.to_string(),
                },
            ),
            Some(ParseErrorKind::LimitExceeded) => Self::too_large(max_upload_size),
            _ => {
                tracing::error!(error = %err, "unexpected conversion failure");
                Self::internal()
            }
        }
    }

    /// Body of the response
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": self.error,
            "details": self.details,
        });
        if let Some(filename) = &self.filename {
            body["filename"] = json!(filename);
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.to_json())).into_response()
    }
}

/// Human readable byte size: `1.5 MB`
pub fn format_file_size(size_bytes: usize) -> String {
    if size_bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = size_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate and convert one upload, producing the success body
pub fn convert_upload(
    converter: &AidxConverter,
    upload: Upload,
    max_upload_size: usize,
    started: Instant,
) -> Result<Value, ApiError> {
    if upload.filename.is_empty() {
        return Err(ApiError::bad_request(
            "No file selected",
            "Please select a valid XML file",
        ));
    }
    if !has_allowed_extension(&upload.filename) {
        tracing::warn!(filename = %upload.filename, "rejected upload with invalid file type");
        return Err(
            ApiError::bad_request("Invalid file type", "Only XML files are supported")
                .with_filename(&upload.filename),
        );
    }

    let filename = upload.filename;
    let file_size = upload.bytes.len();
    let text = String::from_utf8(upload.bytes).map_err(|_| {
        ApiError::bad_request("File encoding error", "File must be UTF-8 encoded XML")
            .with_filename(&filename)
    })?;

    tracing::info!(
        "Processing file: {} ({})",
        filename,
        format_file_size(file_size)
    );

    let conversion = converter
        .convert_with_stats(&Source::Text(text))
        .map_err(|e| {
            tracing::error!("AIDX parsing error for {}: {}", filename, e);
            ApiError::from_conversion(&e, max_upload_size).with_filename(&filename)
        })?;

    let json_string = serialize(&conversion.node, DEFAULT_INDENT).map_err(|e| {
        tracing::error!("Failed to serialize {}: {}", filename, e);
        ApiError::internal().with_filename(&filename)
    })?;
    let json_size = json_string.len();
    let processing_time_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;

    tracing::info!(
        "Successfully converted {} in {:.2}ms",
        filename,
        processing_time_ms
    );

    Ok(json!({
        "success": true,
        "filename": filename,
        "original_size": file_size,
        "json_size": json_size,
        "processing_time_ms": processing_time_ms,
        "json_data": conversion.node,
        "metadata": {
            "parser_version": PARSER_VERSION,
            "conversion_timestamp": chrono::Utc::now().to_rfc3339(),
            "file_info": {
                "name": filename,
                "size_bytes": file_size,
                "size_formatted": format_file_size(file_size),
            },
            "json_info": {
                "size_bytes": json_size,
                "size_formatted": format_file_size(json_size),
                "line_count": json_string.split('\n').count(),
            },
            "stats": conversion.stats,
        },
    }))
}
