//! Response types for the contribution rewriter API.
//!
//! This module defines the success body of `/rewrite`, the error response
//! structures, and the mapping from [`RewriteError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RewriteError;
use crate::models::{BatchResult, BatchSummary, RecordOutcome, RewrittenFile};

/// Success body of the `/rewrite` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run completed.
    pub timestamp: DateTime<Utc>,
    /// The version of the rewriter.
    pub engine_version: String,
    /// Rewritten files in request order.
    pub files: Vec<FileResponse>,
    /// Aggregated counts.
    pub summary: BatchSummary,
}

/// One rewritten file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// The file name from the request.
    pub name: String,
    /// Output lines, one per input line.
    pub lines: Vec<String>,
    /// One entry per rewritten main record.
    pub records: Vec<RecordOutcome>,
}

impl From<RewrittenFile> for FileResponse {
    fn from(file: RewrittenFile) -> Self {
        Self {
            name: file.name,
            lines: file.lines.into_iter().map(|line| line.text).collect(),
            records: file.records,
        }
    }
}

impl From<BatchResult> for RewriteResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            run_id: result.run_id,
            timestamp: result.timestamp,
            engine_version: result.engine_version,
            files: result.files.into_iter().map(Into::into).collect(),
            summary: result.summary,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the error for a request without a usable ceiling.
    pub fn missing_ceiling() -> Self {
        Self::with_details(
            "MISSING_CEILING",
            "No contribution ceiling supplied",
            "Send 'ceiling' in the request or start the server with a default ceiling",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<RewriteError> for ApiErrorResponse {
    fn from(error: RewriteError) -> Self {
        let message = error.to_string();
        match error {
            RewriteError::UnmappedWorker {
                identifier,
                file,
                line_number,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "UNMAPPED_WORKER",
                    message,
                    format!(
                        "identifier={} file={} line={}",
                        identifier, file, line_number
                    ),
                ),
            },
            RewriteError::InvalidCeiling { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_CEILING", message),
            },
            RewriteError::Decode { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("DECODE_ERROR", message),
            },
            RewriteError::ConfigNotFound { .. }
            | RewriteError::ConfigParseError { .. }
            | RewriteError::ScheduleTableNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            RewriteError::Io { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("IO_ERROR", "I/O failure", message),
            },
        }
    }
}
