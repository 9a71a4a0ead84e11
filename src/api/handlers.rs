//! HTTP request handlers for the contribution rewriter API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ContributionCeiling, Encoding, RunConfig};
use crate::models::SourceFile;
use crate::processing::BatchRewriter;

use super::request::RewriteRequest;
use super::response::{ApiError, ApiErrorResponse, RewriteResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rewrite", post(rewrite_handler))
        .with_state(state)
}

/// Handler for POST /rewrite endpoint.
///
/// Rewrites the request's files as one batch and returns the output lines.
async fn rewrite_handler(
    State(state): State<AppState>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rewrite request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_error(ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error,
            });
        }
    };

    let ceiling = match request.ceiling {
        Some(value) => match ContributionCeiling::new(value) {
            Ok(ceiling) => ceiling,
            Err(err) => {
                warn!(correlation_id = %correlation_id, ceiling = value, "Invalid ceiling");
                return json_error(err.into());
            }
        },
        None => match state.default_ceiling() {
            Some(ceiling) => ceiling,
            None => {
                warn!(correlation_id = %correlation_id, "No ceiling supplied");
                return json_error(ApiErrorResponse {
                    status: StatusCode::BAD_REQUEST,
                    error: ApiError::missing_ceiling(),
                });
            }
        },
    };

    let config = RunConfig::new(ceiling, Encoding::Utf8).with_options(state.options());
    let files: Vec<SourceFile> = request.files.into_iter().map(Into::into).collect();
    let file_count = files.len();

    let start_time = Instant::now();
    match BatchRewriter::new(&config, state.schedule()).process_batch(files) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %result.run_id,
                files = file_count,
                main_records = result.summary.main_records_rewritten,
                duration_us = start_time.elapsed().as_micros(),
                "Rewrite completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(RewriteResponse::from(result)),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Rewrite failed"
            );
            json_error(err.into())
        }
    }
}

fn json_error(api_error: ApiErrorResponse) -> Response {
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleCode, ScheduleTable, layout};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let mut schedule = ScheduleTable::new();
        schedule.insert("12345678-9", ScheduleCode::PART_TIME);
        AppState::new(schedule)
    }

    fn main_line(identifier: &str) -> String {
        let mut chars = vec!['0'; layout::MIN_PROCESSABLE_CHARS];
        for (i, c) in identifier.chars().enumerate() {
            chars[i] = c;
        }
        for (i, c) in "AFP".chars().enumerate() {
            chars[layout::REGIME_CODE.offset + i] = c;
        }
        chars.into_iter().collect()
    }

    async fn post(router: Router, body: String) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rewrite")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// API-001: valid request returns rewritten lines
    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "ceiling": 2460000,
            "files": [{ "name": "a.txt", "lines": ["header", main_line("000123456789")] }]
        })
        .to_string();

        let (status, body) = post(router, body).await;
        assert_eq!(status, StatusCode::OK);

        let response: RewriteResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.files[0].lines[0], "header");
        assert_eq!(
            layout::SCHEDULE_CODE.slice(&response.files[0].lines[1]),
            Some("00000002")
        );
        assert_eq!(response.summary.main_records_rewritten, 1);
    }

    /// API-002: malformed JSON returns 400
    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = post(router, "{invalid json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    /// API-003: unmapped worker returns 422 with context
    #[tokio::test]
    async fn test_api_003_unmapped_worker_returns_422() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "ceiling": 2460000,
            "files": [{ "name": "a.txt", "lines": [main_line("000000000011")] }]
        })
        .to_string();

        let (status, body) = post(router, body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "UNMAPPED_WORKER");
        assert!(error.details.unwrap().contains("identifier=1-1"));
    }

    /// API-004: ceiling must be positive and present
    #[tokio::test]
    async fn test_api_004_ceiling_validation() {
        let body = serde_json::json!({ "ceiling": 0, "files": [] }).to_string();
        let (status, body) = post(create_router(create_test_state()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_CEILING");

        let body = serde_json::json!({ "files": [] }).to_string();
        let (status, body) = post(create_router(create_test_state()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CEILING");
    }

    /// API-005: server default ceiling applies when the request has none
    #[tokio::test]
    async fn test_api_005_default_ceiling() {
        let state = create_test_state()
            .with_default_ceiling(Some(ContributionCeiling::new(2_460_000).unwrap()));
        let body = serde_json::json!({ "files": [{ "name": "a.txt", "lines": [] }] }).to_string();

        let (status, _) = post(create_router(state), body).await;
        assert_eq!(status, StatusCode::OK);
    }

    /// API-006: missing files field is a validation error
    #[tokio::test]
    async fn test_api_006_missing_files_returns_400() {
        let (status, body) =
            post(create_router(create_test_state()), r#"{"ceiling": 1}"#.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}
