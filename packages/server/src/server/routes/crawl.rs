//! Dispatch and status endpoints - the crawl subsystem's wire contract.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::{CompetitorId, CrawlJobId};
use crate::domains::crawling::{JobStatusView, StatusError};
use crate::server::app::AppState;

// =============================================================================
// Dispatch
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Products to fetch per competitor. Clamped to 1..=100, default 50.
    pub limit: Option<u32>,
}

/// POST /crawl/dispatch
///
/// Runs the batch synchronously and returns the per-competitor outcomes.
/// Partial failure is reported in the payload, not as an HTTP error; only
/// infrastructure failures (competitor directory unreadable) return 500.
pub async fn dispatch_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<DispatchRequest>>,
) -> Response {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    match state.dispatcher.dispatch(request.limit, &state.cancel).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Batch dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub job_id: Option<String>,
    pub competitor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JobStatusView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /crawl/status?jobId=... | ?competitorId=...
///
/// Exactly one id is required; jobId wins when both are present.
pub async fn status_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<StatusParams>,
) -> Response {
    let job_id = match params.job_id.as_deref().map(CrawlJobId::parse).transpose() {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "jobId must be a valid UUID"),
    };
    let competitor_id = match params
        .competitor_id
        .as_deref()
        .map(CompetitorId::parse)
        .transpose()
    {
        Ok(id) => id,
        Err(_) => {
            return error_response(StatusCode::BAD_REQUEST, "competitorId must be a valid UUID")
        }
    };

    match state.resolver.resolve(job_id, competitor_id).await {
        Ok(view) => (
            StatusCode::OK,
            Json(StatusResponse {
                success: true,
                data: Some(view),
                error: None,
            }),
        )
            .into_response(),
        Err(e @ StatusError::InvalidRequest) => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(StatusError::NotFound) => error_response(StatusCode::NOT_FOUND, "Job not found"),
        Err(StatusError::Store(e)) => {
            tracing::error!(error = %e, "Status resolution failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(StatusResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }),
    )
        .into_response()
}
