//! Webhook endpoint handlers.
//!
//! The submission handler captures the raw body, hands it to the
//! [`SubmissionPipeline`], and only responds once the email has been sent or
//! has failed.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::notify::RenderError;
use crate::pipeline::{SubmissionPipeline, SubmissionReceipt, SubmitError};
use crate::web::auth::AuthHeaders;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<SubmissionPipeline>,
}

impl AppState {
    pub fn new(config: Config, http: Client) -> Result<Self, RenderError> {
        let pipeline = SubmissionPipeline::from_config(&config, http)?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        })
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Form Submission
// =============================================================================

/// Success response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Error response. Carries a fixed message only.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, cause = ?self, "submission_failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "submission_rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

/// Framer form submission endpoint.
///
/// Mounted for every method so that non-POST requests get the JSON 405.
pub async fn submit(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    match handle_submit(&state, method, &headers, body).await {
        Ok(receipt) => {
            info!(
                registration = %receipt.registration,
                auth_method = ?receipt.auth_method,
                enriched = receipt.enriched,
                email_id = ?receipt.email_id,
                "submission_complete"
            );
            (StatusCode::OK, Json(SubmitResponse { success: true })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn handle_submit(
    state: &AppState,
    method: Method,
    headers: &HeaderMap,
    body: Body,
) -> Result<SubmissionReceipt, SubmitError> {
    if method != Method::POST {
        return Err(SubmitError::MethodNotAllowed(method));
    }

    let payload = capture_body(body, state.config.max_body_bytes).await?;

    let auth_headers = AuthHeaders::from_header_map(headers);
    info!(
        body_length = payload.len(),
        has_signature = auth_headers.signature.is_some(),
        has_submission_id = auth_headers.submission_id.is_some(),
        has_dev_bypass = auth_headers.dev_bypass.is_some(),
        "submission_received"
    );

    state.pipeline.process(auth_headers, &payload).await
}

/// Buffer the whole request body exactly as received.
///
/// Resolves once the body stream ends; a transport error or a body larger
/// than `limit` fails the request.
pub async fn capture_body(body: Body, limit: usize) -> Result<Bytes, SubmitError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(SubmitError::Body)
}
