//! Web server module for the Framer form webhook.
//!
//! - `POST /api/submit`: authenticated form submission, answered after the
//!   notification email has been dispatched
//! - `GET /health`: liveness probe

pub mod auth;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

pub use auth::{AuthFailure, AuthHeaders, AuthMethod, Authenticator};
pub use handlers::{
    capture_body, health, submit, AppState, ErrorResponse, HealthResponse, SubmitResponse,
};
pub use signature::{compute_framer_signature, verify_framer_signature};

/// Path of the submission endpoint.
pub const SUBMIT_PATH: &str = "/api/submit";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(SUBMIT_PATH, any(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
