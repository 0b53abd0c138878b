//! SellCar webhook - Framer form submissions to dealer notification emails.
//!
//! ## Flow
//!
//! ```text
//! Framer → /api/submit → verify → parse → DVLA lookup → render → Resend
//! ```
//!
//! The DVLA lookup is best-effort; every other step failing fails the request.

pub mod config;
pub mod lookup;
pub mod notify;
pub mod pipeline;
pub mod submission;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

/// Longest upstream response body kept in an error.
pub(crate) const ERROR_BODY_PREVIEW: usize = 200;

/// Leading characters of an upstream error body, cut to [`ERROR_BODY_PREVIEW`].
pub(crate) fn error_body_preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use lookup::{LookupError, VehicleEnquiryClient, VehicleRecord};
pub use notify::{EmailError, EmailRenderer, RenderError, ResendClient};
pub use pipeline::{SubmissionPipeline, SubmissionReceipt, SubmitError};
pub use submission::{normalize_registration, Submission, SubmissionError};
pub use web::{router, AppState};
