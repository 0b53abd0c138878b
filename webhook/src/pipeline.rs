//! Submission pipeline.
//!
//! ```text
//! authenticate → parse → enrich (best-effort) → render → send
//! ```
//!
//! Each step runs to completion before the next one starts. Only the lookup
//! is allowed to fail without failing the submission.

use axum::http::{Method, StatusCode};
use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use crate::lookup::{VehicleEnquiryClient, VehicleRecord};
use crate::notify::{subject_for, EmailError, EmailRenderer, RenderError, ResendClient};
use crate::submission::{Submission, SubmissionError};
use crate::web::auth::{AuthFailure, AuthHeaders, AuthMethod, Authenticator};
use crate::Config;

/// Everything that can end a submission early.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),

    #[error("failed to read request body")]
    Body(#[source] axum::Error),

    #[error("request is not authenticated: {0}")]
    Unauthorized(#[from] AuthFailure),

    #[error("submission is invalid: {0}")]
    InvalidSubmission(#[from] SubmissionError),

    #[error("failed to render email: {0}")]
    Render(#[from] RenderError),

    #[error("failed to send email: {0}")]
    Email(#[from] EmailError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            SubmitError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SubmitError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            SubmitError::Body(_) | SubmitError::Render(_) | SubmitError::Email(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the caller. Never says which auth check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            SubmitError::MethodNotAllowed(_) => "Method not allowed",
            SubmitError::Unauthorized(_) => "Unauthorized",
            SubmitError::InvalidSubmission(_) => "Registration is required",
            SubmitError::Body(_) | SubmitError::Render(_) | SubmitError::Email(_) => {
                "Internal Server Error"
            }
        }
    }
}

/// Outcome of a successfully delivered submission.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub registration: String,
    pub auth_method: AuthMethod,
    pub enriched: bool,
    pub email_id: Option<String>,
}

/// The collaborators a submission passes through.
pub struct SubmissionPipeline {
    authenticator: Authenticator,
    vehicles: VehicleEnquiryClient,
    renderer: EmailRenderer,
    mailer: ResendClient,
}

impl SubmissionPipeline {
    pub fn new(
        authenticator: Authenticator,
        vehicles: VehicleEnquiryClient,
        renderer: EmailRenderer,
        mailer: ResendClient,
    ) -> Self {
        Self {
            authenticator,
            vehicles,
            renderer,
            mailer,
        }
    }

    /// Build the pipeline from configuration, sharing one HTTP client.
    pub fn from_config(config: &Config, http: Client) -> Result<Self, RenderError> {
        let renderer = EmailRenderer::load(config.template_path.as_deref())?;

        let vehicles = VehicleEnquiryClient::new(
            http.clone(),
            config.dvla_api_url.clone(),
            config.dvla_api_key.clone(),
            config.lookup_timeout(),
        );

        let mailer = ResendClient::new(
            http,
            &config.resend_api_url,
            config.resend_api_key.clone(),
            config.email_from.clone(),
            config.email_to.clone(),
            config.email_timeout(),
        );

        Ok(Self::new(
            Authenticator::from_config(config),
            vehicles,
            renderer,
            mailer,
        ))
    }

    /// Run an already captured body through every step.
    pub async fn process(
        &self,
        headers: AuthHeaders<'_>,
        payload: &[u8],
    ) -> Result<SubmissionReceipt, SubmitError> {
        let auth_method = self.authenticator.authenticate(headers, payload)?;

        let submission = Submission::parse(payload)?;

        let vehicle = self.enrich(&submission.registration).await;

        let html = self.renderer.render(&submission, vehicle.as_ref())?;

        let email_id = self
            .mailer
            .send(&subject_for(&submission.registration), &html)
            .await?;

        Ok(SubmissionReceipt {
            registration: submission.registration,
            auth_method,
            enriched: vehicle.is_some(),
            email_id,
        })
    }

    /// Look up the vehicle, swallowing any failure.
    pub async fn enrich(&self, registration: &str) -> Option<VehicleRecord> {
        match self.vehicles.lookup(registration).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    registration = %registration,
                    error = %e,
                    cause = ?e,
                    "vehicle_lookup_failed"
                );
                None
            }
        }
    }
}
