//! Request authentication for the submission endpoint.
//!
//! A request is trusted when either:
//! - the `x-dev-bypass` header matches the configured developer secret, or
//! - the Framer signature over the raw body and submission id verifies.

use axum::http::HeaderMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::web::signature::{constant_time_compare, verify_framer_signature};
use crate::Config;

pub const DEV_BYPASS_HEADER: &str = "x-dev-bypass";
pub const SIGNATURE_HEADER: &str = "framer-signature";
pub const SUBMISSION_ID_HEADER: &str = "framer-webhook-submission-id";

/// The authentication headers of one request, empty values treated as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthHeaders<'a> {
    pub dev_bypass: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub submission_id: Option<&'a str>,
}

impl<'a> AuthHeaders<'a> {
    pub fn from_header_map(headers: &'a HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
        };

        Self {
            dev_bypass: get(DEV_BYPASS_HEADER),
            signature: get(SIGNATURE_HEADER),
            submission_id: get(SUBMISSION_ID_HEADER),
        }
    }
}

/// How a request was trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    DevBypass,
    Signature,
}

/// Why a request was not trusted. Logged, never sent to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("webhook secret is not configured")]
    SecretNotConfigured,

    #[error("signature header is missing")]
    MissingSignature,

    #[error("submission id header is missing")]
    MissingSubmissionId,

    #[error("signature is invalid")]
    InvalidSignature,
}

/// Secrets needed to authenticate requests.
#[derive(Clone)]
pub struct Authenticator {
    webhook_secret: Option<String>,
    dev_bypass_secret: Option<String>,
}

impl Authenticator {
    pub fn new(webhook_secret: Option<String>, dev_bypass_secret: Option<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.filter(|s| !s.is_empty()),
            dev_bypass_secret: dev_bypass_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.framer_webhook_secret.clone(),
            config.dev_bypass_secret.clone(),
        )
    }

    /// Decide whether a request is trusted.
    ///
    /// `payload` must be the exact bytes received on the wire.
    pub fn authenticate(
        &self,
        headers: AuthHeaders<'_>,
        payload: &[u8],
    ) -> Result<AuthMethod, AuthFailure> {
        if let (Some(expected), Some(provided)) = (&self.dev_bypass_secret, headers.dev_bypass) {
            if constant_time_compare(expected, provided) {
                info!("dev_bypass_used");
                return Ok(AuthMethod::DevBypass);
            }
            warn!("dev_bypass_mismatch");
        }

        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or(AuthFailure::SecretNotConfigured)?;
        let signature = headers.signature.ok_or(AuthFailure::MissingSignature)?;
        let submission_id = headers
            .submission_id
            .ok_or(AuthFailure::MissingSubmissionId)?;

        if verify_framer_signature(secret, submission_id, payload, signature) {
            Ok(AuthMethod::Signature)
        } else {
            Err(AuthFailure::InvalidSignature)
        }
    }
}
