//! Submission decoding.
//!
//! The raw body is decoded only after it has been authenticated. Every field
//! besides `registration` is kept as-is for the email template.

pub mod registration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

pub use registration::{normalize_registration, registration_text};

/// Name of the required form field.
pub const REGISTRATION_FIELD: &str = "registration";

/// Client errors raised while decoding a submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("body is not valid UTF-8")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    #[error("body is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("body is not a JSON object")]
    NotAnObject,

    #[error("registration is missing or empty")]
    MissingRegistration,
}

/// A decoded form submission.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Every submitted field, including the raw `registration`
    pub fields: Map<String, Value>,
    /// Registration with whitespace removed, upper-cased
    pub registration: String,
}

impl Submission {
    /// Decode a raw body as a UTF-8 JSON object with a registration.
    pub fn parse(payload: &[u8]) -> Result<Self, SubmissionError> {
        let text = std::str::from_utf8(payload).map_err(SubmissionError::InvalidUtf8)?;

        let document: Value = serde_json::from_str(text).map_err(SubmissionError::InvalidJson)?;

        let fields = match document {
            Value::Object(fields) => fields,
            _ => return Err(SubmissionError::NotAnObject),
        };

        let raw = registration_text(fields.get(REGISTRATION_FIELD))
            .ok_or(SubmissionError::MissingRegistration)?;

        let registration = normalize_registration(&raw);
        if registration.is_empty() {
            return Err(SubmissionError::MissingRegistration);
        }

        info!(
            registration = %registration,
            field_count = fields.len(),
            "submission_parsed"
        );

        Ok(Self {
            fields,
            registration,
        })
    }
}
