//! DVLA Vehicle Enquiry Service client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::error_body_preview;

/// Vehicle details as returned by the registry. The schema belongs to the
/// registry, so any JSON document is passed to the template untouched.
pub type VehicleRecord = serde_json::Value;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("vehicle enquiry timed out after {0:?}")]
    Timeout(Duration),

    #[error("vehicle enquiry request failed")]
    Request(#[source] reqwest::Error),

    #[error("vehicle enquiry returned status {status}")]
    Status { status: u16, body: String },

    #[error("vehicle enquiry returned a malformed body")]
    Malformed(#[source] reqwest::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnquiryRequest<'a> {
    registration_number: &'a str,
}

/// Client for the vehicle enquiry endpoint.
#[derive(Clone)]
pub struct VehicleEnquiryClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl VehicleEnquiryClient {
    pub fn new(http: Client, endpoint: Url, api_key: String, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            timeout,
        }
    }

    /// Look up a normalized registration. Makes exactly one request.
    pub async fn lookup(&self, registration: &str) -> Result<VehicleRecord, LookupError> {
        info!(
            registration = %registration,
            timeout_seconds = self.timeout.as_secs_f64(),
            "vehicle_lookup_starting"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .json(&EnquiryRequest {
                registration_number: registration,
            })
            .send()
            .await
            .map_err(|e| self.classify(e, LookupError::Request))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: error_body_preview(&body),
            });
        }

        let record = response
            .json::<VehicleRecord>()
            .await
            .map_err(|e| self.classify(e, LookupError::Malformed))?;

        info!(
            registration = %registration,
            status_code = status.as_u16(),
            "vehicle_lookup_complete"
        );

        Ok(record)
    }

    fn classify(
        &self,
        error: reqwest::Error,
        other: fn(reqwest::Error) -> LookupError,
    ) -> LookupError {
        if error.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else {
            other(error)
        }
    }
}
