//! Resend transactional email client.
//! Reference: https://resend.com/docs/api-reference/emails/send-email

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::error_body_preview;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email dispatch timed out after {0:?}")]
    Timeout(Duration),

    #[error("email dispatch request failed")]
    Request(#[source] reqwest::Error),

    #[error("email API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Sends notification emails from a fixed sender to a fixed recipient.
#[derive(Clone)]
pub struct ResendClient {
    http: Client,
    endpoint: String,
    api_key: String,
    sender: String,
    recipient: String,
    timeout: Duration,
}

impl ResendClient {
    pub fn new(
        http: Client,
        base_url: &Url,
        api_key: String,
        sender: String,
        recipient: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/emails", base_url.as_str().trim_end_matches('/')),
            api_key,
            sender,
            recipient,
            timeout,
        }
    }

    /// Send one HTML email. Returns the provider's message id when it gives one.
    pub async fn send(&self, subject: &str, html: &str) -> Result<Option<String>, EmailError> {
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest {
                from: &self.sender,
                to: [&self.recipient],
                subject,
                html,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmailError::Timeout(self.timeout)
                } else {
                    EmailError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Status {
                status: status.as_u16(),
                body: error_body_preview(&body),
            });
        }

        let email_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .map(|r| r.id);

        info!(
            email_id = ?email_id,
            subject = %subject,
            html_length = html.len(),
            "email_sent"
        );

        Ok(email_id)
    }
}
