//! Shared fixtures for unit tests.

use crate::web::auth::AuthHeaders;
use crate::Config;

pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const DEV_BYPASS_SECRET: &str = "postman-secret";
pub const SUBMISSION_ID: &str = "sub_01HZX";

/// Configuration pointing both outbound services at one mock server.
pub fn test_config(mock_uri: &str) -> Config {
    let vars = [
        ("FRAMER_WEBHOOK_SECRET", WEBHOOK_SECRET.to_string()),
        ("API_SECRET", DEV_BYPASS_SECRET.to_string()),
        ("DVLA_API_KEY", "dvla-key".to_string()),
        (
            "DVLA_API_URL",
            format!("{}/vehicle-enquiry/v1/vehicles", mock_uri),
        ),
        ("RESEND_API_KEY", "re_test".to_string()),
        ("RESEND_API_URL", mock_uri.to_string()),
        ("EMAIL_TO", "dealer@example.com".to_string()),
        ("LOOKUP_TIMEOUT_MS", "500".to_string()),
        ("EMAIL_TIMEOUT_MS", "500".to_string()),
        ("MAX_BODY_BYTES", "4096".to_string()),
    ];

    Config::from_source(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    })
    .unwrap()
}

pub fn signed_headers(signature: &str) -> AuthHeaders<'_> {
    AuthHeaders {
        dev_bypass: None,
        signature: Some(signature),
        submission_id: Some(SUBMISSION_ID),
    }
}
