//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] which the
//! web server hands to every request through its shared state.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// DVLA Vehicle Enquiry Service endpoint.
pub const DEFAULT_VEHICLE_ENQUIRY_URL: &str =
    "https://driver-vehicle-licensing.api.gov.uk/vehicle-enquiry/v1/vehicles";

/// Resend API base URL.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Sender address used when `EMAIL_FROM` is not set.
pub const DEFAULT_EMAIL_FROM: &str = "onboarding@resend.dev";

/// Errors that stop the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {0} is set but blank")]
    Blank(&'static str),

    #[error("environment variable {name} is not a valid URL")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Framer webhook signing secret. When absent every request that does not
    /// use the developer bypass is rejected.
    pub framer_webhook_secret: Option<String>,

    /// Developer bypass secret compared against the `x-dev-bypass` header.
    /// Absent disables the bypass.
    pub dev_bypass_secret: Option<String>,

    /// API key for the DVLA Vehicle Enquiry Service
    pub dvla_api_key: String,

    /// Vehicle enquiry endpoint
    pub dvla_api_url: Url,

    /// Resend API key
    pub resend_api_key: String,

    /// Resend API base URL
    pub resend_api_url: Url,

    /// Fixed sender address for notification emails
    pub email_from: String,

    /// Fixed recipient address for notification emails
    pub email_to: String,

    /// Optional template file overriding the embedded email template
    pub template_path: Option<PathBuf>,

    /// Vehicle lookup timeout in milliseconds
    pub lookup_timeout_ms: u64,

    /// Email dispatch timeout in milliseconds
    pub email_timeout_ms: u64,

    /// Upper bound on the captured request body
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let framer_webhook_secret = match lookup("FRAMER_WEBHOOK_SECRET") {
            Some(v) if v.trim().is_empty() => {
                warn!(env_var = "FRAMER_WEBHOOK_SECRET", "Blank secret treated as unset");
                None
            }
            other => other,
        };

        Ok(Config {
            port: parse_number(&lookup, "PORT", 8080),

            framer_webhook_secret,

            dev_bypass_secret: optional_secret(&lookup, "API_SECRET")?,

            dvla_api_key: lookup("DVLA_API_KEY").unwrap_or_default(),

            dvla_api_url: parse_url(&lookup, "DVLA_API_URL", DEFAULT_VEHICLE_ENQUIRY_URL)?,

            resend_api_key: required(&lookup, "RESEND_API_KEY")?,

            resend_api_url: parse_url(&lookup, "RESEND_API_URL", DEFAULT_RESEND_API_URL)?,

            email_from: lookup("EMAIL_FROM")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),

            email_to: required(&lookup, "EMAIL_TO")?,

            template_path: lookup("TEMPLATE_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            lookup_timeout_ms: parse_number(&lookup, "LOOKUP_TIMEOUT_MS", 5000),

            email_timeout_ms: parse_number(&lookup, "EMAIL_TIMEOUT_MS", 10_000),

            max_body_bytes: parse_number(&lookup, "MAX_BODY_BYTES", 1024 * 1024),
        })
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_millis(self.email_timeout_ms)
    }
}

/// Read a variable that must be present and non-blank.
fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Err(ConfigError::Missing(name)),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Blank(name)),
        Some(v) => Ok(v),
    }
}

/// Read a secret that may be unset but must never be blank.
///
/// A blank secret would let an empty header match it.
fn optional_secret<F>(lookup: &F, name: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Blank(name)),
        Some(v) => Ok(Some(v)),
    }
}

fn parse_url<F>(lookup: &F, name: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());

    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

/// Parse a numeric variable, falling back to the default when unset or invalid.
fn parse_number<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}
