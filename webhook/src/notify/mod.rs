//! Notification email: rendering and dispatch.

pub mod resend;
pub mod template;

pub use resend::{EmailError, ResendClient};
pub use template::{EmailRenderer, RenderError};

/// Subject line for a submission notification.
pub fn subject_for(registration: &str) -> String {
    format!("New Sell Car Submission – {}", registration)
}
