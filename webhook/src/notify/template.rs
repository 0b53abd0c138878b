//! Email template rendering with Tera.
//!
//! The default template is compiled into the binary. A file given through
//! `TEMPLATE_PATH` replaces it and is read once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use thiserror::Error;
use tracing::info;

use crate::lookup::VehicleRecord;
use crate::submission::Submission;

static DEFAULT_TEMPLATE: &str = include_str!("../../templates/submission_email.html");

/// Registered template name. The `.html` suffix turns on autoescaping.
const TEMPLATE_NAME: &str = "submission_email.html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read template file '{}'", .0.display())]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Tera encountered an error")]
    Tera(#[from] tera::Error),
}

/// Renders the notification email for a submission.
#[derive(Debug)]
pub struct EmailRenderer {
    tera: Tera,
}

impl EmailRenderer {
    /// Renderer using the template compiled into the binary.
    pub fn embedded() -> Result<Self, RenderError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Renderer using a template file on disk.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let source =
            fs::read_to_string(path).map_err(|e| RenderError::FileRead(path.to_path_buf(), e))?;

        info!(path = %path.display(), "email_template_loaded");

        Self::from_source(&source)
    }

    /// Renderer for an optional override path.
    pub fn load(path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    fn from_source(source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    /// Render the email body. `vehicle` is `None` when the lookup failed.
    pub fn render(
        &self,
        submission: &Submission,
        vehicle: Option<&VehicleRecord>,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("form", &submission.fields);
        context.insert("registration", &submission.registration);
        context.insert("vehicle", &vehicle);

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}
