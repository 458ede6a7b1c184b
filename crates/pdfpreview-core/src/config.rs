//! Viewer configuration
//!
//! All fields have defaults, so an empty JSON object (or no config at all)
//! yields a working viewer. Hosts override only what they need, typically
//! the user-facing strings.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ViewerError};

/// MIME type accepted by default for uploaded files
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Default pdf.js worker bundle
pub const DEFAULT_WORKER_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.worker.min.js";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Scale used for the interactive preview canvas
    pub preview_scale: f64,
    /// Declared MIME type a file must carry to be accepted
    pub accepted_mime: String,
    /// Page label template, `{current}` and `{total}` are substituted
    pub page_label: String,
    /// Title of the generated print document
    pub print_title: String,
    /// URL of the pdf.js worker script
    pub worker_src: String,
    pub messages: Messages,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            preview_scale: 1.5,
            accepted_mime: PDF_MIME_TYPE.to_string(),
            page_label: "{current} of {total}".to_string(),
            print_title: "PDF Print".to_string(),
            worker_src: DEFAULT_WORKER_SRC.to_string(),
            messages: Messages::default(),
        }
    }
}

/// User-facing notification text, one per error kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Messages {
    pub invalid_format: String,
    pub render_failure: String,
    pub print_unavailable: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_format: "Please select a valid PDF file.".to_string(),
            render_failure: "Failed to render the PDF page.".to_string(),
            print_unavailable: "Could not open the print window. Please allow pop-ups for this page."
                .to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a config from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.preview_scale.is_finite() || self.preview_scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.preview_scale));
        }
        if self.accepted_mime.trim().is_empty() {
            return Err(ConfigError::EmptyMimeType);
        }
        Ok(())
    }

    /// Render the page label for the given position
    pub fn page_label(&self, current: u32, total: u32) -> String {
        self.page_label
            .replace("{current}", &current.to_string())
            .replace("{total}", &total.to_string())
    }

    /// Message shown to the user for an error
    pub fn message_for(&self, error: &ViewerError) -> &str {
        match error {
            ViewerError::InvalidFormat { .. } => &self.messages.invalid_format,
            ViewerError::RenderFailure { .. } => &self.messages.render_failure,
            ViewerError::PrintUnavailable { .. } => &self.messages.print_unavailable,
        }
    }
}
