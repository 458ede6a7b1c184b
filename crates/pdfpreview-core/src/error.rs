use thiserror::Error;

/// Errors surfaced to the user by the view controller.
///
/// Every collaborator failure is mapped into one of these at the load and
/// render boundaries; nothing else reaches the UI layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Invalid PDF file: {reason}")]
    InvalidFormat { reason: String },

    #[error("Failed to render page {page}: {reason}")]
    RenderFailure { page: u32, reason: String },

    #[error("Print window unavailable: {reason}")]
    PrintUnavailable { reason: String },
}

impl ViewerError {
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    pub fn render_failure(page: u32, reason: impl std::fmt::Display) -> Self {
        Self::RenderFailure {
            page,
            reason: reason.to_string(),
        }
    }

    pub fn print_unavailable(reason: impl Into<String>) -> Self {
        Self::PrintUnavailable {
            reason: reason.into(),
        }
    }
}

/// Failures reported by the rendering engine or one of its surfaces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Page {page} unavailable: {reason}")]
    PageUnavailable { page: u32, reason: String },

    #[error("Rasterization failed: {0}")]
    Render(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Preview scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("Accepted MIME type cannot be empty")]
    EmptyMimeType,
}
