//! Files handed over by the picker or the drop zone

use crate::error::ViewerError;

/// A file chosen by the user, with the MIME type the browser declared for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Check the declared type against `accepted_mime`.
    ///
    /// Only the declared type is compared; the content is left to the engine.
    pub fn ensure_accepted(&self, accepted_mime: &str) -> Result<(), ViewerError> {
        if self.mime == accepted_mime {
            Ok(())
        } else if self.mime.is_empty() {
            Err(ViewerError::invalid_format(format!(
                "{} has no declared type",
                self.name
            )))
        } else {
            Err(ViewerError::invalid_format(format!(
                "{} is {}, expected {}",
                self.name, self.mime, accepted_mime
            )))
        }
    }
}
