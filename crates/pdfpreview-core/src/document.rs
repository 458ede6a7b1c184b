//! Loaded document handle and its descriptive metadata
//!
//! The engine owns the parsed representation. Alongside it we keep a few
//! facts read directly from the file with lopdf: header version, Info
//! dictionary title/author and the encryption flag. These are best-effort;
//! a file lopdf cannot read still loads if the engine accepts it.

use std::rc::Rc;

use lopdf::Document;
use serde::Serialize;

/// Descriptive information about a loaded document
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    /// File name as chosen by the user
    pub name: String,
    /// File size in bytes
    pub size_bytes: usize,
    /// Number of pages reported by the engine
    pub page_count: u32,
    /// PDF version string from the header (e.g., "1.7")
    pub version: Option<String>,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
    pub encrypted: bool,
}

impl DocumentInfo {
    /// Collect metadata for a file the engine has already accepted
    pub fn inspect(name: &str, bytes: &[u8], page_count: u32) -> Self {
        let mut info = DocumentInfo {
            name: name.to_string(),
            size_bytes: bytes.len(),
            page_count,
            version: extract_version(bytes),
            ..Default::default()
        };

        match Document::load_mem(bytes) {
            Ok(document) => {
                info.encrypted = document.is_encrypted();
                let (title, author) = extract_metadata(&document);
                info.title = title;
                info.author = author;
            }
            Err(e) => {
                tracing::debug!("Metadata unavailable for {}: {}", name, e);
            }
        }

        info
    }
}

/// The single live document: engine handle plus metadata.
///
/// The engine handle is reference-counted so a suspended render can keep
/// using it after the controller has dropped the document.
pub struct DocumentHandle<D> {
    engine_document: Rc<D>,
    info: DocumentInfo,
}

impl<D> DocumentHandle<D> {
    pub fn new(engine_document: D, info: DocumentInfo) -> Self {
        Self {
            engine_document: Rc::new(engine_document),
            info,
        }
    }

    pub fn engine_document(&self) -> Rc<D> {
        Rc::clone(&self.engine_document)
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn page_count(&self) -> u32 {
        self.info.page_count
    }
}

/// Extract PDF version from header (`%PDF-1.7`)
fn extract_version(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 8 && bytes.starts_with(b"%PDF-") {
        let version = std::str::from_utf8(&bytes[5..8]).ok()?.trim();
        if !version.is_empty() {
            return Some(version.to_string());
        }
    }
    None
}

/// Extract title and author from the trailer's Info dictionary
fn extract_metadata(document: &Document) -> (Option<String>, Option<String>) {
    let info_dict = document
        .trailer
        .get(b"Info")
        .and_then(|info_ref| info_ref.as_reference())
        .ok()
        .and_then(|info_id| document.objects.get(&info_id))
        .and_then(|info_obj| info_obj.as_dict().ok());

    let Some(info_dict) = info_dict else {
        return (None, None);
    };

    let text_entry = |key: &[u8]| {
        info_dict
            .get(key)
            .and_then(|obj| obj.as_str())
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|s| !s.is_empty())
    };

    (text_entry(b"Title"), text_entry(b"Author"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pdf;
    use lopdf::{dictionary, Object, StringFormat};

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version(b"%PDF-1.7\n").as_deref(), Some("1.7"));
        assert_eq!(extract_version(b"%PDF-2.0\n").as_deref(), Some("2.0"));
        assert_eq!(extract_version(b"GIF89a.."), None);
    }

    #[test]
    fn test_inspect_sample_pdf() {
        let pdf = sample_pdf(3).unwrap();
        let info = DocumentInfo::inspect("report.pdf", &pdf, 3);
        assert_eq!(info.name, "report.pdf");
        assert_eq!(info.size_bytes, pdf.len());
        assert_eq!(info.page_count, 3);
        assert_eq!(info.version.as_deref(), Some("1.7"));
        assert!(!info.encrypted);
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_inspect_reads_info_dictionary() {
        let pdf = sample_pdf(1).unwrap();
        let mut doc = Document::load_mem(&pdf).unwrap();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(b"Quarterly Report".to_vec(), StringFormat::Literal),
            "Author" => Object::String(b"Finance".to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Info", Object::Reference(info_id));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let info = DocumentInfo::inspect("q.pdf", &bytes, 1);
        assert_eq!(info.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(info.author.as_deref(), Some("Finance"));
    }

    #[test]
    fn test_inspect_tolerates_unreadable_bytes() {
        let info = DocumentInfo::inspect("odd.pdf", b"%PDF-1.4 garbage", 2);
        assert_eq!(info.version.as_deref(), Some("1.4"));
        assert_eq!(info.page_count, 2);
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_handle_shares_engine_document() {
        let handle = DocumentHandle::new(42u32, DocumentInfo::default());
        let shared = handle.engine_document();
        drop(handle);
        assert_eq!(*shared, 42);
    }
}
