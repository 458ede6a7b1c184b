//! Headless engine backed by lopdf
//!
//! Parses documents and computes page geometry from the page tree, but does
//! not rasterize: surfaces record which page was drawn at which size. Used
//! natively where no browser engine exists (tests, server-side validation of
//! the navigation and print flow).

use std::cell::RefCell;
use std::collections::BTreeSet;

use lopdf::{Dictionary, Document, Object};

use crate::engine::{RenderEngine, Surface, Viewport};
use crate::error::EngineError;

/// US Letter, used when a page tree carries no MediaBox at all
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Geometry of a single page in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
}

/// Parsed document: the page boxes in page order
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    pages: Vec<PageBox>,
}

impl HeadlessDocument {
    pub fn pages(&self) -> &[PageBox] {
        &self.pages
    }
}

/// One `render` call as observed by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCall {
    pub page_number: u32,
    pub scale: f64,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    failing_pages: BTreeSet<u32>,
    calls: RefCell<Vec<RenderCall>>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every render of `page_number` fail
    pub fn failing_on(mut self, page_number: u32) -> Self {
        self.failing_pages.insert(page_number);
        self
    }

    /// Render calls made so far, in call order
    pub fn render_calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }
}

impl RenderEngine for HeadlessEngine {
    type Document = HeadlessDocument;
    type Page = PageBox;
    type Surface = RecordingSurface;

    async fn parse(&self, bytes: &[u8]) -> Result<HeadlessDocument, EngineError> {
        let doc = Document::load_mem(bytes).map_err(|e| EngineError::Parse(e.to_string()))?;

        let pages = doc
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let page_dict = doc
                    .get_object(page_id)
                    .and_then(Object::as_dict)
                    .map_err(|e| EngineError::Parse(format!("Page {}: {}", page_number, e)))?;
                page_box(&doc, page_dict, page_number)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HeadlessDocument { pages })
    }

    fn page_count(&self, document: &HeadlessDocument) -> u32 {
        document.pages.len() as u32
    }

    async fn get_page(
        &self,
        document: &HeadlessDocument,
        page_number: u32,
    ) -> Result<PageBox, EngineError> {
        page_number
            .checked_sub(1)
            .and_then(|index| document.pages.get(index as usize))
            .copied()
            .ok_or_else(|| EngineError::PageUnavailable {
                page: page_number,
                reason: format!("document has {} pages", document.pages.len()),
            })
    }

    fn viewport(&self, page: &PageBox, scale: f64) -> Result<Viewport, EngineError> {
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(EngineError::PageUnavailable {
                page: page.page_number,
                reason: format!("empty page box {}x{}", page.width, page.height),
            });
        }
        let (width, height) = if page.rotation == 90 || page.rotation == 270 {
            (page.height, page.width)
        } else {
            (page.width, page.height)
        };
        Ok(Viewport {
            width: width * scale,
            height: height * scale,
            scale,
        })
    }

    async fn render(
        &self,
        page: &PageBox,
        surface: &mut RecordingSurface,
        viewport: &Viewport,
    ) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(RenderCall {
            page_number: page.page_number,
            scale: viewport.scale,
        });
        if self.failing_pages.contains(&page.page_number) {
            return Err(EngineError::Render(format!(
                "injected failure on page {}",
                page.page_number
            )));
        }
        surface.drawn_page = Some(page.page_number);
        Ok(())
    }

    fn create_surface(&self) -> RecordingSurface {
        RecordingSurface::default()
    }
}

/// Surface that remembers what was drawn on it instead of holding pixels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    drawn_page: Option<u32>,
}

impl RecordingSurface {
    /// Page most recently drawn, cleared whenever the surface is resized
    pub fn drawn_page(&self) -> Option<u32> {
        self.drawn_page
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.drawn_page = None;
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Blank SVG placeholder of the surface size
    fn snapshot(&self) -> Result<String, EngineError> {
        let page = self
            .drawn_page
            .ok_or_else(|| EngineError::Surface("surface holds no page".to_string()))?;
        Ok(format!(
            "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}' data-page='{}'/>",
            self.width, self.height, page
        ))
    }
}

fn page_box(doc: &Document, page_dict: &Dictionary, page_number: u32) -> Result<PageBox, EngineError> {
    let media_box = inherited(doc, page_dict, b"MediaBox")
        .map(|obj| parse_box(doc, obj))
        .transpose()
        .map_err(|e| EngineError::Parse(format!("Page {}: {}", page_number, e)))?
        .unwrap_or(DEFAULT_MEDIA_BOX);

    let rotation = inherited(doc, page_dict, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .map(|angle| normalize_rotation(angle as i32))
        .unwrap_or(0);

    Ok(PageBox {
        page_number,
        width: (media_box[2] - media_box[0]).abs(),
        height: (media_box[3] - media_box[1]).abs(),
        rotation,
    })
}

/// Look up an inheritable page attribute, walking up the Parent chain
fn inherited<'a>(doc: &'a Document, page_dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page_dict;
    // Bounded walk; malformed files can contain Parent cycles
    for _ in 0..32 {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        dict = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|parent_id| doc.get_object(parent_id))
            .and_then(Object::as_dict)
            .ok()?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2], resolving references
fn parse_box(doc: &Document, obj: &Object) -> Result<[f64; 4], String> {
    let array = match obj {
        Object::Array(a) => a,
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .map_err(|e| format!("MediaBox reference: {}", e))?,
        _ => return Err("MediaBox is not an array".to_string()),
    };

    if array.len() != 4 {
        return Err(format!("MediaBox has {} elements, expected 4", array.len()));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return Err(format!("MediaBox element {} is not a number", i)),
        };
    }

    Ok(result)
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pdf;
    use lopdf::dictionary;

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(90), 90);
        assert_eq!(normalize_rotation(360), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-90), 270);
    }

    #[test]
    fn test_parse_box_mixed_numbers() {
        let doc = Document::with_version("1.7");
        let array = Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.0),
            Object::Real(842.0),
        ]);
        assert_eq!(parse_box(&doc, &array).unwrap(), [0.0, 0.0, 595.0, 842.0]);
        assert!(parse_box(&doc, &Object::Integer(3)).is_err());
    }

    #[tokio::test]
    async fn test_parse_reports_pages() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&sample_pdf(4).unwrap()).await.unwrap();
        assert_eq!(engine.page_count(&document), 4);
        let numbers: Vec<u32> = document.pages().iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_parse_rejects_garbage() {
        let engine = HeadlessEngine::new();
        let err = engine.parse(b"definitely not a pdf").await.unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[tokio::test]
    async fn test_media_box_inherited_from_parent() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Rotate" => 90,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let engine = HeadlessEngine::new();
        let document = engine.parse(&bytes).await.unwrap();
        let page = engine.get_page(&document, 1).await.unwrap();
        assert_eq!((page.width, page.height, page.rotation), (595.0, 842.0, 90));

        // rotated pages swap viewport axes
        let viewport = engine.viewport(&page, 1.0).unwrap();
        assert_eq!((viewport.width, viewport.height), (842.0, 595.0));
    }

    #[tokio::test]
    async fn test_get_page_out_of_range() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&sample_pdf(2).unwrap()).await.unwrap();
        assert!(matches!(
            engine.get_page(&document, 0).await,
            Err(EngineError::PageUnavailable { page: 0, .. })
        ));
        assert!(matches!(
            engine.get_page(&document, 3).await,
            Err(EngineError::PageUnavailable { page: 3, .. })
        ));
    }

    #[test]
    fn test_snapshot_requires_drawn_page() {
        let mut surface = RecordingSurface::default();
        surface.resize(10, 20);
        assert!(surface.snapshot().is_err());
        surface.drawn_page = Some(3);
        let src = surface.snapshot().unwrap();
        assert!(src.starts_with("data:image/svg+xml"));
        assert!(src.contains("width='10'"));
        assert!(src.contains("data-page='3'"));
    }
}
