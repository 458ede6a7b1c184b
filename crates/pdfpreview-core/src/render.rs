//! Render adapter: one page, one surface, one engine round trip

use crate::engine::{RenderEngine, Surface};
use crate::error::ViewerError;

/// Scale used for print output, independent of the preview scale
pub const PRINT_SCALE: f64 = 1.0;

/// Size of a page after it has been drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedPage {
    pub page_number: u32,
    pub width: u32,
    pub height: u32,
}

/// Rasterize `page_number` of `document` into `surface` at `scale`.
///
/// The surface is resized to the page viewport before drawing. Page range is
/// the caller's responsibility; out-of-range pages fail only if the engine
/// rejects them. Every engine error maps to [`ViewerError::RenderFailure`].
pub async fn render_page<E: RenderEngine>(
    engine: &E,
    document: &E::Document,
    page_number: u32,
    scale: f64,
    surface: &mut E::Surface,
) -> Result<RenderedPage, ViewerError> {
    let page = engine
        .get_page(document, page_number)
        .await
        .map_err(|e| ViewerError::render_failure(page_number, e))?;

    let viewport = engine
        .viewport(&page, scale)
        .map_err(|e| ViewerError::render_failure(page_number, e))?;
    let (width, height) = viewport.pixel_size();
    surface.resize(width, height);

    engine
        .render(&page, surface, &viewport)
        .await
        .map_err(|e| ViewerError::render_failure(page_number, e))?;

    tracing::trace!(
        "Rendered page {} at scale {} ({}x{})",
        page_number,
        scale,
        width,
        height
    );

    Ok(RenderedPage {
        page_number,
        width: surface.width(),
        height: surface.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessEngine;
    use crate::testing::sample_pdf;
    use lopdf::{dictionary, Document, Object};

    /// One page whose MediaBox has no area
    fn empty_box_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 0.into(), 0.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_resizes_surface_to_viewport() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&sample_pdf(2).unwrap()).await.unwrap();
        let mut surface = engine.create_surface();

        let rendered = render_page(&engine, &document, 2, 1.5, &mut surface).await.unwrap();

        // 612x792 points at 1.5
        assert_eq!(rendered.page_number, 2);
        assert_eq!((rendered.width, rendered.height), (918, 1188));
        assert_eq!((surface.width(), surface.height()), (918, 1188));
        assert_eq!(surface.drawn_page(), Some(2));
    }

    #[tokio::test]
    async fn test_print_scale_is_native_size() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&sample_pdf(1).unwrap()).await.unwrap();
        let mut surface = engine.create_surface();

        let rendered =
            render_page(&engine, &document, 1, PRINT_SCALE, &mut surface).await.unwrap();
        assert_eq!((rendered.width, rendered.height), (612, 792));
    }

    #[tokio::test]
    async fn test_missing_page_maps_to_render_failure() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&sample_pdf(1).unwrap()).await.unwrap();
        let mut surface = engine.create_surface();

        let err = render_page(&engine, &document, 5, 1.0, &mut surface).await.unwrap_err();
        assert!(matches!(err, ViewerError::RenderFailure { page: 5, .. }));
    }

    #[tokio::test]
    async fn test_engine_failure_maps_to_render_failure() {
        let engine = HeadlessEngine::new().failing_on(1);
        let document = engine.parse(&sample_pdf(1).unwrap()).await.unwrap();
        let mut surface = engine.create_surface();

        let err = render_page(&engine, &document, 1, 1.0, &mut surface).await.unwrap_err();
        assert!(matches!(err, ViewerError::RenderFailure { page: 1, .. }));
        assert_eq!(surface.drawn_page(), None);
    }

    #[tokio::test]
    async fn test_viewport_failure_maps_to_render_failure() {
        let engine = HeadlessEngine::new();
        let document = engine.parse(&empty_box_pdf()).await.unwrap();
        let mut surface = engine.create_surface();

        let err = render_page(&engine, &document, 1, 1.5, &mut surface).await.unwrap_err();
        assert!(matches!(err, ViewerError::RenderFailure { page: 1, .. }));
        // nothing reached the rasterizer
        assert!(engine.render_calls().is_empty());
        assert_eq!(surface.drawn_page(), None);
    }
}
