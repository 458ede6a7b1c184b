//! Offscreen canvas surfaces

use pdfpreview_core::{EngineError, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A canvas element not attached to the page until a presenter puts it
/// there.
///
/// Creation can only fail when there is no `document`; the surface then
/// stays empty and every render into it reports a surface error.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: Option<HtmlCanvasElement>,
}

impl CanvasSurface {
    pub fn detached() -> Self {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.create_element("canvas").ok())
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok());
        Self { canvas }
    }

    pub fn canvas(&self) -> Result<&HtmlCanvasElement, EngineError> {
        self.canvas
            .as_ref()
            .ok_or_else(|| EngineError::Surface("no document to create a canvas in".to_string()))
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        if let Some(canvas) = &self.canvas {
            canvas.set_width(width);
            canvas.set_height(height);
        }
    }

    fn width(&self) -> u32 {
        self.canvas.as_ref().map_or(0, |canvas| canvas.width())
    }

    fn height(&self) -> u32 {
        self.canvas.as_ref().map_or(0, |canvas| canvas.height())
    }

    fn snapshot(&self) -> Result<String, EngineError> {
        self.canvas()?
            .to_data_url()
            .map_err(|e| EngineError::Surface(crate::pdfjs::describe(&e)))
    }
}

/// 2D context of `canvas`
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Copy `source` onto `target`, resizing `target` to match
pub fn copy_canvas(source: &HtmlCanvasElement, target: &HtmlCanvasElement) -> Result<(), String> {
    target.set_width(source.width());
    target.set_height(source.height());
    let context = context_2d(target).ok_or("canvas has no 2d context")?;
    context
        .draw_image_with_html_canvas_element(source, 0.0, 0.0)
        .map_err(|e| crate::pdfjs::describe(&e))
}

#[cfg(test)]
impl CanvasSurface {
    fn without_canvas() -> Self {
        Self { canvas: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_canvas_reports_surface_error() {
        let surface = CanvasSurface::without_canvas();
        assert!(matches!(surface.canvas(), Err(EngineError::Surface(_))));
        assert!(matches!(surface.snapshot(), Err(EngineError::Surface(_))));
    }

    #[test]
    fn test_missing_canvas_has_no_size() {
        let mut surface = CanvasSurface::without_canvas();
        surface.resize(100, 100);
        assert_eq!((surface.width(), surface.height()), (0, 0));
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resize_sets_canvas_size() {
        let mut surface = CanvasSurface::detached();
        surface.resize(918, 1188);
        assert_eq!(surface.width(), 918);
        assert_eq!(surface.height(), 1188);
    }

    #[wasm_bindgen_test]
    fn test_snapshot_is_data_url() {
        let mut surface = CanvasSurface::detached();
        surface.resize(10, 10);
        let url = surface.snapshot().unwrap();
        assert!(url.starts_with("data:image/png"));
    }

    #[wasm_bindgen_test]
    fn test_copy_canvas_matches_size() {
        let mut source = CanvasSurface::detached();
        source.resize(40, 30);
        let target = CanvasSurface::detached();
        copy_canvas(source.canvas().unwrap(), target.canvas().unwrap()).unwrap();
        assert_eq!(target.width(), 40);
        assert_eq!(target.height(), 30);
    }
}
