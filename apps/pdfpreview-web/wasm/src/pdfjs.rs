//! pdf.js as a [`RenderEngine`]
//!
//! Documents and pages stay opaque `JsValue` proxies on the JS side; only
//! viewport sizes cross the boundary as data.

use js_sys::Uint8Array;
use pdfpreview_core::{EngineError, RenderEngine, Viewport};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::canvas::CanvasSurface;

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initPdfJs, catch)]
    fn init_pdf_js_internal(worker_src: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = loadDocument, catch)]
    async fn load_document_internal(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = pageCount)]
    fn page_count_internal(pdf: &JsValue) -> u32;

    #[wasm_bindgen(js_name = getPage, catch)]
    async fn get_page_internal(pdf: &JsValue, page_num: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = pageViewport)]
    fn page_viewport_internal(page: &JsValue, scale: f64) -> JsValue;

    #[wasm_bindgen(js_name = renderPage, catch)]
    async fn render_page_internal(
        page: &JsValue,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<JsValue, JsValue>;
}

#[derive(Debug, Deserialize)]
struct PageSize {
    width: f64,
    height: f64,
}

/// Point pdf.js at its worker script. Must run before the first load.
pub fn init_pdf_js(worker_src: &str) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src)
}

/// Best-effort text for a JS exception
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", err)
}

#[derive(Debug, Default)]
pub struct PdfJsEngine;

impl RenderEngine for PdfJsEngine {
    type Document = JsValue;
    type Page = JsValue;
    type Surface = CanvasSurface;

    async fn parse(&self, bytes: &[u8]) -> Result<JsValue, EngineError> {
        let data = Uint8Array::from(bytes);
        load_document_internal(data)
            .await
            .map_err(|e| EngineError::Parse(describe(&e)))
    }

    fn page_count(&self, document: &JsValue) -> u32 {
        page_count_internal(document)
    }

    async fn get_page(&self, document: &JsValue, page_number: u32) -> Result<JsValue, EngineError> {
        get_page_internal(document, page_number)
            .await
            .map_err(|e| EngineError::PageUnavailable {
                page: page_number,
                reason: describe(&e),
            })
    }

    fn viewport(&self, page: &JsValue, scale: f64) -> Result<Viewport, EngineError> {
        let size: PageSize = serde_wasm_bindgen::from_value(page_viewport_internal(page, scale))
            .map_err(|e| EngineError::Render(format!("Invalid viewport: {}", e)))?;
        Ok(Viewport {
            width: size.width,
            height: size.height,
            scale,
        })
    }

    async fn render(
        &self,
        page: &JsValue,
        surface: &mut CanvasSurface,
        viewport: &Viewport,
    ) -> Result<(), EngineError> {
        render_page_internal(page, surface.canvas()?, viewport.scale)
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Render(describe(&e)))
    }

    fn create_surface(&self) -> CanvasSurface {
        CanvasSurface::detached()
    }
}
