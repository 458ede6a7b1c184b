//! WASM front end for the PDF preview and print viewer
//!
//! All view state lives in [`pdfpreview_core::ViewController`]. This crate
//! supplies its browser collaborators: pdf.js as the render engine, canvas
//! elements as surfaces, the page DOM as presenter and a popup window as
//! print sink.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfPreviewApp } from './pkg/pdfpreview_wasm.js';
//!
//! await init();
//! const app = PdfPreviewApp.mount({ page_label: 'Page {current} of {total}' });
//! console.log(app.snapshot().mode);
//! ```

pub mod canvas;
pub mod dom;
pub mod events;
pub mod pdfjs;
pub mod print_window;

use std::rc::Rc;

use pdfpreview_core::{ViewController, ViewerConfig};
use wasm_bindgen::prelude::*;

pub use canvas::CanvasSurface;
pub use dom::{DomPresenter, Elements};
pub use pdfjs::PdfJsEngine;
pub use print_window::WindowPrintSink;

pub type Controller = ViewController<PdfJsEngine, DomPresenter, WindowPrintSink>;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"PDF preview WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// A viewer bound to the current page's DOM
#[wasm_bindgen]
pub struct PdfPreviewApp {
    controller: Rc<Controller>,
}

#[wasm_bindgen]
impl PdfPreviewApp {
    /// Mount the viewer with an optional config object.
    ///
    /// Missing fields fall back to their defaults; `undefined` or `null`
    /// gives the default config.
    #[wasm_bindgen]
    pub fn mount(config: JsValue) -> Result<PdfPreviewApp, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid viewer config: {}", e)))?
        };
        Self::mount_with(config)
    }

    /// Mount the viewer with a config given as a JSON string
    #[wasm_bindgen(js_name = mountJson)]
    pub fn mount_json(json: &str) -> Result<PdfPreviewApp, JsValue> {
        let config = ViewerConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::mount_with(config)
    }

    /// Current view state as a plain JS object
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.controller.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current view state as a JSON string
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl PdfPreviewApp {
    fn mount_with(config: ViewerConfig) -> Result<PdfPreviewApp, JsValue> {
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let elements = Elements::lookup(&document)?;

        pdfjs::init_pdf_js(&config.worker_src)?;

        let controller = Rc::new(ViewController::new(
            PdfJsEngine,
            DomPresenter::new(elements.clone()),
            WindowPrintSink::new(window),
            config,
        ));
        events::bind(&controller, &elements)?;

        web_sys::console::log_1(&"PDF preview mounted".into());
        Ok(PdfPreviewApp { controller })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }
}
