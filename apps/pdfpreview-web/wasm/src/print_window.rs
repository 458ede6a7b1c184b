//! Print sink backed by a new browser window

use js_sys::Array;
use pdfpreview_core::{PrintSink, ViewerError};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::pdfjs::describe;

/// Writes the print document into a fresh `_blank` window and asks the
/// browser to print it once loaded. The window closes itself afterwards.
#[derive(Debug, Clone)]
pub struct WindowPrintSink {
    window: Window,
}

impl WindowPrintSink {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn open(&self) -> Result<Window, ViewerError> {
        self.window
            .open_with_url_and_target("", "_blank")
            .map_err(|e| ViewerError::print_unavailable(describe(&e)))?
            .ok_or_else(|| ViewerError::print_unavailable("window.open was blocked"))
    }
}

impl PrintSink for WindowPrintSink {
    fn print(&self, markup: &str) -> Result<(), ViewerError> {
        let print_window = self.open()?;
        let document = print_window
            .document()
            .ok_or_else(|| ViewerError::print_unavailable("print window has no document"))?;
        let document: &web_sys::HtmlDocument = document.unchecked_ref();

        let onload_window = print_window.clone();
        let onload = Closure::once(Box::new(move |_event: web_sys::Event| {
            let _ = onload_window.focus();
            let _ = onload_window.print();
            let _ = onload_window.close();
        }) as Box<dyn FnOnce(_)>);
        print_window.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        document
            .write(&Array::of1(&JsValue::from_str(markup)))
            .map_err(|e| ViewerError::print_unavailable(describe(&e)))?;
        document
            .close()
            .map_err(|e| ViewerError::print_unavailable(describe(&e)))?;
        Ok(())
    }
}
