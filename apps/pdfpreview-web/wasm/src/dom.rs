//! DOM bindings: element lookup and the [`Presenter`] that drives the page

use pdfpreview_core::{NavigationView, Presenter, ViewMode};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement, ScrollBehavior,
    ScrollIntoViewOptions,
};

use crate::canvas::{copy_canvas, CanvasSurface};

/// Every element the viewer touches, looked up once at mount time
#[derive(Debug, Clone)]
pub struct Elements {
    pub document: Document,
    pub file_input: HtmlInputElement,
    pub upload_area: HtmlElement,
    pub upload_section: HtmlElement,
    pub preview_section: HtmlElement,
    pub print_section: HtmlElement,
    pub pdf_canvas: HtmlCanvasElement,
    pub print_container: HtmlElement,
    pub page_info: HtmlElement,
    pub prev_page: HtmlButtonElement,
    pub next_page: HtmlButtonElement,
    pub load_another: HtmlButtonElement,
    pub print_button: HtmlButtonElement,
    pub back_to_preview: HtmlButtonElement,
    pub actual_print: HtmlButtonElement,
}

impl Elements {
    pub fn lookup(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            file_input: by_id(document, "fileInput")?,
            upload_area: by_id(document, "uploadArea")?,
            upload_section: by_id(document, "uploadSection")?,
            preview_section: by_id(document, "previewSection")?,
            print_section: by_id(document, "printSection")?,
            pdf_canvas: by_id(document, "pdfCanvas")?,
            print_container: by_id(document, "printContainer")?,
            page_info: by_id(document, "pageInfo")?,
            prev_page: by_id(document, "prevPage")?,
            next_page: by_id(document, "nextPage")?,
            load_another: by_id(document, "loadAnotherBtn")?,
            print_button: by_id(document, "printBtn")?,
            back_to_preview: by_id(document, "backToPreview")?,
            actual_print: by_id(document, "actualPrint")?,
        })
    }

    fn section(&self, mode: ViewMode) -> &HtmlElement {
        match mode {
            ViewMode::Upload => &self.upload_section,
            ViewMode::Preview => &self.preview_section,
            ViewMode::Print => &self.print_section,
        }
    }
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has an unexpected type", id)))
}

/// CSS `display` value for `section` while `active` is shown
pub fn section_display(active: ViewMode, section: ViewMode) -> &'static str {
    if active == section {
        "block"
    } else {
        "none"
    }
}

pub struct DomPresenter {
    elements: Elements,
}

impl DomPresenter {
    pub fn new(elements: Elements) -> Self {
        Self { elements }
    }

    fn log_failure(&self, action: &str, reason: &str) {
        web_sys::console::error_1(&format!("Failed to {}: {}", action, reason).into());
    }
}

impl Presenter<CanvasSurface> for DomPresenter {
    fn show_mode(&self, mode: ViewMode) {
        for section in [ViewMode::Upload, ViewMode::Preview, ViewMode::Print] {
            let display = section_display(mode, section);
            if let Err(e) = self
                .elements
                .section(section)
                .style()
                .set_property("display", display)
            {
                self.log_failure("toggle section", &crate::pdfjs::describe(&e));
            }
        }

        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        self.elements
            .section(mode)
            .scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn show_navigation(&self, navigation: &NavigationView) {
        self.elements
            .page_info
            .set_text_content(Some(&navigation.label));
        self.elements
            .prev_page
            .set_disabled(!navigation.previous_enabled);
        self.elements.next_page.set_disabled(!navigation.next_enabled);
    }

    fn present_preview(&self, surface: &CanvasSurface) {
        let result = surface
            .canvas()
            .map_err(|e| e.to_string())
            .and_then(|source| copy_canvas(source, &self.elements.pdf_canvas));
        if let Err(reason) = result {
            self.log_failure("present page", &reason);
        }
    }

    fn append_print_page(&self, page_number: u32, surface: &CanvasSurface) {
        let canvas = match surface.canvas() {
            Ok(canvas) => canvas,
            Err(e) => {
                self.log_failure("append print page", &e.to_string());
                return;
            }
        };
        let result = self
            .elements
            .document
            .create_element("div")
            .and_then(|page_div| {
                page_div.set_class_name("print-page");
                page_div.set_attribute("data-page", &page_number.to_string())?;
                page_div.append_child(canvas)?;
                self.elements.print_container.append_child(&page_div)
            });
        if let Err(e) = result {
            self.log_failure("append print page", &crate::pdfjs::describe(&e));
        }
    }

    fn clear_print_pages(&self) {
        self.elements.print_container.set_inner_html("");
    }

    fn reset_file_input(&self) {
        self.elements.file_input.set_value("");
    }
}
