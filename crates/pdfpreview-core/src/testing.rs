//! In-memory collaborators and sample documents
//!
//! Pairs with [`crate::headless::HeadlessEngine`] to drive a
//! [`crate::ViewController`] without a browser.

use std::cell::RefCell;

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

use crate::controller::ViewMode;
use crate::engine::{Presenter, PrintSink};
use crate::error::ViewerError;
use crate::headless::RecordingSurface;
use crate::navigation::NavigationView;

/// Build a valid PDF with `num_pages` US Letter pages, each labelled with
/// its page number
pub fn sample_pdf(num_pages: u32) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// A presenter call as recorded by [`RecordingPresenter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    ShowMode(ViewMode),
    ShowNavigation(NavigationView),
    PresentPreview { page: Option<u32> },
    AppendPrintPage { page: u32 },
    ClearPrintPages,
    ResetFileInput,
}

/// Presenter that records every call instead of touching a UI
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: RefCell<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.borrow().clone()
    }

    /// Pages shown in the preview, in order
    pub fn presented_pages(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::PresentPreview { page } => *page,
                _ => None,
            })
            .collect()
    }

    /// Pages currently in the print container
    pub fn print_pages(&self) -> Vec<u32> {
        let mut pages = Vec::new();
        for call in self.calls.borrow().iter() {
            match call {
                PresenterCall::AppendPrintPage { page } => pages.push(*page),
                PresenterCall::ClearPrintPages => pages.clear(),
                _ => {}
            }
        }
        pages
    }

    pub fn last_navigation(&self) -> Option<NavigationView> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            PresenterCall::ShowNavigation(view) => Some(view.clone()),
            _ => None,
        })
    }

    pub fn last_mode(&self) -> Option<ViewMode> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            PresenterCall::ShowMode(mode) => Some(*mode),
            _ => None,
        })
    }

    fn record(&self, call: PresenterCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Presenter<RecordingSurface> for RecordingPresenter {
    fn show_mode(&self, mode: ViewMode) {
        self.record(PresenterCall::ShowMode(mode));
    }

    fn show_navigation(&self, navigation: &NavigationView) {
        self.record(PresenterCall::ShowNavigation(navigation.clone()));
    }

    fn present_preview(&self, surface: &RecordingSurface) {
        self.record(PresenterCall::PresentPreview {
            page: surface.drawn_page(),
        });
    }

    fn append_print_page(&self, page_number: u32, _surface: &RecordingSurface) {
        self.record(PresenterCall::AppendPrintPage { page: page_number });
    }

    fn clear_print_pages(&self) {
        self.record(PresenterCall::ClearPrintPages);
    }

    fn reset_file_input(&self) {
        self.record(PresenterCall::ResetFileInput);
    }
}

/// Print sink that keeps the markup of every job
#[derive(Debug, Default)]
pub struct RecordingPrintSink {
    jobs: RefCell<Vec<String>>,
    blocked: bool,
}

impl RecordingPrintSink {
    /// A sink that refuses to open, like a browser blocking pop-ups
    pub fn blocked() -> Self {
        Self {
            jobs: RefCell::new(Vec::new()),
            blocked: true,
        }
    }

    pub fn jobs(&self) -> Vec<String> {
        self.jobs.borrow().clone()
    }
}

impl PrintSink for RecordingPrintSink {
    fn print(&self, markup: &str) -> Result<(), ViewerError> {
        if self.blocked {
            return Err(ViewerError::print_unavailable("output context refused"));
        }
        self.jobs.borrow_mut().push(markup.to_string());
        Ok(())
    }
}
