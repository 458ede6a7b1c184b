//! PDF preview and print preparation
//!
//! This crate holds the view state machine behind the browser viewer:
//! which section is visible (upload, preview, print), which page is shown,
//! and the sequencing of render calls into an external PDF engine.
//!
//! Parsing and rasterization are never done here. The engine, the drawing
//! surfaces, the DOM and the print window are collaborators behind the
//! traits in [`engine`]; `pdfpreview-wasm` implements them over pdf.js and
//! `web-sys`, and [`headless`] implements the engine natively. The
//! `testing` feature adds in-memory presenter and print sink doubles.
//!
//! ```
//! use pdfpreview_core::headless::HeadlessEngine;
//! use pdfpreview_core::testing::{sample_pdf, RecordingPresenter, RecordingPrintSink};
//! use pdfpreview_core::{FileSelection, ViewController, ViewMode, ViewerConfig, ViewerEvent};
//!
//! # tokio_test_block_on(async {
//! let controller = ViewController::new(
//!     HeadlessEngine::new(),
//!     RecordingPresenter::default(),
//!     RecordingPrintSink::default(),
//!     ViewerConfig::default(),
//! );
//!
//! let file = FileSelection::new("report.pdf", "application/pdf", sample_pdf(3).unwrap());
//! controller.dispatch(ViewerEvent::FileChosen(file)).await.unwrap();
//! controller.dispatch(ViewerEvent::NextPage).await.unwrap();
//!
//! let snapshot = controller.snapshot();
//! assert_eq!(snapshot.mode, ViewMode::Preview);
//! assert_eq!(snapshot.page_label.as_deref(), Some("2 of 3"));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod document;
pub mod engine;
pub mod error;
pub mod generation;
pub mod headless;
pub mod intake;
pub mod navigation;
pub mod print;
pub mod render;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{Messages, ViewerConfig, PDF_MIME_TYPE};
pub use controller::{ViewController, ViewMode, ViewSnapshot, ViewerEvent};
pub use document::{DocumentHandle, DocumentInfo};
pub use engine::{Presenter, PrintSink, RenderEngine, Surface, Viewport};
pub use error::{ConfigError, EngineError, ViewerError};
pub use generation::{Generation, Ticket};
pub use intake::FileSelection;
pub use navigation::{Direction, Navigation, NavigationView};
pub use print::{print_markup, PrintPage};
pub use render::{render_page, RenderedPage, PRINT_SCALE};
