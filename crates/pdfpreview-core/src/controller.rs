//! View controller: the single owner of view mode, navigation and the
//! loaded document
//!
//! UI bindings translate DOM events into [`ViewerEvent`]s and hand them to
//! [`ViewController::dispatch`]. State lives in a `RefCell` that is only
//! borrowed between awaits, so several operations may be suspended on the
//! engine at once. Two [`Generation`] counters decide which of them still
//! get to touch the view when they resume: one for document loads and
//! preview renders, one for print batches. Entering or leaving print mode
//! never supersedes a preview render of the same document.

use std::cell::RefCell;

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::document::{DocumentHandle, DocumentInfo};
use crate::engine::{Presenter, PrintSink, RenderEngine};
use crate::error::ViewerError;
use crate::generation::{Generation, Ticket};
use crate::intake::FileSelection;
use crate::navigation::{Direction, Navigation, NavigationView};
use crate::print::{print_markup, PrintPage};
use crate::render::{render_page, PRINT_SCALE};

/// The UI section currently shown. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    #[default]
    Upload,
    Preview,
    Print,
}

/// User intents coming from the UI layer
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    FileChosen(FileSelection),
    PreviousPage,
    NextPage,
    EnterPrint,
    ExitPrint,
    LoadAnother,
    Print,
}

impl ViewerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::FileChosen(_) => "file_chosen",
            ViewerEvent::PreviousPage => "previous_page",
            ViewerEvent::NextPage => "next_page",
            ViewerEvent::EnterPrint => "enter_print",
            ViewerEvent::ExitPrint => "exit_print",
            ViewerEvent::LoadAnother => "load_another",
            ViewerEvent::Print => "print",
        }
    }
}

/// Read-only view of the controller state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub mode: ViewMode,
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub page_label: Option<String>,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    /// Number of completed print surfaces
    pub print_pages: usize,
    pub document: Option<DocumentInfo>,
}

struct ViewState<E: RenderEngine> {
    mode: ViewMode,
    document: Option<DocumentHandle<E::Document>>,
    navigation: Option<Navigation>,
    preview_surface: Option<E::Surface>,
    print_surfaces: Vec<E::Surface>,
}

impl<E: RenderEngine> Default for ViewState<E> {
    fn default() -> Self {
        Self {
            mode: ViewMode::Upload,
            document: None,
            navigation: None,
            preview_surface: None,
            print_surfaces: Vec::new(),
        }
    }
}

pub struct ViewController<E: RenderEngine, P, S> {
    engine: E,
    presenter: P,
    print_sink: S,
    config: ViewerConfig,
    /// Advanced by loads, page changes and load another
    preview_generation: Generation,
    /// Advanced whenever the print batch must stop
    print_generation: Generation,
    state: RefCell<ViewState<E>>,
}

impl<E, P, S> ViewController<E, P, S>
where
    E: RenderEngine,
    P: Presenter<E::Surface>,
    S: PrintSink,
{
    pub fn new(engine: E, presenter: P, print_sink: S, config: ViewerConfig) -> Self {
        Self {
            engine,
            presenter,
            print_sink,
            config,
            preview_generation: Generation::new(),
            print_generation: Generation::new(),
            state: RefCell::new(ViewState::default()),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn print_sink(&self) -> &S {
        &self.print_sink
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn mode(&self) -> ViewMode {
        self.state.borrow().mode
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.borrow();
        let navigation = state.navigation;
        ViewSnapshot {
            mode: state.mode,
            current_page: navigation.map(|nav| nav.current()),
            total_pages: navigation.map(|nav| nav.total()),
            page_label: navigation.map(|nav| self.config.page_label(nav.current(), nav.total())),
            previous_enabled: navigation.is_some_and(|nav| nav.previous_enabled()),
            next_enabled: navigation.is_some_and(|nav| nav.next_enabled()),
            print_pages: state.print_surfaces.len(),
            document: state.document.as_ref().map(|handle| handle.info().clone()),
        }
    }

    /// Route a UI event to its transition
    pub async fn dispatch(&self, event: ViewerEvent) -> Result<(), ViewerError> {
        tracing::debug!("Dispatching {} in {:?} mode", event.name(), self.mode());
        match event {
            ViewerEvent::FileChosen(file) => self.load_document(file).await,
            ViewerEvent::PreviousPage => self.change_page(Direction::Previous).await,
            ViewerEvent::NextPage => self.change_page(Direction::Next).await,
            ViewerEvent::EnterPrint => self.enter_print_mode().await,
            ViewerEvent::ExitPrint => {
                self.exit_print_mode();
                Ok(())
            }
            ViewerEvent::LoadAnother => {
                self.load_another();
                Ok(())
            }
            ViewerEvent::Print => self.print(),
        }
    }

    /// Parse a chosen file and show its first page.
    ///
    /// Rejected or unparseable files leave the state untouched and return
    /// [`ViewerError::InvalidFormat`]. If page 1 then fails to render the
    /// document stays loaded and [`ViewerError::RenderFailure`] is returned.
    pub async fn load_document(&self, file: FileSelection) -> Result<(), ViewerError> {
        if let Err(err) = file.ensure_accepted(&self.config.accepted_mime) {
            tracing::warn!("Rejected {}: {}", file.name, err);
            return Err(err);
        }

        let ticket = self.preview_generation.advance();
        tracing::info!("Loading {} ({} bytes)", file.name, file.bytes.len());

        let parse_result = self.engine.parse(&file.bytes).await;
        if !self.preview_generation.is_current(ticket) {
            tracing::debug!("Discarding superseded load of {}", file.name);
            return Ok(());
        }

        let parsed = match parse_result {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", file.name, e);
                return Err(ViewerError::invalid_format(e.to_string()));
            }
        };

        let page_count = self.engine.page_count(&parsed);
        let Some(navigation) = Navigation::new(page_count) else {
            tracing::warn!("Rejected {}: document has no pages", file.name);
            return Err(ViewerError::invalid_format(format!(
                "{} has no pages",
                file.name
            )));
        };

        let info = DocumentInfo::inspect(&file.name, &file.bytes, page_count);
        tracing::info!(
            "Loaded {} (version {}, {} pages)",
            info.name,
            info.version.as_deref().unwrap_or("unknown"),
            page_count
        );

        // a batch started on the previous document must not finish
        self.print_generation.advance();
        {
            let mut state = self.state.borrow_mut();
            state.document = Some(DocumentHandle::new(parsed, info));
            state.navigation = Some(navigation);
            state.print_surfaces.clear();
            state.mode = ViewMode::Preview;
        }

        self.presenter.clear_print_pages();
        self.presenter.show_mode(ViewMode::Preview);
        self.presenter.show_navigation(&self.navigation_view(&navigation));

        self.render_preview(ticket, 1).await.map(|_| ())
    }

    /// Step one page back or forward in preview mode.
    ///
    /// Steps past either end, calls outside preview mode and calls without a
    /// document are silent no-ops. The page index only moves once the new
    /// page has rendered.
    pub async fn change_page(&self, direction: Direction) -> Result<(), ViewerError> {
        let target = {
            let state = self.state.borrow();
            if state.mode != ViewMode::Preview {
                return Ok(());
            }
            match state.navigation.and_then(|nav| nav.step(direction)) {
                Some(target) => target,
                None => {
                    tracing::trace!("Ignoring {:?} at document boundary", direction);
                    return Ok(());
                }
            }
        };

        let ticket = self.preview_generation.advance();
        if !self.render_preview(ticket, target).await? {
            return Ok(());
        }

        let view = {
            let mut state = self.state.borrow_mut();
            let Some(navigation) = state.navigation.as_mut() else {
                return Ok(());
            };
            navigation.go_to(target);
            self.navigation_view(navigation)
        };
        self.presenter.show_navigation(&view);
        Ok(())
    }

    /// Render every page at print scale, in order, into fresh surfaces.
    ///
    /// Pages are rendered one at a time. A failing page discards the batch
    /// and returns to preview mode; a batch superseded by another transition
    /// stops quietly.
    pub async fn enter_print_mode(&self) -> Result<(), ViewerError> {
        let (document, total) = {
            let mut state = self.state.borrow_mut();
            if state.mode != ViewMode::Preview {
                return Ok(());
            }
            let Some(handle) = state.document.as_ref() else {
                return Ok(());
            };
            let document = handle.engine_document();
            let total = handle.page_count();
            state.mode = ViewMode::Print;
            state.print_surfaces.clear();
            (document, total)
        };

        let ticket = self.print_generation.advance();
        tracing::info!("Preparing {} pages for print", total);
        self.presenter.clear_print_pages();
        self.presenter.show_mode(ViewMode::Print);

        let mut surfaces = Vec::with_capacity(total as usize);
        for page_number in 1..=total {
            let mut surface = self.engine.create_surface();
            let result =
                render_page(&self.engine, &document, page_number, PRINT_SCALE, &mut surface).await;

            if !self.print_generation.is_current(ticket) {
                tracing::debug!("Print preparation superseded at page {}", page_number);
                return Ok(());
            }

            if let Err(err) = result {
                tracing::warn!("Print preparation aborted: {}", err);
                self.state.borrow_mut().mode = ViewMode::Preview;
                self.presenter.clear_print_pages();
                self.presenter.show_mode(ViewMode::Preview);
                return Err(err);
            }

            self.presenter.append_print_page(page_number, &surface);
            surfaces.push(surface);
        }

        self.state.borrow_mut().print_surfaces = surfaces;
        tracing::debug!("Print preparation complete");
        Ok(())
    }

    /// Back to preview. Navigation is kept and nothing is re-rendered.
    pub fn exit_print_mode(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.mode != ViewMode::Print {
                return;
            }
            state.mode = ViewMode::Preview;
            state.print_surfaces.clear();
        }
        self.print_generation.advance();
        self.presenter.clear_print_pages();
        self.presenter.show_mode(ViewMode::Preview);
    }

    /// Drop the document and return to the upload section. Always succeeds.
    pub fn load_another(&self) {
        self.preview_generation.advance();
        self.print_generation.advance();
        {
            let mut state = self.state.borrow_mut();
            state.mode = ViewMode::Upload;
            state.document = None;
            state.navigation = None;
            state.print_surfaces.clear();
        }
        tracing::debug!("Document cleared");
        self.presenter.reset_file_input();
        self.presenter.clear_print_pages();
        self.presenter.show_mode(ViewMode::Upload);
    }

    /// Hand the completed print pages to the print sink.
    ///
    /// A no-op outside print mode or while pages are still rendering.
    pub fn print(&self) -> Result<(), ViewerError> {
        let markup = {
            let state = self.state.borrow();
            if state.mode != ViewMode::Print {
                tracing::debug!("Print requested outside print mode");
                return Ok(());
            }
            let Some(handle) = state.document.as_ref() else {
                return Ok(());
            };
            if state.print_surfaces.len() != handle.page_count() as usize {
                tracing::debug!("Print requested before all pages were ready");
                return Ok(());
            }

            let pages = state
                .print_surfaces
                .iter()
                .zip(1..)
                .map(|(surface, page_number)| PrintPage::from_surface(page_number, surface))
                .collect::<Result<Vec<_>, _>>()?;

            let title = handle
                .info()
                .title
                .as_deref()
                .unwrap_or(self.config.print_title.as_str());
            print_markup(title, &pages)
        };

        tracing::info!("Opening print window");
        self.print_sink.print(&markup)
    }

    fn navigation_view(&self, navigation: &Navigation) -> NavigationView {
        NavigationView {
            label: self
                .config
                .page_label(navigation.current(), navigation.total()),
            previous_enabled: navigation.previous_enabled(),
            next_enabled: navigation.next_enabled(),
        }
    }

    /// Render `page_number` into the preview surface and present it.
    ///
    /// Returns `Ok(false)` when there is no document or the ticket went stale
    /// while the engine was working; stale failures are swallowed.
    async fn render_preview(&self, ticket: Ticket, page_number: u32) -> Result<bool, ViewerError> {
        let (document, mut surface) = {
            let mut state = self.state.borrow_mut();
            let document = match state.document.as_ref() {
                Some(handle) => handle.engine_document(),
                None => return Ok(false),
            };
            let surface = state
                .preview_surface
                .take()
                .unwrap_or_else(|| self.engine.create_surface());
            (document, surface)
        };

        let result = render_page(
            &self.engine,
            &document,
            page_number,
            self.config.preview_scale,
            &mut surface,
        )
        .await;

        let current = self.preview_generation.is_current(ticket);
        let outcome = match result {
            Ok(_) if current => {
                self.presenter.present_preview(&surface);
                Ok(true)
            }
            Ok(_) => {
                tracing::debug!("Discarding stale render of page {}", page_number);
                Ok(false)
            }
            Err(err) if current => {
                tracing::warn!("{}", err);
                Err(err)
            }
            Err(err) => {
                tracing::debug!("Ignoring failure of stale render: {}", err);
                Ok(false)
            }
        };

        let mut state = self.state.borrow_mut();
        if state.preview_surface.is_none() {
            state.preview_surface = Some(surface);
        }
        outcome
    }
}
