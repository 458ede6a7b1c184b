//! Collaborator seams: rendering engine, drawing surfaces, presenter, printer
//!
//! The viewer never parses or rasterizes PDF content itself. In the browser
//! these traits are implemented over pdf.js and the DOM; natively the
//! [`crate::headless`] engine and the `testing` collaborators stand
//! in for them.

use crate::error::{EngineError, ViewerError};
use crate::navigation::NavigationView;
use crate::ViewMode;

/// Page dimensions at a given scale, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Integer surface size for this viewport.
    ///
    /// Fractional pixels are truncated, as canvas dimensions are; a page
    /// never collapses below one pixel.
    pub fn pixel_size(&self) -> (u32, u32) {
        let clamp = |v: f64| {
            if v.is_finite() && v >= 1.0 {
                v.trunc().min(u32::MAX as f64) as u32
            } else {
                1
            }
        };
        (clamp(self.width), clamp(self.height))
    }
}

/// A drawing target holding the raster image of one page
pub trait Surface {
    fn resize(&mut self, width: u32, height: u32);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Encode the current contents as an image source usable in markup
    /// (typically a `data:` URL)
    fn snapshot(&self) -> Result<String, EngineError>;
}

/// External PDF engine: parsing, page lookup and rasterization.
///
/// Futures returned here are awaited on a single-threaded executor and are
/// not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    type Document;
    type Page;
    type Surface: Surface;

    async fn parse(&self, bytes: &[u8]) -> Result<Self::Document, EngineError>;

    fn page_count(&self, document: &Self::Document) -> u32;

    /// Fetch a page by 1-based number
    async fn get_page(
        &self,
        document: &Self::Document,
        page_number: u32,
    ) -> Result<Self::Page, EngineError>;

    fn viewport(&self, page: &Self::Page, scale: f64) -> Result<Viewport, EngineError>;

    async fn render(
        &self,
        page: &Self::Page,
        surface: &mut Self::Surface,
        viewport: &Viewport,
    ) -> Result<(), EngineError>;

    fn create_surface(&self) -> Self::Surface;
}

/// Reflects controller state in the UI.
///
/// Implementations must not call back into the controller.
pub trait Presenter<S> {
    /// Show the section for `mode` and hide the others
    fn show_mode(&self, mode: ViewMode);

    fn show_navigation(&self, navigation: &NavigationView);

    /// Display a freshly rendered preview page
    fn present_preview(&self, surface: &S);

    /// Append one rendered page to the print container
    fn append_print_page(&self, page_number: u32, surface: &S);

    fn clear_print_pages(&self);

    fn reset_file_input(&self);
}

/// Platform print action: open an output context, write the markup into it
/// and trigger the native print dialog once it has loaded
pub trait PrintSink {
    fn print(&self, markup: &str) -> Result<(), ViewerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size_truncates() {
        let viewport = Viewport {
            width: 918.6,
            height: 1188.9,
            scale: 1.5,
        };
        assert_eq!(viewport.pixel_size(), (918, 1188));
    }

    #[test]
    fn test_pixel_size_never_zero() {
        let viewport = Viewport {
            width: 0.2,
            height: f64::NAN,
            scale: 0.001,
        };
        assert_eq!(viewport.pixel_size(), (1, 1));
    }
}
