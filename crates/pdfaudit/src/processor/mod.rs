pub mod ocr;
pub mod pdf;
pub mod render;

use std::path::Path;

use image::DynamicImage;

use crate::error::{PageError, ProcessError};

pub use ocr::OcrProcessor;
pub use pdf::PdfTextLayer;
pub use render::PdftoppmRenderer;

/// Per-page embedded text for a whole document.
#[derive(Debug, Default)]
pub struct EmbeddedText {
    /// One entry per page, in page order; empty when the page has no text.
    pub pages: Vec<String>,
    /// Pages whose text layer could not be decoded (their entry is empty).
    pub failures: Vec<PageError>,
}

impl EmbeddedText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Reads the machine-encoded text layer of a PDF.
pub trait TextLayer: Send + Sync {
    /// Fails only when the file cannot be read or parsed as a PDF at all;
    /// page-level problems are reported in [`EmbeddedText::failures`].
    fn extract(&self, path: &Path) -> Result<EmbeddedText, ProcessError>;
}

/// Renders single PDF pages to pixels.
pub trait PageRenderer: Send + Sync {
    /// `page` is 1-based.
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage, ProcessError>;
}

/// Recognizes text on a rendered page.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String, ProcessError>;
}
