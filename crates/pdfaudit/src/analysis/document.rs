use std::path::PathBuf;

/// Both text sources for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub embedded: String,
    pub ocr: String,
}

impl PageText {
    pub fn new(embedded: impl Into<String>, ocr: impl Into<String>) -> Self {
        Self {
            embedded: embedded.into(),
            ocr: ocr.into(),
        }
    }
}

/// A PDF under analysis. Holding one `PageText` per page keeps the embedded
/// and OCR sequences the same length; a source that produced nothing for a
/// page is the empty string.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub pages: Vec<PageText>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, page_count: usize) -> Self {
        Self {
            path: path.into(),
            pages: vec![PageText::default(); page_count],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
