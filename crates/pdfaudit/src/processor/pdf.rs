use std::path::Path;

use tracing::warn;

use crate::error::{PageError, ProcessError};
use crate::processor::{EmbeddedText, TextLayer};

/// Text layer backed by lopdf.
#[derive(Debug, Clone, Default)]
pub struct PdfTextLayer;

impl PdfTextLayer {
    pub fn new() -> Self {
        Self
    }
}

impl TextLayer for PdfTextLayer {
    fn extract(&self, path: &Path) -> Result<EmbeddedText, ProcessError> {
        let _span = tracing::info_span!("processor.text_layer").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = lopdf::Document::load_mem(&pdf_bytes).map_err(|e| ProcessError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(extract_pages(&doc))
    }
}

fn extract_pages(doc: &lopdf::Document) -> EmbeddedText {
    let mut embedded = EmbeddedText::default();

    // get_pages is keyed by 1-based page number in document order.
    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(raw) => {
                let (text, had_markers) = strip_encoding_markers(&raw);
                if had_markers && text.trim().is_empty() {
                    warn!(page = page_num, "text layer uses an unsupported font encoding");
                    embedded.failures.push(PageError::Extraction {
                        page: page_num,
                        reason: "unsupported font encoding (Identity-H)".to_string(),
                    });
                }
                embedded.pages.push(text);
            }
            Err(e) => {
                warn!(page = page_num, error = %e, "embedded text extraction failed");
                embedded.failures.push(PageError::Extraction {
                    page: page_num,
                    reason: e.to_string(),
                });
                embedded.pages.push(String::new());
            }
        }
    }

    embedded
}

/// Placeholder lopdf emits for glyphs in CID fonts it cannot decode.
const IDENTITY_H_PATTERN: &str = "?Identity-H Unimplemented?";

/// Removes undecodable-glyph placeholders. Returns the cleaned text and
/// whether any placeholder was present.
fn strip_encoding_markers(text: &str) -> (String, bool) {
    if text.contains(IDENTITY_H_PATTERN) {
        (text.replace(IDENTITY_H_PATTERN, ""), true)
    } else {
        (text.to_string(), false)
    }
}
