use crate::analysis::document::PageText;
use crate::analysis::result::TextStatus;
use crate::analysis::similarity::paged_similarity;
use crate::config::ClassificationConfig;

/// Verdict for one document, before it is packaged with file metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: TextStatus,
    pub similarity: f64,
    pub reason: Option<String>,
}

/// Decides whether a document's embedded text agrees with what OCR reads
/// off the rendered pages.
///
/// Pages must already be normalized. Rules are evaluated in order:
///
/// 1. Enough pages carry no embedded text (`empty_page_fraction`) while OCR
///    recognized more than `min_ocr_chars` characters: image only.
/// 2. Similarity below `low_similarity_threshold`: suspicious.
/// 3. Otherwise consistent.
///
/// A document with no pages, or no text in either source, is consistent.
/// Similarity is aligned page by page, see [`paged_similarity`].
#[derive(Debug, Clone)]
pub struct ConsistencyClassifier {
    config: ClassificationConfig,
}

impl ConsistencyClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, pages: &[PageText]) -> Classification {
        let page_count = pages.len();
        let ocr = join_pages(pages.iter().map(|p| p.ocr.as_str()));
        let ocr_chars = ocr.chars().count();
        let no_embedded = pages.iter().all(|p| p.embedded.is_empty());

        if page_count == 0 || (no_embedded && ocr.is_empty()) {
            return Classification {
                status: TextStatus::Consistent,
                similarity: 1.0,
                reason: Some("no text in either source".to_string()),
            };
        }

        let score = paged_similarity(
            pages
                .iter()
                .map(|p| (p.embedded.as_str(), p.ocr.as_str())),
        );
        let empty_pages = pages.iter().filter(|p| p.embedded.is_empty()).count();
        let empty_fraction = empty_pages as f64 / page_count as f64;

        if empty_fraction >= self.config.empty_page_fraction && ocr_chars > self.config.min_ocr_chars
        {
            return Classification {
                status: TextStatus::ImageOnly,
                similarity: score,
                reason: Some(format!(
                    "no embedded text on {} of {} pages; OCR recognized {} characters",
                    empty_pages, page_count, ocr_chars
                )),
            };
        }

        if score < self.config.low_similarity_threshold {
            let reason = if ocr.is_empty() {
                "OCR recognized no text on any page".to_string()
            } else {
                format!(
                    "similarity {:.3} below threshold {:.3}",
                    score, self.config.low_similarity_threshold
                )
            };
            return Classification {
                status: TextStatus::Suspicious,
                similarity: score,
                reason: Some(reason),
            };
        }

        Classification {
            status: TextStatus::Consistent,
            similarity: score,
            reason: None,
        }
    }
}

impl Default for ConsistencyClassifier {
    fn default() -> Self {
        Self::new(ClassificationConfig::default())
    }
}

/// Joins pages in order, skipping empty ones so they add no stray spaces.
fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
