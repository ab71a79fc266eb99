use std::path::Path;

use tracing::{debug, info_span, warn};

use crate::analysis::{ClassificationResult, ConsistencyClassifier, Document, TextNormalizer};
use crate::config::Config;
use crate::error::{PageError, ProcessError};
use crate::processor::{
    OcrEngine, OcrProcessor, PageRenderer, PdfTextLayer, PdftoppmRenderer, TextLayer,
};
use crate::sanitize;

/// Runs one document through text extraction, rasterization, OCR,
/// normalization and classification.
///
/// Never fails: page-level problems degrade that page's text to empty and
/// are listed in the result's warnings, and a file that is not a PDF at all
/// is reported as unreadable.
pub struct DocumentAnalyzer {
    text_layer: Box<dyn TextLayer>,
    renderer: Box<dyn PageRenderer>,
    ocr: Box<dyn OcrEngine>,
    normalizer: TextNormalizer,
    classifier: ConsistencyClassifier,
}

impl DocumentAnalyzer {
    /// Production constructor: lopdf text layer, pdftoppm and Tesseract.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(PdfTextLayer::new()),
            Box::new(PdftoppmRenderer::new(config.ocr.dpi)),
            Box::new(OcrProcessor::new(&config.ocr.languages, config.ocr.dpi)),
            TextNormalizer::new(&config.normalization),
            ConsistencyClassifier::new(config.classification.clone()),
        )
    }

    /// Inject specific sub-components.
    pub fn new(
        text_layer: Box<dyn TextLayer>,
        renderer: Box<dyn PageRenderer>,
        ocr: Box<dyn OcrEngine>,
        normalizer: TextNormalizer,
        classifier: ConsistencyClassifier,
    ) -> Self {
        Self {
            text_layer,
            renderer,
            ocr,
            normalizer,
            classifier,
        }
    }

    /// Analyze the PDF at `path`, reporting it under the identifier `file`.
    pub fn analyze(&self, path: &Path, file: &str) -> ClassificationResult {
        let filename = sanitize::redact_path(path);
        let _span = info_span!("document", filename = %filename).entered();

        let mut warnings: Vec<PageError> = Vec::new();

        // Step 1: Embedded text layer
        let embedded = {
            let _step = info_span!("extract_text").entered();
            match self.text_layer.extract(path) {
                Ok(embedded) => embedded,
                Err(e) => {
                    warn!(error = %e, "document is unreadable");
                    return ClassificationResult::unreadable(file, unreadable_reason(&e));
                }
            }
        };
        warnings.extend(embedded.failures);

        let mut document = Document::new(path, embedded.pages.len());
        for (page, text) in document.pages.iter_mut().zip(embedded.pages) {
            page.embedded = text;
        }

        // Step 2: Rasterize and OCR each page
        for (index, page) in document.pages.iter_mut().enumerate() {
            let page_num = index as u32 + 1;
            match self.ocr_page(path, page_num) {
                Ok(text) => page.ocr = text,
                Err(e) => {
                    warn!(error = %e, "page degraded to empty OCR text");
                    warnings.push(e);
                }
            }
        }

        // Step 3: Normalize
        {
            let _step = info_span!("normalize").entered();
            for page in &mut document.pages {
                page.embedded = self.normalizer.normalize(&page.embedded);
                page.ocr = self.normalizer.normalize(&page.ocr);
            }
        }

        // Step 4: Classify
        let classification = {
            let _step = info_span!("classify").entered();
            self.classifier.classify(&document.pages)
        };

        debug!(
            status = %classification.status,
            similarity = classification.similarity,
            pages = document.page_count(),
            "document classified"
        );

        warnings.sort_by_key(|w| w.page());

        ClassificationResult {
            file: file.to_string(),
            status: classification.status,
            similarity: Some(classification.similarity),
            page_count: document.page_count(),
            reason: classification.reason,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Render one page and recognize its text. The raster is dropped before
    /// returning.
    fn ocr_page(&self, path: &Path, page: u32) -> Result<String, PageError> {
        let image = {
            let _step = info_span!("rasterize", page).entered();
            self.renderer
                .render_page(path, page)
                .map_err(|e| PageError::Render {
                    page,
                    reason: e.to_string(),
                })?
        };

        let _step = info_span!("ocr", page).entered();
        self.ocr.recognize(&image).map_err(|e| PageError::Ocr {
            page,
            reason: e.to_string(),
        })
    }
}

fn unreadable_reason(error: &ProcessError) -> String {
    match error {
        ProcessError::Unreadable { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TextStatus;
    use crate::processor::EmbeddedText;
    use image::DynamicImage;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Text layer returning canned pages.
    struct FakeTextLayer(Result<Vec<String>, String>);

    impl TextLayer for FakeTextLayer {
        fn extract(&self, path: &Path) -> Result<EmbeddedText, ProcessError> {
            match &self.0 {
                Ok(pages) => Ok(EmbeddedText {
                    pages: pages.clone(),
                    failures: vec![],
                }),
                Err(reason) => Err(ProcessError::Unreadable {
                    path: path.to_path_buf(),
                    reason: reason.clone(),
                }),
            }
        }
    }

    /// Renders page N as an N-pixel-wide image, failing on listed pages.
    struct FakeRenderer {
        failing_pages: Vec<u32>,
    }

    impl PageRenderer for FakeRenderer {
        fn render_page(&self, _path: &Path, page: u32) -> Result<DynamicImage, ProcessError> {
            if self.failing_pages.contains(&page) {
                return Err(ProcessError::RenderFailed("corrupt page".to_string()));
            }
            Ok(DynamicImage::new_luma8(page, 1))
        }
    }

    /// Reads the page number back from the image width.
    struct FakeOcr {
        text_by_page: HashMap<u32, String>,
        failing_pages: Vec<u32>,
    }

    impl OcrEngine for FakeOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<String, ProcessError> {
            let page = image.width();
            if self.failing_pages.contains(&page) {
                return Err(ProcessError::OcrFailed("engine error".to_string()));
            }
            Ok(self.text_by_page.get(&page).cloned().unwrap_or_default())
        }
    }

    fn analyzer(
        embedded: Result<Vec<&str>, &str>,
        ocr: &[&str],
        render_failures: Vec<u32>,
        ocr_failures: Vec<u32>,
    ) -> DocumentAnalyzer {
        let text_by_page = ocr
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t.to_string()))
            .collect();
        DocumentAnalyzer::new(
            Box::new(FakeTextLayer(
                embedded
                    .map(|pages| pages.iter().map(|p| p.to_string()).collect())
                    .map_err(str::to_string),
            )),
            Box::new(FakeRenderer {
                failing_pages: render_failures,
            }),
            Box::new(FakeOcr {
                text_by_page,
                failing_pages: ocr_failures,
            }),
            TextNormalizer::default(),
            ConsistencyClassifier::default(),
        )
    }

    fn path() -> PathBuf {
        PathBuf::from("/corpus/doc.pdf")
    }

    #[test]
    fn test_consistent_document() {
        let analyzer = analyzer(
            Ok(vec!["Invoice No. 221", "Total due: 500"]),
            &["invoice no 221", "TOTAL DUE 500"],
            vec![],
            vec![],
        );

        let result = analyzer.analyze(&path(), "doc.pdf");

        assert_eq!(result.file, "doc.pdf");
        assert_eq!(result.status, TextStatus::Consistent);
        assert_eq!(result.similarity, Some(1.0));
        assert_eq!(result.page_count, 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_tampered_document() {
        let analyzer = analyzer(Ok(vec!["Total: $500.00"]), &["Total: $5,000.00"], vec![], vec![]);

        let result = analyzer.analyze(&path(), "doc.pdf");

        assert_eq!(result.status, TextStatus::Suspicious);
        assert!(result.similarity.unwrap() < 0.5);
    }

    #[test]
    fn test_image_only_document() {
        let analyzer = analyzer(Ok(vec![""]), &["INVOICE 221 TOTAL 500"], vec![], vec![]);

        let result = analyzer.analyze(&path(), "scan.pdf");

        assert_eq!(result.status, TextStatus::ImageOnly);
    }

    #[test]
    fn test_unreadable_document() {
        let analyzer = analyzer(Err("invalid file header"), &[], vec![], vec![]);

        let result = analyzer.analyze(&path(), "broken.pdf");

        assert_eq!(result.status, TextStatus::Unreadable);
        assert_eq!(result.reason.as_deref(), Some("invalid file header"));
        assert_eq!(result.similarity, None);
    }

    #[test]
    fn test_render_failure_does_not_abort_document() {
        let analyzer = analyzer(
            Ok(vec!["alpha beta gamma delta", "epsilon zeta eta theta", "iota kappa"]),
            &["alpha beta gamma delta", "epsilon zeta eta theta", "iota kappa"],
            vec![3],
            vec![],
        );

        let result = analyzer.analyze(&path(), "doc.pdf");

        assert_eq!(result.page_count, 3);
        assert_eq!(result.status, TextStatus::Consistent);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("page 3: render failed"));
    }

    #[test]
    fn test_ocr_failure_is_recorded_as_warning() {
        let analyzer = analyzer(
            Ok(vec!["one two three four five six", "seven"]),
            &["one two three four five six", "seven"],
            vec![],
            vec![2],
        );

        let result = analyzer.analyze(&path(), "doc.pdf");

        assert_eq!(result.status, TextStatus::Consistent);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("page 2: OCR failed"));
    }

    #[test]
    fn test_zero_page_document_is_consistent() {
        let analyzer = analyzer(Ok(vec![]), &[], vec![], vec![]);

        let result = analyzer.analyze(&path(), "empty.pdf");

        assert_eq!(result.status, TextStatus::Consistent);
        assert_eq!(result.similarity, Some(1.0));
        assert_eq!(result.page_count, 0);
    }

    #[test]
    fn test_every_page_failing_still_produces_result() {
        let analyzer = analyzer(
            Ok(vec!["some embedded text", "more text"]),
            &[],
            vec![1, 2],
            vec![],
        );

        let result = analyzer.analyze(&path(), "doc.pdf");

        assert_eq!(result.status, TextStatus::Suspicious);
        assert_eq!(result.warnings.len(), 2);
    }
}
