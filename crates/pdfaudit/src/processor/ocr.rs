use std::io::Cursor;
use std::sync::Arc;

use image::DynamicImage;

use crate::error::{ConfigError, ProcessError};
use crate::processor::OcrEngine;

/// Tesseract via leptess.
#[derive(Clone)]
pub struct OcrProcessor {
    inner: Arc<OcrProcessorInner>,
}

struct OcrProcessorInner {
    languages: String,
    dpi: u32,
}

impl OcrProcessor {
    pub fn new(languages: &[String], dpi: u32) -> Self {
        let languages: Vec<&str> = languages
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        let lang_str = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };

        Self {
            inner: Arc::new(OcrProcessorInner {
                languages: lang_str,
                dpi,
            }),
        }
    }

    pub fn languages(&self) -> &str {
        &self.inner.languages
    }

    pub fn dpi(&self) -> u32 {
        self.inner.dpi
    }

    /// Initializes Tesseract once so a missing engine or language pack is
    /// reported before any document is processed.
    pub fn check_available(&self) -> Result<(), ConfigError> {
        leptess::LepTess::new(None, &self.inner.languages).map_err(|e| {
            ConfigError::OcrUnavailable(format!(
                "failed to initialize Tesseract with languages '{}': {}",
                self.inner.languages, e
            ))
        })?;
        Ok(())
    }
}

impl OcrEngine for OcrProcessor {
    fn recognize(&self, image: &DynamicImage) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("processor.ocr").entered();

        let png_data = grayscale_png(image)?;

        let mut lt = leptess::LepTess::new(None, &self.inner.languages).map_err(|e| {
            ProcessError::OcrFailed(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;
        lt.set_source_resolution(self.inner.dpi as i32);

        let text = lt
            .get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))?;

        Ok(text)
    }
}

/// Encodes the page as an 8-bit grayscale PNG, the form Tesseract reads
/// most reliably.
fn grayscale_png(image: &DynamicImage) -> Result<Vec<u8>, ProcessError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ProcessError::OcrFailed("page image is empty".to_string()));
    }

    let gray = DynamicImage::ImageLuma8(image.to_luma8());
    let mut png_data = Vec::new();
    gray.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
        .map_err(|e| ProcessError::OcrFailed(format!("Failed to convert image: {}", e)))?;

    Ok(png_data)
}
