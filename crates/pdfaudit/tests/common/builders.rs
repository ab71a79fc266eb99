//! Builders for synthetic PDFs and the fake renderer/OCR pair that lets
//! tests script what "OCR" reads from each page.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage};
use lopdf::{dictionary, Document, Object, Stream};

use pdfaudit::processor::{OcrEngine, PageRenderer};
use pdfaudit::ProcessError;

/// Builds a PDF with one page per entry. `None` produces a page without a
/// content stream, like a scan with no text layer.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        };
        if let Some(text) = text {
            let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            page.set("Contents", content_id);
        }
        kids.push(Object::from(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize PDF");
    bytes
}

/// What the fake OCR "sees" on one page.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrPage {
    Text(String),
    RenderError,
}

pub fn ocr(text: &str) -> OcrPage {
    OcrPage::Text(text.to_string())
}

/// Renders each page as a one-row image whose pixels carry the scripted
/// OCR text, so [`PixelOcr`] can read it back.
pub struct ScriptedRenderer {
    pub scripts: HashMap<PathBuf, Vec<OcrPage>>,
}

impl PageRenderer for ScriptedRenderer {
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage, ProcessError> {
        let script = self
            .scripts
            .get(path)
            .and_then(|pages| pages.get(page as usize - 1));

        let text = match script {
            Some(OcrPage::RenderError) => {
                return Err(ProcessError::RenderFailed("corrupt page".to_string()))
            }
            Some(OcrPage::Text(text)) => text.as_str(),
            None => "",
        };

        // Leading marker keeps the image non-empty for blank pages.
        let mut pixels = vec![1u8];
        pixels.extend_from_slice(text.as_bytes());
        let width = pixels.len() as u32;
        let image = GrayImage::from_raw(width, 1, pixels).expect("pixel buffer matches size");
        Ok(DynamicImage::ImageLuma8(image))
    }
}

/// Decodes the text [`ScriptedRenderer`] stored in the pixels.
pub struct PixelOcr;

impl OcrEngine for PixelOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, ProcessError> {
        let pixels = image.to_luma8().into_raw();
        String::from_utf8(pixels[1..].to_vec())
            .map_err(|e| ProcessError::OcrFailed(e.to_string()))
    }
}
