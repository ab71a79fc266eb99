//! Test harness for isolated corpus scans.
//!
//! The `TestHarness` owns a temporary corpus directory, writes synthetic
//! PDFs into it, and builds analyzers whose OCR output is scripted per page.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use pdfaudit::analysis::{ConsistencyClassifier, TextNormalizer};
use pdfaudit::config::ClassificationConfig;
use pdfaudit::pipeline::NoopProgress;
use pdfaudit::processor::PdfTextLayer;
use pdfaudit::{CorpusScanner, DirectoryScanner, DocumentAnalyzer, ScanOutcome};

use super::builders::{build_pdf, OcrPage, PixelOcr, ScriptedRenderer};

pub struct TestHarness {
    temp_dir: TempDir,
    /// Root of the corpus being scanned.
    pub root: PathBuf,
    scripts: HashMap<PathBuf, Vec<OcrPage>>,
    classification: ClassificationConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("corpus");
        std::fs::create_dir_all(&root).expect("Failed to create corpus dir");

        Self {
            temp_dir,
            root,
            scripts: HashMap::new(),
            classification: ClassificationConfig::default(),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_classification(mut self, classification: ClassificationConfig) -> Self {
        self.classification = classification;
        self
    }

    /// Writes a PDF at `relative` with the given embedded text per page and
    /// scripts what OCR reads from each page.
    pub fn add_pdf(&mut self, relative: &str, embedded: &[Option<&str>], ocr: &[OcrPage]) -> PathBuf {
        let path = self.write_file(relative, &build_pdf(embedded));
        self.scripts.insert(path.clone(), ocr.to_vec());
        path
    }

    /// Writes raw bytes at `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn analyzer(&self) -> DocumentAnalyzer {
        DocumentAnalyzer::new(
            Box::new(PdfTextLayer::new()),
            Box::new(ScriptedRenderer {
                scripts: self.scripts.clone(),
            }),
            Box::new(PixelOcr),
            TextNormalizer::default(),
            ConsistencyClassifier::new(self.classification.clone()),
        )
    }

    pub fn scan(&self, workers: usize) -> ScanOutcome {
        self.scan_with(DirectoryScanner::new(&self.root), workers)
    }

    pub fn scan_with(&self, scanner: DirectoryScanner, workers: usize) -> ScanOutcome {
        CorpusScanner::new(self.analyzer(), workers)
            .scan_directory(&scanner, &NoopProgress)
            .expect("Scan failed")
    }
}
