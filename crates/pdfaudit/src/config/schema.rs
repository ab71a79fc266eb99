use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            worker_count: default_worker_count(),
            ocr: OcrConfig::default(),
            normalization: NormalizationConfig::default(),
            classification: ClassificationConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Rasterization resolution in DPI.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_dpi() -> u32 {
    300
}

/// Lowest resolution at which OCR output is still worth comparing.
pub const MIN_DPI: u32 = 150;

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            dpi: default_dpi(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Characters removed before comparison.
    #[serde(default = "default_punctuation")]
    pub punctuation: String,
}

fn default_punctuation() -> String {
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}\u{2022}\u{2026}"
        .to_string()
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            punctuation: default_punctuation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Similarity strictly below this is flagged as suspicious.
    #[serde(default = "default_low_similarity_threshold")]
    pub low_similarity_threshold: f64,
    /// Fraction of pages that must lack embedded text for the image-only rule.
    #[serde(default = "default_empty_page_fraction")]
    pub empty_page_fraction: f64,
    /// OCR text must be longer than this (normalized chars) to count as content.
    #[serde(default = "default_min_ocr_chars")]
    pub min_ocr_chars: usize,
}

fn default_low_similarity_threshold() -> f64 {
    0.5
}

fn default_empty_page_fraction() -> f64 {
    1.0
}

fn default_min_ocr_chars() -> usize {
    10
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            low_similarity_threshold: default_low_similarity_threshold(),
            empty_page_fraction: default_empty_page_fraction(),
            min_ocr_chars: default_min_ocr_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report file name, relative to the scanned root unless absolute.
    #[serde(default = "default_report_filename")]
    pub filename: String,
    /// Folder suspicious PDFs are copied into, relative to the root unless absolute.
    #[serde(default = "default_suspect_directory")]
    pub suspect_directory: String,
    #[serde(default = "default_true")]
    pub include_image_only: bool,
    #[serde(default = "default_true")]
    pub copy_suspects: bool,
    #[serde(default)]
    pub organize_by_status: bool,
}

fn default_report_filename() -> String {
    "pdf_anomalies_report.json".to_string()
}

fn default_suspect_directory() -> String {
    "Suspicious_PDFs".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filename: default_report_filename(),
            suspect_directory: default_suspect_directory(),
            include_image_only: true,
            copy_suspects: true,
            organize_by_status: false,
        }
    }
}
