use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Input directory '{0}' does not exist or is not a directory")]
    InvalidRoot(PathBuf),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),
}

/// Failures scoped to a single page. All of them are recovered by treating
/// the affected text source as empty for that page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("page {page}: render failed: {reason}")]
    Render { page: u32, reason: String },

    #[error("page {page}: embedded text extraction failed: {reason}")]
    Extraction { page: u32, reason: String },

    #[error("page {page}: OCR failed: {reason}")]
    Ocr { page: u32, reason: String },
}

impl PageError {
    pub fn page(&self) -> u32 {
        match self {
            Self::Render { page, .. } | Self::Extraction { page, .. } | Self::Ocr { page, .. } => {
                *page
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document '{path}' is not a readable PDF: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Failed to render page: {0}")]
    RenderFailed(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy file from '{from}' to '{to}': {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub type Result<T> = std::result::Result<T, AuditError>;
