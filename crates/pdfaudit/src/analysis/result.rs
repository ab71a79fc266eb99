use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of comparing a document's embedded text with its OCR text.
///
/// Serialized as the exact label strings downstream report consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TextStatus {
    #[serde(rename = "Consistent text (OK)")]
    Consistent,
    #[serde(rename = "Suspicious text (Possible tampering detected)")]
    Suspicious,
    #[serde(rename = "Image only (possibly scanned or edited)")]
    ImageOnly,
    #[serde(rename = "Unreadable (not a valid PDF)")]
    Unreadable,
}

impl TextStatus {
    pub const ALL: [TextStatus; 4] = [
        TextStatus::Consistent,
        TextStatus::Suspicious,
        TextStatus::ImageOnly,
        TextStatus::Unreadable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Consistent => "Consistent text (OK)",
            Self::Suspicious => "Suspicious text (Possible tampering detected)",
            Self::ImageOnly => "Image only (possibly scanned or edited)",
            Self::Unreadable => "Unreadable (not a valid PDF)",
        }
    }

    /// Lower-cased first word of the label, used to prefix isolated copies
    /// (`suspicious_invoice.pdf`, `image_scan.pdf`).
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Consistent => "consistent",
            Self::Suspicious => "suspicious",
            Self::ImageOnly => "image",
            Self::Unreadable => "unreadable",
        }
    }

    pub fn is_suspicious(&self, include_image_only: bool) -> bool {
        match self {
            Self::Suspicious => true,
            Self::ImageOnly => include_image_only,
            Self::Consistent | Self::Unreadable => false,
        }
    }
}

impl fmt::Display for TextStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-document report record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Path relative to the scanned root, `/`-separated.
    pub file: String,
    #[serde(rename = "text_status")]
    pub status: TextStatus,
    /// Absent when the document could not be analyzed at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub page_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Non-fatal page failures encountered while analyzing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ClassificationResult {
    pub fn unreadable(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: TextStatus::Unreadable,
            similarity: None,
            page_count: 0,
            reason: Some(reason.into()),
            warnings: Vec::new(),
        }
    }

    pub fn is_suspicious(&self, include_image_only: bool) -> bool {
        self.status.is_suspicious(include_image_only)
    }
}
