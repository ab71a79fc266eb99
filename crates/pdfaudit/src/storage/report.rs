use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::analysis::{ClassificationResult, TextStatus};
use crate::error::StorageError;
use crate::sanitize::redact_path;

/// Classification results for a corpus, ordered by `file`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnomalyReport {
    entries: Vec<ClassificationResult>,
}

impl AnomalyReport {
    /// Sorts by `file`, so the report does not depend on completion order.
    pub fn from_results(mut results: Vec<ClassificationResult>) -> Self {
        results.sort_by(|a, b| a.file.cmp(&b.file));
        Self { entries: results }
    }

    pub fn entries(&self) -> &[ClassificationResult] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassificationResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn suspicious(
        &self,
        include_image_only: bool,
    ) -> impl Iterator<Item = &ClassificationResult> + '_ {
        self.entries
            .iter()
            .filter(move |r| r.is_suspicious(include_image_only))
    }

    pub fn summary(&self) -> ReportSummary {
        let mut counts: BTreeMap<TextStatus, usize> =
            TextStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for entry in &self.entries {
            *counts.entry(entry.status).or_default() += 1;
        }
        ReportSummary {
            total: self.entries.len(),
            counts,
        }
    }

    /// JSON array with 4-space indentation; non-ASCII text is written as is.
    pub fn to_json_string(&self) -> Result<String, StorageError> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn write_json(&self, path: &Path) -> Result<(), StorageError> {
        let _span = tracing::info_span!("storage.report", path = %redact_path(path)).entered();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let write_err = |e| StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        };

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        self.serialize_into(&mut writer)?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;

        info!(entries = self.entries.len(), "report written");
        Ok(())
    }

    fn serialize_into<W: Write>(&self, writer: W) -> Result<(), StorageError> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(writer, formatter);
        self.entries.serialize(&mut ser)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AnomalyReport {
    type Item = &'a ClassificationResult;
    type IntoIter = std::slice::Iter<'a, ClassificationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Per-status counts, e.g. for the closing log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub counts: BTreeMap<TextStatus, usize>,
}

impl ReportSummary {
    pub fn count(&self, status: TextStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} documents", self.total)?;
        for status in TextStatus::ALL {
            write!(f, ", {}: {}", status.file_prefix(), self.count(status))?;
        }
        Ok(())
    }
}
