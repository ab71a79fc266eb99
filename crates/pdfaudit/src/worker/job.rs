use std::path::{Path, PathBuf};

use crate::sanitize;

/// One PDF queued for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source_path: PathBuf,
    /// Identifier reported in the `file` field, relative to the scanned root.
    pub file: String,
}

impl Job {
    pub fn new(source_path: PathBuf, file: impl Into<String>) -> Self {
        Self {
            source_path,
            file: file.into(),
        }
    }

    /// Creates a job whose identifier is `source_path` relative to `root`.
    pub fn under_root(root: &Path, source_path: PathBuf) -> Self {
        let file = sanitize::relative_id(root, &source_path);
        Self::new(source_path, file)
    }
}
