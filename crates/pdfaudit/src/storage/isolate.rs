use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::analysis::{ClassificationResult, TextStatus};
use crate::error::StorageError;
use crate::sanitize::sanitize_component;
use crate::storage::report::AnomalyReport;

/// Tally of a copy pass. Individual copy failures are logged and counted
/// rather than aborting the pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub copied: Vec<PathBuf>,
    pub failed: usize,
}

/// Copies every suspicious document to `dest/<prefix>_<file name>`, where
/// the prefix comes from [`TextStatus::file_prefix`]. Image-only documents
/// are included when `include_image_only` is set.
///
/// Fails only when `dest` cannot be created.
pub fn isolate_suspects(
    report: &AnomalyReport,
    root: &Path,
    dest: &Path,
    include_image_only: bool,
) -> Result<CopySummary, StorageError> {
    let _span = tracing::info_span!("storage.isolate").entered();

    let mut summary = CopySummary::default();
    let mut suspects = report.suspicious(include_image_only).peekable();
    if suspects.peek().is_none() {
        return Ok(summary);
    }

    ensure_directory(dest)?;

    for entry in suspects {
        let Some(name) = source_file_name(root, entry) else {
            continue;
        };
        let target = format!("{}_{}", entry.status.file_prefix(), name);
        copy_entry(root, entry, dest, &target, &mut summary);
    }

    info!(
        "Isolated {} suspicious documents into {} ({} failed)",
        summary.copied.len(),
        dest.display(),
        summary.failed
    );
    Ok(summary)
}

/// Folder under `root` that documents with `status` are sorted into.
pub fn status_directory(root: &Path, status: TextStatus) -> PathBuf {
    root.join(sanitize_component(status.label()))
}

/// Copies every analyzed document into `<root>/<sanitized label>/`.
/// Unreadable documents are left where they are.
pub fn organize_by_status(
    report: &AnomalyReport,
    root: &Path,
) -> Result<CopySummary, StorageError> {
    let _span = tracing::info_span!("storage.organize").entered();

    let mut summary = CopySummary::default();

    for entry in report.iter().filter(|e| e.status != TextStatus::Unreadable) {
        let Some(name) = source_file_name(root, entry) else {
            continue;
        };
        let dest = status_directory(root, entry.status);
        ensure_directory(&dest)?;
        copy_entry(root, entry, &dest, &name, &mut summary);
    }

    info!(
        "Organized {} documents by status ({} failed)",
        summary.copied.len(),
        summary.failed
    );
    Ok(summary)
}

fn source_file_name(root: &Path, entry: &ClassificationResult) -> Option<String> {
    let name = root
        .join(&entry.file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    if name.is_none() {
        warn!("Skipping entry without a file name: {}", entry.file);
    }
    name
}

fn copy_entry(
    root: &Path,
    entry: &ClassificationResult,
    dest_dir: &Path,
    file_name: &str,
    summary: &mut CopySummary,
) {
    let source = root.join(&entry.file);
    let target = resolve_conflict(dest_dir, file_name);

    match std::fs::copy(&source, &target) {
        Ok(_) => summary.copied.push(target),
        Err(e) => {
            let err = StorageError::CopyFile {
                from: source,
                to: target,
                source: e,
            };
            warn!("{}", err);
            summary.failed += 1;
        }
    }
}

fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Appends `_2`, `_3`, ... before the extension until the name is free, so
/// two documents with the same name from different folders both survive.
fn resolve_conflict(directory: &Path, filename: &str) -> PathBuf {
    let path = directory.join(filename);
    if std::fs::symlink_metadata(&path).is_err() {
        return path;
    }

    let (base, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => (&filename[..dot], &filename[dot..]),
        _ => (filename, ""),
    };

    let mut counter = 2;
    loop {
        let candidate = directory.join(format!("{}_{}{}", base, counter, ext));
        if std::fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        counter += 1;
    }
}
