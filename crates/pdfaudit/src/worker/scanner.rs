use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;
use crate::worker::job::Job;

/// Finds PDFs under a root directory, recursively.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    excluded: Vec<PathBuf>,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            excluded: Vec::new(),
        }
    }

    /// Skip a directory (and everything below it), e.g. the folder suspect
    /// copies are written to. Relative paths are resolved against the root.
    /// Paths are compared in canonical form, so `..` segments and symlinked
    /// roots still match.
    pub fn exclude<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.input_directory.join(dir)
        };
        self.excluded.push(canonical(dir));
        self
    }

    /// Returns one job per `.pdf` file (case-insensitive), sorted by path.
    pub fn scan(&self) -> Result<Vec<Job>, WorkerError> {
        let mut jobs = Vec::new();

        let walker = WalkDir::new(&self.input_directory)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && self.is_excluded(e.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WorkerError::ScanFailed {
                        path: self.input_directory.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if is_pdf(path) {
                debug!("Found document: {}", path.display());
                jobs.push(Job::under_root(&self.input_directory, path.to_path_buf()));
            }
        }

        jobs.sort_by(|a, b| a.file.cmp(&b.file));

        info!(
            "Scanned {} documents in {}",
            jobs.len(),
            self.input_directory.display()
        );
        Ok(jobs)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let path = canonical(path.to_path_buf());
        self.excluded.iter().any(|dir| &path == dir)
    }
}

/// Directories that do not exist yet keep their given form.
fn canonical(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
