use tracing::{info, warn};

use crate::analysis::{ClassificationResult, TextStatus};

/// Events emitted while a corpus is scanned. All events are delivered from
/// the thread driving the scan, in order.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    ScanStarted {
        total: usize,
    },
    DocumentFinished {
        completed: usize,
        total: usize,
        result: &'a ClassificationResult,
    },
    ScanFinished {
        completed: usize,
        total: usize,
        cancelled: bool,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent<'_>);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent<'_>) {}
}

/// Writes one log line per finished document.
pub struct LogProgress {
    include_image_only: bool,
}

impl LogProgress {
    pub fn new(include_image_only: bool) -> Self {
        Self { include_image_only }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent<'_>) {
        match event {
            ProgressEvent::ScanStarted { total } => {
                info!(total, "Analyzing PDFs");
            }
            ProgressEvent::DocumentFinished {
                completed,
                total,
                result,
            } => {
                if result.is_suspicious(self.include_image_only)
                    || result.status == TextStatus::Unreadable
                {
                    warn!(
                        file = %result.file,
                        status = %result.status,
                        similarity = result.similarity.unwrap_or(f64::NAN),
                        "[{}/{}] flagged",
                        completed,
                        total
                    );
                } else {
                    info!(
                        file = %result.file,
                        status = %result.status,
                        "[{}/{}] analyzed",
                        completed,
                        total
                    );
                }
            }
            ProgressEvent::ScanFinished {
                completed,
                total,
                cancelled,
            } => {
                if cancelled {
                    warn!(completed, total, "Scan cancelled; reporting partial results");
                } else {
                    info!(completed, total, "Scan finished");
                }
            }
        }
    }
}
