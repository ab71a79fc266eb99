use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::analysis::ClassificationResult;
use crate::error::WorkerError;
use crate::pipeline::{DocumentAnalyzer, ProgressEvent, ProgressReporter};
use crate::storage::AnomalyReport;
use crate::worker::job::Job;
use crate::worker::pool::WorkerPool;
use crate::worker::scanner::DirectoryScanner;

const RESULT_POLL: Duration = Duration::from_millis(100);

/// Results of one corpus scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Sorted by `file`.
    pub report: AnomalyReport,
    /// Number of documents found.
    pub total: usize,
    /// True when the scan was stopped before every document was analyzed.
    pub cancelled: bool,
}

impl ScanOutcome {
    pub fn skipped(&self) -> usize {
        self.total - self.report.len()
    }
}

/// Drives a [`DocumentAnalyzer`] over many documents concurrently.
pub struct CorpusScanner {
    analyzer: Arc<DocumentAnalyzer>,
    worker_count: usize,
    shutdown: Arc<AtomicBool>,
}

impl CorpusScanner {
    pub fn new(analyzer: DocumentAnalyzer, worker_count: usize) -> Self {
        Self::with_shutdown(analyzer, worker_count, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a scanner that cancels once `shutdown` is set.
    pub fn with_shutdown(
        analyzer: DocumentAnalyzer,
        worker_count: usize,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            worker_count: worker_count.max(1),
            shutdown,
        }
    }

    /// Flag that cancels the scan when set, e.g. from a Ctrl-C handler.
    /// Documents already being analyzed still finish and are reported.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn scan_directory(
        &self,
        scanner: &DirectoryScanner,
        progress: &dyn ProgressReporter,
    ) -> Result<ScanOutcome, WorkerError> {
        let jobs = scanner.scan()?;
        self.run(jobs, progress)
    }

    pub fn run(
        &self,
        jobs: Vec<Job>,
        progress: &dyn ProgressReporter,
    ) -> Result<ScanOutcome, WorkerError> {
        let total = jobs.len();
        progress.report(ProgressEvent::ScanStarted { total });

        let pool = WorkerPool::with_shutdown(
            Arc::clone(&self.analyzer),
            self.worker_count.min(total.max(1)),
            Arc::clone(&self.shutdown),
        );

        let capacity = pool.capacity();
        let mut queue = jobs.into_iter();
        let mut in_flight = 0usize;
        let mut results: Vec<ClassificationResult> = Vec::with_capacity(total);

        let record = |result: ClassificationResult, results: &mut Vec<_>| {
            progress.report(ProgressEvent::DocumentFinished {
                completed: results.len() + 1,
                total,
                result: &result,
            });
            results.push(result);
        };

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Queue at most `capacity` jobs so submit never blocks.
            while in_flight < capacity {
                match queue.next() {
                    Some(job) => match pool.submit(job) {
                        Ok(()) => in_flight += 1,
                        // Cancelled between the check above and the submit.
                        Err(_) if pool.is_shutdown() => break,
                        Err(e) => return Err(e),
                    },
                    None => break,
                }
            }

            if in_flight == 0 {
                break;
            }

            if let Some(result) = pool.recv_result_timeout(RESULT_POLL) {
                in_flight -= 1;
                record(result, &mut results);
            }
        }

        for result in pool.wait() {
            record(result, &mut results);
        }

        let cancelled = results.len() < total;
        progress.report(ProgressEvent::ScanFinished {
            completed: results.len(),
            total,
            cancelled,
        });

        info!("Analyzed {} of {} documents", results.len(), total);

        Ok(ScanOutcome {
            report: AnomalyReport::from_results(results),
            total,
            cancelled,
        })
    }
}
