use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};

use crate::analysis::ClassificationResult;
use crate::error::WorkerError;
use crate::pipeline::DocumentAnalyzer;
use crate::worker::job::Job;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fixed set of threads analyzing documents from a shared queue.
///
/// Results travel over an unbounded channel so a worker never blocks on a
/// slow consumer; jobs are bounded to `capacity()`.
pub struct WorkerPool {
    job_sender: Sender<Job>,
    result_receiver: Receiver<ClassificationResult>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(analyzer: Arc<DocumentAnalyzer>, worker_count: usize) -> Self {
        Self::with_shutdown(analyzer, worker_count, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a pool that stops picking up jobs once `shutdown` is set.
    ///
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn with_shutdown(
        analyzer: Arc<DocumentAnalyzer>,
        worker_count: usize,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let capacity = worker_count * 2;
        let (job_sender, job_receiver) = bounded::<Job>(capacity);
        let (result_sender, result_receiver) = unbounded::<ClassificationResult>();

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let shutdown_flag = Arc::clone(&shutdown);
            let worker_analyzer = Arc::clone(&analyzer);

            let handle = thread::Builder::new()
                .name(format!("pdfaudit-worker-{}", worker_id))
                .spawn(move || {
                    run_worker(worker_id, job_rx, result_tx, shutdown_flag, worker_analyzer);
                });

            match handle {
                Ok(handle) => workers.push(handle),
                Err(e) => error!("Failed to spawn worker {}: {}", worker_id, e),
            }
        }

        info!("Started {} workers", workers.len());

        Self {
            job_sender,
            result_receiver,
            workers,
            shutdown,
            capacity,
        }
    }

    /// Maximum number of queued jobs before `submit` blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        if self.shutdown.load(Ordering::Relaxed) || self.workers.is_empty() {
            return Err(WorkerError::ChannelClosed);
        }

        self.job_sender
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    pub fn recv_result_timeout(&self, timeout: Duration) -> Option<ClassificationResult> {
        self.result_receiver.recv_timeout(timeout).ok()
    }

    pub fn shutdown(&self) {
        info!("Shutting down worker pool...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Closes the queue, waits for every worker to finish its current
    /// document, and returns results not yet received.
    pub fn wait(self) -> Vec<ClassificationResult> {
        // Drop sender to signal workers to exit
        drop(self.job_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");

        self.result_receiver.try_iter().collect()
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<Job>,
    result_sender: Sender<ClassificationResult>,
    shutdown: Arc<AtomicBool>,
    analyzer: Arc<DocumentAnalyzer>,
) {
    debug!("Worker {} started", worker_id);

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Worker {} received shutdown signal", worker_id);
            break;
        }

        match job_receiver.recv_timeout(POLL_INTERVAL) {
            Ok(job) => {
                debug!("Worker {} processing job: {:?}", worker_id, job.source_path);

                let result = analyze_guarded(&analyzer, &job);

                if let Err(e) = result_sender.send(result) {
                    error!("Worker {} failed to send result: {}", worker_id, e);
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Worker {} job channel disconnected", worker_id);
                break;
            }
        }
    }

    debug!("Worker {} stopped", worker_id);
}

/// A panic while analyzing one document becomes an unreadable result, so
/// the document still appears in the report and the worker keeps going.
fn analyze_guarded(analyzer: &DocumentAnalyzer, job: &Job) -> ClassificationResult {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        analyzer.analyze(&job.source_path, &job.file)
    })) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Analysis of {} panicked: {}", job.file, message);
            ClassificationResult::unreadable(
                job.file.clone(),
                format!("analysis aborted: {}", message),
            )
        }
    }
}
