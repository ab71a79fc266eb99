pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod processor;
pub mod sanitize;
pub mod storage;
pub mod worker;

pub use analysis::{ClassificationResult, TextStatus};
pub use config::{load_config, Config};
pub use error::{AuditError, ConfigError, PageError, ProcessError, Result, StorageError, WorkerError};
pub use pipeline::{DocumentAnalyzer, LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use storage::{isolate_suspects, organize_by_status, AnomalyReport, ReportSummary};
pub use worker::{CorpusScanner, DirectoryScanner, ScanOutcome};
