pub mod corpus;
pub mod job;
pub mod pool;
pub mod scanner;

pub use corpus::{CorpusScanner, ScanOutcome};
pub use job::Job;
pub use pool::WorkerPool;
pub use scanner::DirectoryScanner;
