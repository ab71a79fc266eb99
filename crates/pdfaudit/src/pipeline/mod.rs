pub mod analyzer;
pub mod progress;

pub use analyzer::DocumentAnalyzer;
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
