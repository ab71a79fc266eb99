pub mod isolate;
pub mod report;

pub use isolate::{isolate_suspects, organize_by_status, status_directory, CopySummary};
pub use report::{AnomalyReport, ReportSummary};
