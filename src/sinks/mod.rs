//! Report outputs: the JSON-lines report file and the final run summary.
mod format;
mod report;
mod summary;


pub use report::{ReportRecord, ReportSink};
pub use summary::{RunSummary, format_summary};
