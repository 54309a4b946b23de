//! Output writer trait and errors
//!
//! Every report format implements [`ReportWriter`]; the binary writes the
//! same [`CrawlReport`] through each configured writer.

use crate::crawler::CrawlReport;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutputError {
    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report writers
///
/// Writers are handed the report once the run completes.
pub trait ReportWriter {
    /// Short format name used in log messages
    fn format(&self) -> &'static str;

    /// Destination of the report
    fn path(&self) -> &Path;

    /// Writes the report
    ///
    /// # Arguments
    ///
    /// * `report` - The completed crawl
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()>;
}
