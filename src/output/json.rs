//! JSON report export

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputError, OutputResult, ReportWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the full report as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonReport {
    path: PathBuf,
}

impl JsonReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for JsonReport {
    fn format(&self) -> &'static str {
        "json"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        write_json_report(report, &self.path)
    }
}

/// Serializes a crawl report to a JSON file
///
/// Groups keep crawl order and pages keep sitemap order.
///
/// # Arguments
///
/// * `report` - The completed crawl
/// * `output_path` - Path where the JSON file should be written
pub fn write_json_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let file = File::create(output_path).map_err(|e| OutputError::write(output_path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| OutputError::write(output_path, e))
}
