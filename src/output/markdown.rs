//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl:
//! run information, totals, and a per-sitemap table showing how often each
//! page is linked and from where.

use crate::crawler::CrawlReport;
use crate::output::stats::{CrawlStatistics, UNDER_LINKED_THRESHOLD};
use crate::output::traits::{OutputError, OutputResult, ReportWriter};
use crate::state::{PageRecord, PageStatus};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the markdown summary to a fixed path
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for MarkdownReport {
    fn format(&self) -> &'static str {
        "markdown"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        generate_markdown_summary(report, &self.path)
    }
}

/// Generates a markdown summary from a crawl report
///
/// # Arguments
///
/// * `report` - The completed crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);
    fs::write(output_path, markdown).map_err(|e| OutputError::write(output_path, e))
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The completed crawl
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let stats = CrawlStatistics::from_report(report);
    let mut md = String::new();

    // Title
    md.push_str("# Sitemap Usage Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Sitemap Index**: {}\n", report.index_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        stats.duration_seconds,
        stats.duration_seconds as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Sitemaps**: {}\n", stats.groups.len()));
    md.push_str(&format!("- **Total Pages**: {}\n", stats.total_pages));
    md.push_str(&format!(
        "- **Pages Used**: {} ({:.2}%)\n",
        stats.pages_used,
        stats.usage_rate()
    ));
    md.push_str(&format!(
        "- **Pages Not Linked**: {}\n",
        stats.pages_not_linked
    ));
    md.push_str(&format!(
        "- **Pages Under-Linked** (fewer than {} references): {}\n",
        UNDER_LINKED_THRESHOLD, stats.pages_under_linked
    ));
    md.push_str(&format!(
        "- **Pages With Errors**: {} ({:.2}%)\n\n",
        stats.pages_with_errors,
        stats.error_rate()
    ));

    if !stats.groups.is_empty() {
        md.push_str("## Sitemap Breakdown\n\n");
        md.push_str("| Sitemap | Pages | Used | Not Linked | Under-Linked | Errors |\n");
        md.push_str("|---------|-------|------|------------|--------------|--------|\n");
        for group in &stats.groups {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                group.name,
                group.total_pages,
                group.pages_used,
                group.pages_not_linked,
                group.pages_under_linked,
                group.pages_with_errors
            ));
        }
        md.push('\n');
    }

    // Per-page detail
    for group in &report.groups {
        md.push_str(&format!("## {}\n\n", group.name));
        md.push_str(&format!("Source: {}\n\n", group.source_url));

        let records = group.records();
        if records.is_empty() {
            md.push_str("No pages listed.\n\n");
            continue;
        }

        md.push_str("| URL | Status | Code | Used | Linked From |\n");
        md.push_str("|-----|--------|------|------|-------------|\n");
        for record in &records {
            md.push_str(&format_record_row(record));
        }
        md.push('\n');
    }

    md
}

/// Formats one page row; referrers are listed in URL order
fn format_record_row(record: &PageRecord) -> String {
    let status = match record.status {
        PageStatus::Ok => "OK",
        PageStatus::Error => "Error",
        PageStatus::Pending => "Pending",
    };

    let code = record
        .status_code
        .as_ref()
        .map(|code| escape_cell(&code.to_string()))
        .unwrap_or_default();

    let linked_from = if record.used_by_pages.is_empty() {
        "Not linked from any page".to_string()
    } else {
        record
            .used_by_pages
            .iter()
            .map(|(referrer, count)| format!("{} ({})", referrer, count))
            .collect::<Vec<_>>()
            .join("<br>")
    };

    format!(
        "| {} | {} | {} | {} | {} |\n",
        escape_cell(record.url.as_str()),
        status,
        code,
        record.used_count,
        escape_cell(&linked_from)
    )
}

/// Keeps table cells on one row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
