//! Output module for generating crawl summaries and reports
//!
//! This module handles:
//! - Computing link-usage statistics per sitemap
//! - Generating markdown summaries of crawl results
//! - Exporting the full report as JSON

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{write_json_report, JsonReport};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownReport};
pub use stats::{print_statistics, CrawlStatistics, GroupStatistics, UNDER_LINKED_THRESHOLD};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::config::OutputConfig;

/// Builds the report writers requested by the output configuration
///
/// The markdown summary is always written; JSON only when `json-path` is set.
pub fn writers_from_config(config: &OutputConfig) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> =
        vec![Box::new(MarkdownReport::new(&config.summary_path))];

    if let Some(json_path) = &config.json_path {
        writers.push(Box::new(JsonReport::new(json_path)));
    }

    writers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writers_from_config() {
        let mut config = OutputConfig {
            summary_path: "./summary.md".to_string(),
            json_path: None,
        };

        let formats: Vec<&str> = writers_from_config(&config).iter().map(|w| w.format()).collect();
        assert_eq!(formats, vec!["markdown"]);

        config.json_path = Some("./report.json".to_string());
        let writers = writers_from_config(&config);
        assert_eq!(writers.len(), 2);
        assert_eq!(writers[1].path(), std::path::Path::new("./report.json"));
    }
}
