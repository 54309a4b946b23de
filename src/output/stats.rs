//! Statistics generation from a crawl report
//!
//! This module provides functionality for summarizing link usage per sitemap
//! group and displaying it on stdout.

use crate::crawler::CrawlReport;
use crate::state::{PageRecord, PageStatus, SitemapGroup};
use serde::Serialize;

/// Pages with fewer references than this (but at least one) are under-linked
pub const UNDER_LINKED_THRESHOLD: u64 = 2;

/// Link-usage statistics of one sitemap group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStatistics {
    /// Filename stem of the sitemap
    pub name: String,

    /// Total number of pages in the group
    pub total_pages: u64,

    /// Pages referenced by at least one page of the group
    pub pages_used: u64,

    /// Pages not referenced by any page of the group
    pub pages_not_linked: u64,

    /// Pages whose fetch did not end Ok
    pub pages_with_errors: u64,

    /// Pages referenced, but fewer than [`UNDER_LINKED_THRESHOLD`] times
    pub pages_under_linked: u64,

    /// Sum of all usage counts
    pub total_references: u64,
}

impl GroupStatistics {
    /// Computes statistics for a completed group
    pub fn from_group(group: &SitemapGroup) -> Self {
        let mut stats = Self {
            name: group.name.clone(),
            ..Self::default()
        };

        for record in group.records() {
            stats.add(&record);
        }

        stats
    }

    fn add(&mut self, record: &PageRecord) {
        self.total_pages += 1;
        self.total_references += record.used_count;

        if record.used_count > 0 {
            self.pages_used += 1;
        } else {
            self.pages_not_linked += 1;
        }

        if record.status != PageStatus::Ok {
            self.pages_with_errors += 1;
        }

        if record.used_count > 0 && record.used_count < UNDER_LINKED_THRESHOLD {
            self.pages_under_linked += 1;
        }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Per-group statistics in crawl order
    pub groups: Vec<GroupStatistics>,

    pub total_pages: u64,
    pub pages_used: u64,
    pub pages_not_linked: u64,
    pub pages_with_errors: u64,
    pub pages_under_linked: u64,

    /// Run duration in whole seconds
    pub duration_seconds: i64,
}

impl CrawlStatistics {
    /// Computes statistics for a whole report
    ///
    /// # Arguments
    ///
    /// * `report` - The completed crawl
    ///
    /// # Returns
    ///
    /// Group statistics plus totals summed across groups
    pub fn from_report(report: &CrawlReport) -> Self {
        let groups: Vec<GroupStatistics> =
            report.groups.iter().map(GroupStatistics::from_group).collect();

        Self {
            total_pages: groups.iter().map(|g| g.total_pages).sum(),
            pages_used: groups.iter().map(|g| g.pages_used).sum(),
            pages_not_linked: groups.iter().map(|g| g.pages_not_linked).sum(),
            pages_with_errors: groups.iter().map(|g| g.pages_with_errors).sum(),
            pages_under_linked: groups.iter().map(|g| g.pages_under_linked).sum(),
            duration_seconds: report.duration().num_seconds(),
            groups,
        }
    }

    /// Returns the share of pages that are referenced at least once
    pub fn usage_rate(&self) -> f64 {
        percentage(self.pages_used, self.total_pages)
    }

    /// Returns the share of pages whose fetch failed
    pub fn error_rate(&self) -> f64 {
        percentage(self.pages_with_errors, self.total_pages)
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Sitemap Usage Statistics ===\n");

    println!("Overview:");
    println!("  Sitemaps crawled: {}", stats.groups.len());
    println!("  Total pages: {}", stats.total_pages);
    println!(
        "  Pages used: {} ({:.1}%)",
        stats.pages_used,
        stats.usage_rate()
    );
    println!("  Pages not linked: {}", stats.pages_not_linked);
    println!(
        "  Pages under-linked (< {} references): {}",
        UNDER_LINKED_THRESHOLD, stats.pages_under_linked
    );
    println!(
        "  Pages with errors: {} ({:.1}%)",
        stats.pages_with_errors,
        stats.error_rate()
    );
    println!("  Duration: {}s", stats.duration_seconds);
    println!();

    if stats.groups.is_empty() {
        return;
    }

    println!("By Sitemap:");
    for group in &stats.groups {
        println!(
            "  {}: {} pages, {} used, {} not linked, {} errors",
            group.name,
            group.total_pages,
            group.pages_used,
            group.pages_not_linked,
            group.pages_with_errors
        );
    }
    println!();
}
