//! Crawl statistics
//!
//! This module provides the summary of a finished (or cancelled) crawl and
//! its console rendering.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,

    /// Pages that consumed budget (fetched or failed)
    pub pages_visited: usize,

    /// Pages fetched and scanned
    pub pages_processed: usize,

    /// Pages whose fetch failed after retries
    pub pages_failed: usize,

    /// Pages with at least one email address
    pub pages_with_findings: usize,

    /// Findings across all pages, duplicates across pages included
    pub total_findings: usize,

    /// Distinct email addresses
    pub unique_emails: usize,

    /// URLs discovered but never visited
    pub frontier_remaining: usize,

    /// Whether the crawl was interrupted
    pub cancelled: bool,
}

impl CrawlStatistics {
    /// Returns the share of visited pages that were fetched, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.pages_processed as f64 / self.pages_visited as f64) * 100.0
    }

    /// Returns the crawl rate in pages per second
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.pages_visited as f64 / secs
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!(
        "  Started: {}",
        stats.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Duration: {:.1}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
    if stats.cancelled {
        println!("  Status: cancelled");
    }
    println!();

    println!("Pages:");
    println!("  Visited: {}", stats.pages_visited);
    println!("  Processed: {}", stats.pages_processed);
    println!("  Failed: {}", stats.pages_failed);
    println!("  Left in frontier: {}", stats.frontier_remaining);
    println!();

    println!("Email Addresses:");
    println!("  Pages with addresses: {}", stats.pages_with_findings);
    println!("  Total findings: {}", stats.total_findings);
    println!("  Unique addresses: {}", stats.unique_emails);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        stats.success_rate(),
        stats.pages_processed,
        stats.pages_visited
    );
}
