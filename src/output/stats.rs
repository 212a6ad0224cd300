//! Run statistics
//!
//! Summarizes a finished run for the log and the terminal.

use crate::classify::UNKNOWN;
use crate::output::results::CategoryResults;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Statistics for one completed run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Number of item URLs processed
    pub total_items: usize,

    /// Item count per category, in output order
    pub per_category: Vec<(String, usize)>,

    /// Items whose main type could not be detected (placeholders included)
    pub untyped_items: usize,

    /// Stand-in items recorded for pages that failed to process
    pub placeholders: usize,

    /// Items without an image
    pub missing_images: usize,
}

impl RunStatistics {
    /// Collects statistics from finished results
    pub fn collect(results: &CategoryResults, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        let items = || results.iter().flat_map(|(_, items)| items.iter());

        Self {
            started_at,
            elapsed,
            total_items: results.total_items(),
            per_category: results
                .iter()
                .map(|(category, items)| (category.to_string(), items.len()))
                .collect(),
            untyped_items: items()
                .filter(|item| item.types.first().map(String::as_str) == Some(UNKNOWN))
                .count(),
            placeholders: items().filter(|item| item.is_placeholder()).count(),
            missing_images: items().filter(|item| item.image.is_empty()).count(),
        }
    }

    /// Number of items in the `"Unknown"` category
    pub fn uncategorized(&self) -> usize {
        self.per_category
            .iter()
            .find(|(category, _)| category == UNKNOWN)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!("  Items processed: {}", stats.total_items);
    println!();

    println!("Items by Category:");
    for (category, count) in &stats.per_category {
        let percentage = if stats.total_items > 0 {
            (*count as f64 / stats.total_items as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
    println!();

    println!("  Failed pages: {}", stats.placeholders);
    println!("  Without main type: {}", stats.untyped_items);
    println!("  Uncategorized: {}", stats.uncategorized());
    println!("  Without image: {}", stats.missing_images);
}
