//! Crawler module for page fetching and run coordination
//!
//! This module contains the fetch-cache-classify pipeline:
//! - Retry policy with exponential backoff
//! - Disk-backed page cache
//! - Cache-aware HTTP fetching
//! - Preview image storage
//! - Overall run coordination

mod cache;
mod coordinator;
mod fetcher;
mod images;
mod retry;

pub use cache::{url_digest, PageCache};
pub use coordinator::{item_url, output_path, run_scrape, select_urls, Coordinator};
pub use fetcher::{build_http_client, Fetcher};
pub use images::{absolutize_image_url, ImageStore};
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::output::RunStatistics;
use crate::LedgerError;

/// Runs a complete scrape operation
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `print_stats` - Print run statistics to stdout when done
///
/// # Returns
///
/// * `Ok(RunStatistics)` - Run completed and the results document was written
/// * `Err(LedgerError)` - The run aborted; no results document was written
pub async fn scrape(config: Config, print_stats: bool) -> Result<RunStatistics, LedgerError> {
    run_scrape(config, print_stats).await
}
