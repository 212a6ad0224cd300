//! Scrape coordinator - run orchestration logic
//!
//! This module drives one complete run:
//! - Fetching the index page and discovering item URLs
//! - Fanning item work out under a counting admission gate
//! - Isolating per-item failures as placeholder items
//! - Aggregating items into category-ordered results
//!
//! All item futures are polled from the calling task. Concurrency comes from
//! interleaving their I/O, not from extra threads.

use crate::classify::{Classification, Classifier, ParsedDocument};
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::images::{absolutize_image_url, ImageStore};
use crate::output::{print_statistics, trailing_segment, write_json, CategoryResults, Item, RunStatistics};
use crate::LedgerError;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use tokio::sync::Semaphore;

/// What the coordinator keeps from an item page once it has been classified
#[derive(Debug)]
struct PageSummary {
    name: String,
    classification: Classification,
    image_src: Option<String>,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    classifier: Classifier,
    images: ImageStore,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client, creates the cache and image directories, and compiles
    /// the classifier's category patterns.
    pub async fn new(config: Config) -> Result<Self, LedgerError> {
        let client = build_http_client(&config.scraper)?;
        let fetcher = Fetcher::from_config(client, &config).await?;
        let classifier = Classifier::new(&config.categories, &config.locations)?;
        let images = ImageStore::new(&config.output.image_dir).await?;

        Ok(Self {
            config,
            fetcher,
            classifier,
            images,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a complete scrape and returns the aggregated results
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryResults)` - Every discovered URL is represented by one item
    /// * `Err(LedgerError)` - The index page could not be fetched; nothing was scraped
    pub async fn run(&self) -> Result<CategoryResults, LedgerError> {
        let urls = self.discover_urls().await?;
        let urls = select_urls(urls, self.config.item_limit());

        tracing::info!("Processing {} item pages", urls.len());
        Ok(self.process_all(&urls).await)
    }

    /// Fetches the index page and returns every item URL it links to
    pub async fn discover_urls(&self) -> Result<Vec<String>, LedgerError> {
        let index_url = self.config.index_url();
        tracing::info!("Fetching item URLs from {}", index_url);

        let hrefs = {
            let index = self.fetcher.fetch(&index_url).await.map_err(|e| {
                tracing::error!("Failed to fetch index page: {}", e);
                e
            })?;
            index.category_tree_hrefs()
        };

        let urls: Vec<String> = hrefs
            .iter()
            .map(|href| item_url(&self.config.base_url, href))
            .collect();

        tracing::info!("Discovered {} item URLs", urls.len());
        Ok(urls)
    }

    /// Processes every URL with at most `concurrency-limit` items in flight
    ///
    /// Items are aggregated in completion order.
    pub async fn process_all(&self, urls: &[String]) -> CategoryResults {
        let slots = Semaphore::new(self.config.scraper.concurrency_limit);

        let mut pending: FuturesUnordered<_> = urls
            .iter()
            .map(|url| self.process_bounded(&slots, url))
            .collect();

        let mut results = CategoryResults::new(&self.config.categories);
        while let Some(item) = pending.next().await {
            results.push(item);
        }

        results.finish()
    }

    /// Processes one URL inside an admission slot; never fails
    async fn process_bounded(&self, slots: &Semaphore, url: &str) -> Item {
        let Ok(_permit) = slots.acquire().await else {
            tracing::error!("Admission gate closed before processing {}", url);
            return Item::placeholder(url);
        };

        match self.process_item(url).await {
            Ok(item) => {
                tracing::debug!(
                    "Processed item: {} | Category: {} | Types: {:?} | Image: {}",
                    item.name,
                    item.category,
                    item.types,
                    item.image
                );
                item
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", url, e);
                Item::placeholder(url)
            }
        }
    }

    /// Fetches, classifies, and stores the image for one item page
    pub async fn process_item(&self, url: &str) -> Result<Item, LedgerError> {
        let page = {
            let doc = self.fetcher.fetch(url).await?;
            self.summarize(url, &doc)
        };

        let image = match page.image_src {
            Some(src) => {
                let image_url = absolutize_image_url(&src);
                let path = self.images.store(self.fetcher.client(), &image_url).await?;
                format!("{}{}", self.config.output.image_path_prefix, path.display())
            }
            None => String::new(),
        };

        Ok(Item::from_classification(
            page.name,
            url,
            page.classification,
            image,
        ))
    }

    fn summarize(&self, url: &str, doc: &ParsedDocument) -> PageSummary {
        PageSummary {
            name: doc
                .page_title()
                .unwrap_or_else(|| trailing_segment(url).to_string()),
            classification: self.classifier.classify(doc),
            image_src: doc.infobox_image_src(),
        }
    }
}

/// Applies the test-mode limit to the discovered URLs
pub fn select_urls(mut urls: Vec<String>, limit: Option<usize>) -> Vec<String> {
    if let Some(limit) = limit {
        tracing::info!("TEST MODE: Limiting to {} items.", limit);
        urls.truncate(limit);
    }
    urls
}

/// Resolves an index link to an item URL
///
/// Site-relative links are appended to the base URL; absolute links are kept.
pub fn item_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}{}", base_url.trim_end_matches('/'), href)
}

/// Path of the results document
pub fn output_path(config: &Config) -> PathBuf {
    PathBuf::from(&config.output.dir).join(&config.output.file)
}

/// Runs a scrape and writes the results document
///
/// This is the main entry point. It will:
/// 1. Build the coordinator (client, cache, image store, classifier)
/// 2. Fetch the index page and discover item URLs
/// 3. Process items under the concurrency limit
/// 4. Write the category-ordered JSON document
/// 5. Log (and optionally print) run statistics
///
/// When the index page cannot be fetched no output file is written.
pub async fn run_scrape(config: Config, print_stats: bool) -> Result<RunStatistics, LedgerError> {
    let started_at = Utc::now();
    let start = std::time::Instant::now();

    let coordinator = Coordinator::new(config).await?;
    let path = output_path(coordinator.config());
    let results = coordinator.run().await?;

    write_json(&results, &path)?;

    let stats = RunStatistics::collect(&results, started_at, start.elapsed());
    tracing::info!(
        "Saved {} items to {} in {:.1}s",
        stats.total_items,
        path.display(),
        stats.elapsed.as_secs_f64()
    );

    if print_stats {
        print_statistics(&stats);
    }

    Ok(stats)
}
