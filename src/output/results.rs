//! Item records and category-ordered aggregation

use crate::classify::{Classification, UNKNOWN};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One scraped item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Main type followed by its subtypes, or `["Unknown"]`
    pub types: Vec<String>,
    pub location: String,
    /// Always empty; no tier detection exists
    pub tier: String,
    pub category: String,
    pub url: String,
    /// Local image path, or empty
    pub image: String,
}

impl Item {
    /// Builds an item from a successful classification
    pub fn from_classification(
        name: String,
        url: &str,
        classification: Classification,
        image: String,
    ) -> Self {
        Self {
            name,
            types: classification.types(),
            location: classification.location,
            tier: String::new(),
            category: classification.category,
            url: url.to_string(),
            image,
        }
    }

    /// The stand-in recorded for a URL whose processing failed
    pub fn placeholder(url: &str) -> Self {
        Self {
            name: trailing_segment(url).to_string(),
            types: vec![UNKNOWN.to_string()],
            location: String::new(),
            tier: String::new(),
            category: UNKNOWN.to_string(),
            url: url.to_string(),
            image: String::new(),
        }
    }

    /// Returns true if this item has the shape of [`Item::placeholder`]
    ///
    /// A fetched page with no type, category, location, or image looks the same.
    pub fn is_placeholder(&self) -> bool {
        self.types.len() == 1
            && self.types[0] == UNKNOWN
            && self.category == UNKNOWN
            && self.location.is_empty()
            && self.tier.is_empty()
            && self.image.is_empty()
    }
}

/// Last `/`-separated segment of a URL
pub fn trailing_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Items grouped by category, in configured category order
///
/// Buckets for configured categories exist from the start, even if they stay empty.
/// Categories outside the configured list are appended in first-seen order. The
/// `"Unknown"` bucket is removed by [`CategoryResults::finish`] when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryResults {
    buckets: Vec<(String, Vec<Item>)>,
}

impl CategoryResults {
    /// Creates one empty bucket per configured category
    pub fn new(categories: &[String]) -> Self {
        let mut results = Self::default();
        for category in categories {
            if results.position(category).is_none() {
                results.buckets.push((category.clone(), Vec::new()));
            }
        }
        results
    }

    /// Routes an item into its category's bucket
    pub fn push(&mut self, item: Item) {
        match self.position(&item.category) {
            Some(idx) => self.buckets[idx].1.push(item),
            None => {
                tracing::debug!("Adding bucket for unlisted category '{}'", item.category);
                self.buckets.push((item.category.clone(), vec![item]));
            }
        }
    }

    /// Drops the `"Unknown"` bucket if nothing landed in it
    pub fn finish(mut self) -> Self {
        self.buckets
            .retain(|(category, items)| category != UNKNOWN || !items.is_empty());
        self
    }

    pub fn get(&self, category: &str) -> Option<&[Item]> {
        self.position(category).map(|idx| self.buckets[idx].1.as_slice())
    }

    /// Category names in output order
    pub fn categories(&self) -> Vec<&str> {
        self.buckets.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Item])> {
        self.buckets
            .iter()
            .map(|(c, items)| (c.as_str(), items.as_slice()))
    }

    pub fn total_items(&self) -> usize {
        self.buckets.iter().map(|(_, items)| items.len()).sum()
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.buckets.iter().position(|(c, _)| c == category)
    }
}

impl Serialize for CategoryResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (category, items) in &self.buckets {
            map.serialize_entry(category, items)?;
        }
        map.end()
    }
}
