//! Category detection from hyperlink titles

use crate::classify::types::UNKNOWN;
use regex::{Regex, RegexBuilder};

/// Matches link titles against the configured category names
///
/// Each category compiles to a case-insensitive, word-bounded pattern once, when the
/// matcher is built.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    patterns: Vec<(String, Regex)>,
}

impl CategoryMatcher {
    pub fn new(categories: &[String]) -> Result<Self, regex::Error> {
        let patterns = categories
            .iter()
            .map(|cat| {
                let re = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(cat)))
                    .case_insensitive(true)
                    .build()?;
                Ok((cat.clone(), re))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { patterns })
    }

    /// Returns the category of the first title that names one
    ///
    /// Titles are scanned in document order; within one title the configured order
    /// breaks ties. Falls back to `"Unknown"`.
    pub fn find<'a, I>(&self, titles: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        for title in titles {
            if let Some((cat, _)) = self.patterns.iter().find(|(_, re)| re.is_match(title)) {
                tracing::debug!(category = %cat, title, "category detected");
                return cat.clone();
            }
        }

        tracing::debug!("No category link found");
        UNKNOWN.to_string()
    }
}
