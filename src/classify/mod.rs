//! Classification engine
//!
//! Derives an item's type taxonomy, category and location from a parsed page:
//! - `document`: page queries and infobox extraction
//! - `normalize`: the shared text normalization primitive
//! - `detectors`: ordered main-type rules and the subtype dispatch table
//! - `category` / `location`: link-title and paragraph scans
//!
//! Classification never fails; anything undetected degrades to a fallback value.

mod category;
mod detectors;
mod document;
mod location;
mod normalize;
mod types;

pub use category::CategoryMatcher;
pub use detectors::{detect_main_type, detect_subtypes, SubtypeDetector};
pub use document::{InfoboxTable, ParsedDocument};
pub use location::LocationMatcher;
pub use normalize::{keyword_in_text, normalize_text};
pub use types::{
    ArmorKind, Classification, MainType, Subtype, ToolKind, VehicleKind, WeaponKind, UNKNOWN,
};

/// Classifies parsed item pages
///
/// Built once per run from the configured category and location lists, then shared
/// read-only by every item task.
#[derive(Debug, Clone)]
pub struct Classifier {
    categories: CategoryMatcher,
    locations: LocationMatcher,
}

impl Classifier {
    /// Creates a classifier for the given category and location lists
    ///
    /// # Errors
    ///
    /// Returns an error if a category pattern fails to compile.
    pub fn new(categories: &[String], locations: &[String]) -> Result<Self, regex::Error> {
        Ok(Self {
            categories: CategoryMatcher::new(categories)?,
            locations: LocationMatcher::new(locations)?,
        })
    }

    /// Classifies one document
    pub fn classify(&self, doc: &ParsedDocument) -> Classification {
        let text = doc.normalized_text();
        let infobox = doc.infobox();
        if infobox.is_empty() {
            tracing::debug!("Page has no infobox; relying on text keywords");
        } else {
            tracing::trace!("Infobox has {} rows", infobox.len());
        }

        let (main_type, subtypes) = match detect_main_type(&infobox, &text) {
            Some(main) => (Some(main), detect_subtypes(main, &infobox, &text)),
            None => {
                tracing::debug!("Main type not detected; marking as Unknown");
                (None, Vec::new())
            }
        };

        let category = self.categories.find(doc.link_titles());
        let location = self.locations.find(&doc.content_paragraphs());

        Classification {
            main_type,
            subtypes,
            category,
            location,
        }
    }
}
