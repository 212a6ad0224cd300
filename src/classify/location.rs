//! Location detection from content paragraphs

use crate::classify::normalize::normalize_text;
use regex::Regex;

const TESTING_STATION_PATTERN: &str = r"Imperial Testing Station No\.\s*\d+";

/// Finds an item's location in the page's content paragraphs
#[derive(Debug, Clone)]
pub struct LocationMatcher {
    station: Regex,
    /// (configured name, lowercased name)
    locations: Vec<(String, String)>,
}

impl LocationMatcher {
    pub fn new(locations: &[String]) -> Result<Self, regex::Error> {
        Ok(Self {
            station: Regex::new(TESTING_STATION_PATTERN)?,
            locations: locations
                .iter()
                .map(|loc| (loc.clone(), loc.to_lowercase()))
                .collect(),
        })
    }

    /// Returns the first location found, scanning paragraphs in order
    ///
    /// Within a paragraph a testing-station reference wins over configured names and
    /// is returned verbatim. Returns an empty string when nothing matches.
    pub fn find<S: AsRef<str>>(&self, paragraphs: &[S]) -> String {
        for (index, paragraph) in paragraphs.iter().enumerate() {
            let raw = paragraph.as_ref();

            if let Some(station) = self.station.find(raw) {
                tracing::debug!(location = station.as_str(), paragraph = index, "testing station detected");
                return station.as_str().to_string();
            }

            let normalized = normalize_text(raw);
            if let Some((name, _)) = self
                .locations
                .iter()
                .find(|(_, lowered)| normalized.contains(lowered.as_str()))
            {
                tracing::debug!(location = %name, paragraph = index, "location detected");
                return name.clone();
            }
        }

        tracing::debug!("No location detected");
        String::new()
    }
}
