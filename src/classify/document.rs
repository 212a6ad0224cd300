//! Parsed page documents and infobox extraction
//!
//! A `ParsedDocument` wraps one fetched page. It exposes the handful of structural
//! queries the classifier and coordinator need; nothing outside this module touches
//! CSS selectors.

use crate::classify::normalize::normalize_text;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// An immutable, queryable tree over one page's markup
#[derive(Debug)]
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parses page markup
    ///
    /// HTML parsing is error-tolerant; emptiness is checked by the fetcher before
    /// markup reaches this point.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// All text nodes of the document joined with single spaces
    pub fn full_text(&self) -> String {
        self.html.root_element().text().collect::<Vec<_>>().join(" ")
    }

    /// Normalized full text, used by the keyword fallbacks
    pub fn normalized_text(&self) -> String {
        normalize_text(&self.full_text())
    }

    /// Extracts the label/value infobox table
    ///
    /// A row contributes when it has a direct `th` child carrying the `infobox-label`
    /// class. Both label and value are normalized; rows where either side is empty are
    /// skipped. Later rows overwrite earlier ones with the same label.
    pub fn infobox(&self) -> InfoboxTable {
        let mut table = InfoboxTable::default();

        for row in self.select_all("tr") {
            let cells: Vec<ElementRef<'_>> = row.children().filter_map(ElementRef::wrap).collect();

            let is_labelled = cells.iter().any(|cell| {
                cell.value().name() == "th"
                    && cell
                        .value()
                        .attr("class")
                        .is_some_and(|c| c.contains("infobox-label"))
            });
            if !is_labelled {
                continue;
            }

            let label = normalize_text(&cells_text(&cells, "th"));
            let value = normalize_text(&cells_text(&cells, "td"));
            if !label.is_empty() && !value.is_empty() {
                table.insert(label, value);
            }
        }

        table
    }

    /// `title` attributes of every hyperlink, in document order
    pub fn link_titles(&self) -> Vec<&str> {
        self.select_all("a[title]")
            .into_iter()
            .filter_map(|a| a.value().attr("title"))
            .collect()
    }

    /// Raw text of each content paragraph, in document order
    pub fn content_paragraphs(&self) -> Vec<String> {
        self.select_all("div#mw-content-text p")
            .into_iter()
            .map(|p| p.text().collect::<Vec<_>>().join(" "))
            .collect()
    }

    /// The page's display title, if present
    pub fn page_title(&self) -> Option<String> {
        self.select_all("span.mw-page-title-main")
            .into_iter()
            .next()
            .map(|span| span.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// The `src` of the infobox preview image, if present
    pub fn infobox_image_src(&self) -> Option<String> {
        self.select_all(r#"td[class*="infobox-image"] img[class*="mw-file-element"]"#)
            .into_iter()
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// `href` values of the links inside the index page's category tree sections
    pub fn category_tree_hrefs(&self) -> Vec<String> {
        self.select_all("div.CategoryTreeSection a[href]")
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::warn!("Invalid selector '{}': {:?}", css, e);
                Vec::new()
            }
        }
    }
}

/// Concatenated text of the direct children with the given tag name
fn cells_text(cells: &[ElementRef<'_>], tag: &str) -> String {
    cells
        .iter()
        .filter(|cell| cell.value().name() == tag)
        .flat_map(|cell| cell.text())
        .collect()
}

/// Normalized infobox label → normalized value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoboxTable {
    entries: HashMap<String, String>,
}

impl InfoboxTable {
    /// Inserts a row; an existing label is overwritten
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Returns true if any of the labels is present
    pub fn contains_any(&self, labels: &[&str]) -> bool {
        labels.iter().any(|l| self.contains(l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for InfoboxTable {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (label, value) in iter {
            table.insert(label, value);
        }
        table
    }
}
