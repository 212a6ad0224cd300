//! Text normalization shared by every detector
//!
//! Normalization strips accents (compatibility decomposition, then dropping anything
//! outside printable ASCII), collapses whitespace runs to single spaces, and lowercases.

use unicode_normalization::UnicodeNormalization;

/// Normalizes a string for keyword and label matching
///
/// # Example
///
/// ```
/// use unique_ledger::classify::normalize_text;
///
/// assert_eq!(normalize_text("  Épée\n\tOf   the Sardaukar "), "epee of the sardaukar");
/// ```
pub fn normalize_text(text: &str) -> String {
    let printable: String = text.nfkd().filter(|c| is_printable(*c)).collect();

    printable
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns true if any keyword occurs as a substring of `normalized`
///
/// `normalized` must already be the output of [`normalize_text`]; keywords are
/// lowercase ASCII literals.
pub fn keyword_in_text(normalized: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| normalized.contains(k))
}

/// Printable ASCII plus the ASCII whitespace set
fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
