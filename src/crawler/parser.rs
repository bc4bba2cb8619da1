//! HTML parser for search results pages
//!
//! This module extracts tender registration numbers from the portal's
//! extended search results markup.

use scraper::{Html, Selector};

/// Block holding a tender's registration number on the results page
pub const REGISTRY_NUMBER_SELECTOR: &str = "div.registry-entry__header-mid__number";

/// Marker the portal prints in front of registration numbers
pub const REGISTRATION_MARKER: char = '№';

/// Extracts registration numbers from a search results page
///
/// Each registry number block contributes the text of its first link.
/// Blocks without a link, or whose link text is empty once cleaned, are
/// skipped. Numbers are returned in document order, duplicates included.
///
/// # Example
///
/// ```
/// use tender_dates::crawler::parse_registration_numbers;
///
/// let html = r#"<div class="registry-entry__header-mid__number"><a href="/x">№ 0123</a></div>"#;
/// assert_eq!(parse_registration_numbers(html), vec!["0123".to_string()]);
/// ```
pub fn parse_registration_numbers(html: &str) -> Vec<String> {
    let (Ok(block_selector), Ok(link_selector)) =
        (Selector::parse(REGISTRY_NUMBER_SELECTOR), Selector::parse("a"))
    else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&block_selector)
        .filter_map(|block| block.select(&link_selector).next())
        .filter_map(|link| clean_registration_number(&link.text().collect::<String>()))
        .collect()
}

/// Strips whitespace and the `№` marker from link text
///
/// Returns `None` when nothing is left.
pub fn clean_registration_number(text: &str) -> Option<String> {
    let number = text.trim().replace(REGISTRATION_MARKER, "");
    let number = number.trim();

    if number.is_empty() {
        None
    } else {
        Some(number.to_string())
    }
}
