//! Tender links and the link collector
//!
//! Tender links point at a tender's printable form. The HTML and XML
//! variants of the form live at parallel URLs that differ only in the
//! view segment of the path.

use crate::crawler::parser::parse_registration_numbers;
use crate::crawler::portal::Portal;
use std::fmt;

/// Path of the extended search results page
pub const SEARCH_RESULTS_PATH: &str = "/epz/order/extendedsearch/results.html";

/// Path of the HTML printable form
pub const PRINT_FORM_PATH: &str = "/epz/order/notice/printForm/view.html";

/// View segment of the HTML printable form
pub const HTML_VIEW_SEGMENT: &str = "/view.html";

/// View segment of the XML printable form
pub const XML_VIEW_SEGMENT: &str = "/viewXml.html";

/// Builds the URL of one search results page
///
/// # Example
///
/// ```
/// use tender_dates::crawler::search_results_url;
///
/// assert_eq!(
///     search_results_url("https://zakupki.gov.ru", 2),
///     "https://zakupki.gov.ru/epz/order/extendedsearch/results.html?fz44=on&pageNumber=2"
/// );
/// ```
pub fn search_results_url(base_url: &str, page_number: u32) -> String {
    format!(
        "{}{}?fz44=on&pageNumber={}",
        base_url.trim_end_matches('/'),
        SEARCH_RESULTS_PATH,
        page_number
    )
}

/// URL of a tender's HTML printable form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenderLink(String);

impl TenderLink {
    /// Builds the printable form link for a registration number
    ///
    /// The number is trimmed; an empty number yields `None`.
    pub fn for_registration_number(base_url: &str, registration_number: &str) -> Option<Self> {
        let number = registration_number.trim();
        if number.is_empty() {
            return None;
        }

        Some(Self(format!(
            "{}{}?regNumber={}",
            base_url.trim_end_matches('/'),
            PRINT_FORM_PATH,
            number
        )))
    }

    /// Wraps an already built printable form URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of the XML variant of this printable form
    pub fn xml_url(&self) -> String {
        to_xml_url(&self.0)
    }
}

impl fmt::Display for TenderLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenderLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Swaps the HTML view segment for the XML one
pub fn to_xml_url(html_url: &str) -> String {
    html_url.replace(HTML_VIEW_SEGMENT, XML_VIEW_SEGMENT)
}

/// Swaps the XML view segment back for the HTML one
pub fn to_html_url(xml_url: &str) -> String {
    xml_url.replace(XML_VIEW_SEGMENT, HTML_VIEW_SEGMENT)
}

impl Portal {
    /// Collects the printable form links listed on one search results page
    ///
    /// A page that cannot be fetched is logged and contributes no links.
    /// Links keep the page's order; repeated tenders give repeated links.
    pub async fn collect_links(&self, page_number: u32) -> Vec<TenderLink> {
        let url = search_results_url(self.base_url(), page_number);
        tracing::debug!("Fetching search results page {}: {}", page_number, url);

        let Some(page) = self.fetch(&url).await else {
            tracing::error!(
                "Failed to fetch search results page {} after {} attempts",
                page_number,
                self.policy().max_attempts
            );
            return Vec::new();
        };

        tracing::debug!("Parsing search results page {} from {}", page_number, page.url);

        let links: Vec<TenderLink> = parse_registration_numbers(&page.body)
            .iter()
            .filter_map(|number| TenderLink::for_registration_number(self.base_url(), number))
            .collect();

        tracing::debug!("Page {} listed {} tenders", page_number, links.len());
        links
    }
}
