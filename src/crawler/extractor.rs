//! Publication date extraction from printable form XML

use crate::crawler::links::TenderLink;
use crate::crawler::portal::Portal;
use crate::xml::{parse_xml, XmlNode};
use crate::TenderError;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// A tender link paired with its publication date, when one was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderRecord {
    pub link: TenderLink,
    pub publish_date: Option<String>,
}

impl TenderRecord {
    pub fn new(link: TenderLink, publish_date: Option<String>) -> Self {
        Self { link, publish_date }
    }

    /// Publication date as a timestamp, if the text is RFC 3339
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.publish_date
            .as_deref()
            .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
    }
}

impl fmt::Display for TenderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.publish_date {
            Some(date) => write!(f, "{} - {}", self.link, date),
            None => write!(f, "{} - None", self.link),
        }
    }
}

/// Finds the text of the first `field` entry in a parsed XML tree
///
/// Returns `None` when the field is missing or carries no text.
pub fn find_field_text(tree: &XmlNode, field: &str) -> Option<String> {
    tree.find_first(field)
        .and_then(XmlNode::text)
        .map(str::to_string)
}

/// Parses an XML document and extracts the text of `field`
pub fn extract_field(xml: &str, field: &str) -> Result<Option<String>, crate::xml::XmlError> {
    let tree = parse_xml(xml)?;
    Ok(find_field_text(&tree, field))
}

impl Portal {
    /// Fetches a tender's XML printable form and reads its publication date
    ///
    /// Fetch and parse failures are logged and give a record without a date;
    /// this never fails the caller.
    pub async fn extract_publish_date(&self, link: &TenderLink) -> TenderRecord {
        let xml_url = link.xml_url();

        let Some(page) = self.fetch(&xml_url).await else {
            tracing::error!(
                "Failed to fetch XML form {} after {} attempts",
                xml_url,
                self.policy().max_attempts
            );
            return TenderRecord::new(link.clone(), None);
        };

        tracing::debug!("Parsing XML form {}", page.url);

        match extract_field(&page.body, self.publish_date_field()) {
            Ok(publish_date) => {
                if publish_date.is_none() {
                    tracing::debug!(
                        "No {} field in {}",
                        self.publish_date_field(),
                        xml_url
                    );
                }
                TenderRecord::new(link.clone(), publish_date)
            }
            Err(source) => {
                let error = TenderError::Xml {
                    url: xml_url,
                    source,
                };
                tracing::error!("{}", error);
                TenderRecord::new(link.clone(), None)
            }
        }
    }
}
