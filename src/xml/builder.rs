//! XML text to [`XmlNode`] conversion
//!
//! The conversion follows the usual dictionary mapping of XML:
//! - the document is a mapping with one entry, the root element
//! - attributes become `@name` entries, listed before child elements
//! - an element with only text becomes a scalar
//! - text next to attributes or children is kept under `#text`
//! - repeated sibling elements are gathered into a sequence
//! - an element with nothing inside becomes `Empty`
//!
//! Text and CDATA pieces of an element are joined as read, then trimmed
//! once; whitespace-only text is dropped.

use crate::xml::tree::{XmlNode, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::xml::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An element whose closing tag has not been read yet
struct OpenElement {
    name: String,
    entries: Vec<(String, XmlNode)>,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut entries = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = format!(
                "{}{}",
                ATTRIBUTE_PREFIX,
                String::from_utf8_lossy(attribute.key.as_ref())
            );
            let value = attribute.unescape_value()?.into_owned();
            XmlNode::push_entry(&mut entries, key, XmlNode::Scalar(value));
        }

        Ok(Self {
            name,
            entries,
            text: String::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn finish(self) -> (String, XmlNode) {
        let Self {
            name,
            mut entries,
            text,
        } = self;
        let text = text.trim().to_string();

        let node = if entries.is_empty() {
            if text.is_empty() {
                XmlNode::Empty
            } else {
                XmlNode::Scalar(text)
            }
        } else {
            if !text.is_empty() {
                entries.push((TEXT_KEY.to_string(), XmlNode::Scalar(text)));
            }
            XmlNode::Mapping(entries)
        };

        (name, node)
    }
}

/// Tree under construction: the stack of open elements and the finished root
#[derive(Default)]
struct TreeBuilder {
    open: Vec<OpenElement>,
    root: Option<(String, XmlNode)>,
}

impl TreeBuilder {
    fn open(&mut self, element: OpenElement) -> Result<(), XmlError> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(XmlError::TrailingContent);
        }
        self.open.push(element);
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), XmlError> {
        let element = self
            .open
            .pop()
            .ok_or_else(|| XmlError::UnexpectedEnd(name.to_string()))?;
        let (name, node) = element.finish();

        match self.open.last_mut() {
            Some(parent) => XmlNode::push_entry(&mut parent.entries, name, node),
            None => self.root = Some((name, node)),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), XmlError> {
        match self.open.last_mut() {
            Some(element) => element.push_text(text),
            None if text.trim().is_empty() => {}
            None if self.root.is_some() => return Err(XmlError::TrailingContent),
            None => return Err(XmlError::EmptyDocument),
        }
        Ok(())
    }

    fn finish(self) -> Result<XmlNode, XmlError> {
        if let Some(element) = self.open.last() {
            return Err(XmlError::Unclosed(element.name.clone()));
        }
        let (name, node) = self.root.ok_or(XmlError::EmptyDocument)?;
        Ok(XmlNode::Mapping(vec![(name, node)]))
    }
}

/// Parses an XML document into a nested response tree
///
/// # Arguments
///
/// * `xml` - The XML document text
///
/// # Returns
///
/// * `Ok(XmlNode)` - A mapping with a single entry for the root element
/// * `Err(XmlError)` - The document is not well-formed
///
/// # Example
///
/// ```
/// use tender_dates::xml::{parse_xml, XmlNode};
///
/// let tree = parse_xml("<notice><publishDTInEIS>2024-01-01</publishDTInEIS></notice>").unwrap();
/// assert_eq!(
///     tree.find_first("publishDTInEIS").and_then(XmlNode::text),
///     Some("2024-01-01")
/// );
/// ```
pub fn parse_xml(xml: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(xml);

    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(start) => builder.open(OpenElement::from_start(&start)?)?,
            Event::Empty(start) => {
                let element = OpenElement::from_start(&start)?;
                let name = element.name.clone();
                builder.open(element)?;
                builder.close(&name)?;
            }
            Event::End(end) => builder.close(&String::from_utf8_lossy(end.name().as_ref()))?,
            Event::Text(text) => builder.text(&text.unescape()?)?,
            Event::CData(data) => builder.text(&String::from_utf8_lossy(&data.into_inner()))?,
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no data
            _ => {}
        }
    }

    builder.finish()
}
