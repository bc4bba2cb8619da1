//! Tagged tree type and key search

/// Key under which element text is stored when the element also has
/// attributes or children
pub const TEXT_KEY: &str = "#text";

/// Prefix applied to attribute names
pub const ATTRIBUTE_PREFIX: char = '@';

/// A node of the nested response tree
///
/// Mapping entries keep document order. Keys are unique within one mapping:
/// repeated sibling elements are gathered into a single `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Ordered key-to-value entries
    Mapping(Vec<(String, XmlNode)>),
    /// Repeated values in document order
    Sequence(Vec<XmlNode>),
    /// Text content
    Scalar(String),
    /// An element with no attributes, children or text
    Empty,
}

impl XmlNode {
    /// Returns the value stored under `key` in this mapping, if any
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self {
            XmlNode::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Depth-first, pre-order search for the first entry named `key`
    ///
    /// Within a mapping, an entry's key is tested before its value is
    /// descended into, and entries are visited in document order. Sequence
    /// items are visited in order. Scalars and empty nodes never match.
    ///
    /// A matching entry whose value is `Empty` ends the search of its own
    /// mapping without a result; enclosing mappings and sequences carry on
    /// with their next entries.
    ///
    /// # Example
    ///
    /// ```
    /// use tender_dates::xml::XmlNode;
    ///
    /// let tree = XmlNode::Mapping(vec![(
    ///     "a".to_string(),
    ///     XmlNode::Mapping(vec![("date".to_string(), XmlNode::Scalar("2024-01-01".to_string()))]),
    /// )]);
    /// assert_eq!(tree.find_first("date").and_then(XmlNode::text), Some("2024-01-01"));
    /// ```
    pub fn find_first(&self, key: &str) -> Option<&XmlNode> {
        match self {
            XmlNode::Mapping(entries) => {
                for (k, v) in entries {
                    if k == key {
                        return match v {
                            XmlNode::Empty => None,
                            _ => Some(v),
                        };
                    }
                    if let Some(found) = v.find_first(key) {
                        return Some(found);
                    }
                }
                None
            }
            XmlNode::Sequence(items) => items.iter().find_map(|item| item.find_first(key)),
            XmlNode::Scalar(_) | XmlNode::Empty => None,
        }
    }

    /// Text carried by this node
    ///
    /// Scalars yield their text, mappings their `#text` entry, and sequences
    /// the text of their first item.
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlNode::Scalar(text) => Some(text),
            XmlNode::Mapping(_) => self.get(TEXT_KEY).and_then(XmlNode::text),
            XmlNode::Sequence(items) => items.first().and_then(XmlNode::text),
            XmlNode::Empty => None,
        }
    }

    /// Appends a child entry, merging repeated keys into a sequence at the
    /// position of the first occurrence
    pub(crate) fn push_entry(entries: &mut Vec<(String, XmlNode)>, key: String, value: XmlNode) {
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, XmlNode::Sequence(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, XmlNode::Empty);
                *existing = XmlNode::Sequence(vec![first, value]);
            }
            None => entries.push((key, value)),
        }
    }
}
