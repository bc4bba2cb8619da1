//! Nested response tree for XML documents
//!
//! An XML document is converted into an [`XmlNode`] tree of ordered
//! mappings, sequences and scalars, then searched by key.

mod builder;
mod tree;

pub use builder::parse_xml;
pub use tree::XmlNode;

use thiserror::Error;

/// Errors raised while turning an XML document into a tree
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Closing tag </{0}> has no matching opening tag")]
    UnexpectedEnd(String),

    #[error("Content found after the root element")]
    TrailingContent,
}
