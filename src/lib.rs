//! Tender-Dates: publication dates for public procurement notices
//!
//! This crate walks the search results of the government procurement portal,
//! derives the printable-form link of every tender found, and pulls the
//! publication date out of each tender's XML form.

pub mod config;
pub mod crawler;
pub mod xml;

use thiserror::Error;

/// Main error type for Tender-Dates operations
#[derive(Debug, Error)]
pub enum TenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("XML error for {url}: {source}")]
    Xml { url: String, source: xml::XmlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Tender-Dates operations
pub type Result<T> = std::result::Result<T, TenderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;


// Re-export commonly used types
pub use config::Config;
pub use crawler::{RunSummary, TenderLink, TenderRecord};
pub use xml::XmlNode;
