//! Configuration module for Tender-Dates
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error at this level: callers use `Config::default()`,
//! which carries the portal's fixed settings.
//!
//! # Example
//!
//! ```no_run
//! use tender_dates::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tenders.toml")).unwrap();
//! println!("Collecting pages {}..={}", config.portal.first_page, config.portal.last_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, PortalConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
