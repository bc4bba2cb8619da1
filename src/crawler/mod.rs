//! Crawler module for the procurement portal
//!
//! This module contains the retrieval pipeline, including:
//! - HTTP fetching with retry logic
//! - Search results parsing and tender link construction
//! - Publication date extraction from XML printable forms
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod links;
mod parser;
mod portal;

pub use coordinator::{run_pipeline, Coordinator, RunSummary};
pub use extractor::{extract_field, find_field_text, TenderRecord};
pub use fetcher::{
    build_headers, build_http_client, fetch_once, fetch_with_retries, FetchedPage, RetryPolicy,
};
pub use links::{search_results_url, to_html_url, to_xml_url, TenderLink};
pub use parser::{clean_registration_number, parse_registration_numbers};
pub use portal::Portal;

use crate::config::Config;
use crate::TenderError;

/// Runs a complete retrieval pass
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and request headers
/// 2. Collect tender links from every configured results page
/// 3. Extract the publication date of every collected link
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed; individual failures are logged
/// * `Err(TenderError)` - The run could not start
pub async fn crawl(config: Config) -> Result<RunSummary, TenderError> {
    run_pipeline(config).await
}
