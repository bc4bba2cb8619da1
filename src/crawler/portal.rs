//! Shared request context for talking to the portal

use crate::config::Config;
use crate::crawler::fetcher::{build_headers, build_http_client, fetch_with_retries, FetchedPage};
use crate::crawler::RetryPolicy;
use crate::TenderError;
use reqwest::header::HeaderMap;
use reqwest::Client;

/// Everything needed to issue portal requests
///
/// Link collection and date extraction are implemented on this type in
/// their own modules.
#[derive(Debug, Clone)]
pub struct Portal {
    client: Client,
    headers: HeaderMap,
    policy: RetryPolicy,
    base_url: String,
    publish_date_field: String,
}

impl Portal {
    /// Creates a portal context from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Portal)` - Ready to issue requests
    /// * `Err(TenderError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, TenderError> {
        let client = build_http_client()?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a portal context around an existing client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            headers: build_headers(&config.http),
            policy: RetryPolicy::from(&config.http),
            base_url: config.portal.base_url.trim_end_matches('/').to_string(),
            publish_date_field: config.portal.publish_date_field.clone(),
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Name of the XML field holding the publication date
    pub fn publish_date_field(&self) -> &str {
        &self.publish_date_field
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a URL with this portal's headers and retry policy
    pub async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        fetch_with_retries(&self.client, url, &self.headers, &self.policy).await
    }
}
