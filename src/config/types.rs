use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Tender-Dates
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the portal's fixed defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Procurement portal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Scheme and host of the portal, without a trailing path
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// First search results page to collect (inclusive)
    #[serde(rename = "first-page")]
    pub first_page: u32,

    /// Last search results page to collect (inclusive)
    #[serde(rename = "last-page")]
    pub last_page: u32,

    /// XML field holding the publication date
    #[serde(rename = "publish-date-field")]
    pub publish_date_field: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://zakupki.gov.ru".to_string(),
            first_page: 1,
            last_page: 2,
            publish_date_field: "publishDTInEIS".to_string(),
        }
    }
}

/// HTTP request and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Number of attempts before a URL is given up on
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Pause between two attempts on the same URL (seconds)
    #[serde(rename = "retry-delay-secs")]
    pub retry_delay_secs: u64,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout_secs: 10,
            max_attempts: 3,
            retry_delay_secs: 2,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Drop repeated tender links before extraction
    #[serde(rename = "dedupe-links")]
    pub dedupe_links: bool,
}
