//! Run coordinator - the collection and extraction loop
//!
//! A run has two strictly sequential phases:
//! - Collect the tender links of every configured search results page
//! - Extract the publication date of every collected link
//!
//! Every request (retries included) completes before the next one starts.
//! Results are printed to stdout as they are produced.

use crate::config::Config;
use crate::crawler::extractor::TenderRecord;
use crate::crawler::links::TenderLink;
use crate::crawler::portal::Portal;
use crate::TenderError;
use std::collections::HashSet;

/// Counters describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Search results pages visited
    pub pages: u32,
    /// Tender links passed to extraction
    pub links: usize,
    /// Records that came back with a publication date
    pub dated: usize,
}

/// Main run coordinator structure
pub struct Coordinator {
    config: Config,
    portal: Portal,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(TenderError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, TenderError> {
        let portal = Portal::new(&config)?;
        Ok(Self { config, portal })
    }

    /// Collects links from every page in the configured range
    ///
    /// Each page's links are printed under a `Page N:` heading. Links are
    /// concatenated in page order; duplicates across pages are kept unless
    /// `dedupe-links` is set.
    pub async fn collect_all_links(&self) -> (u32, Vec<TenderLink>) {
        let first = self.config.portal.first_page;
        let last = self.config.portal.last_page;
        let mut all_links = Vec::new();
        let mut pages = 0;

        for page_number in first..=last {
            let links = self.portal.collect_links(page_number).await;
            pages += 1;

            println!("Page {}:", page_number);
            for link in &links {
                println!("{}", link);
            }

            all_links.extend(links);
        }

        if self.config.output.dedupe_links {
            let before = all_links.len();
            all_links = dedupe_links(all_links);
            tracing::info!(
                "Dropped {} duplicate links",
                before - all_links.len()
            );
        }

        (pages, all_links)
    }

    /// Extracts the publication date for each link, in order
    ///
    /// Each record is printed as `<link> - <date>` once extracted.
    pub async fn extract_all(&self, links: &[TenderLink]) -> Vec<TenderRecord> {
        let mut records = Vec::with_capacity(links.len());

        for link in links {
            let record = self.portal.extract_publish_date(link).await;
            println!("{}", record);
            records.push(record);
        }

        records
    }

    /// Runs both phases and returns the run's counters
    ///
    /// Individual page or link failures only shrink the output; the run
    /// itself always completes.
    pub async fn run(&self) -> RunSummary {
        tracing::info!(
            "Collecting tender links from pages {}..={}",
            self.config.portal.first_page,
            self.config.portal.last_page
        );
        let (pages, links) = self.collect_all_links().await;

        tracing::info!("Extracting publication dates for {} links", links.len());
        let records = self.extract_all(&links).await;

        let summary = RunSummary {
            pages,
            links: links.len(),
            dated: records.iter().filter(|r| r.publish_date.is_some()).count(),
        };

        tracing::info!(
            "Run finished: {} pages, {} links, {} with a publication date",
            summary.pages,
            summary.links,
            summary.dated
        );

        summary
    }
}

/// Drops repeated links, keeping the first occurrence of each
fn dedupe_links(links: Vec<TenderLink>) -> Vec<TenderLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Runs a complete collection and extraction pass
pub async fn run_pipeline(config: Config) -> Result<RunSummary, TenderError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
