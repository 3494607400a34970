use crate::scrapers::types::ScrapeOutcome;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing scrapers.
/// This allows easy addition of new sources (Unstop, MLH, etc) in the future.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fetch the source and extract listings from it.
    async fn scrape(&self) -> Result<ScrapeOutcome>;

    /// Get the name of the scraper source.
    fn source_name(&self) -> &'static str;
}
