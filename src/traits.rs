use async_trait::async_trait;

use crate::error::ScraperError;
use crate::flashscore::MatchRecord;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Launch the browser.
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// Scrape all configured matches.
    async fn collect(&mut self) -> Result<Vec<MatchRecord>, ScraperError>;

    /// Release browser resources.
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// One-shot run (initialize → collect → close).
    async fn execute(&mut self) -> Result<Vec<MatchRecord>, ScraperError> {
        self.initialize().await?;
        let records = self.collect().await?;
        self.close().await?;
        Ok(records)
    }
}
