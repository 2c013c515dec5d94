use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::flashscore::{MatchRecord, MatchScraper};
use crate::output::{default_output_name, export_to_json, league_name_from_url};
use crate::traits::Scraper;

/// Scraping request
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub league_url: String,
    pub output_path: PathBuf,
    /// Output base name without extension; generated from the URL when unset.
    pub output_name: Option<String>,
    pub last: Option<usize>,
    pub headless: bool,
}

impl ScrapeRequest {
    pub fn new(league_url: impl Into<String>) -> Self {
        Self {
            league_url: league_url.into(),
            output_path: PathBuf::from("output"),
            output_name: None,
            last: None,
            headless: true,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn with_last(mut self, last: usize) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<ScrapeRequest> for ScraperConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScraperConfig::new(req.league_url)
            .with_output_path(req.output_path)
            .with_last(req.last)
            .with_headless(req.headless)
    }
}

/// Scraping result
#[derive(Debug)]
pub struct ScrapeResult {
    pub records: Vec<MatchRecord>,
    pub json_path: PathBuf,
}

/// tower::Service wrapper around [`MatchScraper`] for embedding.
#[derive(Debug, Clone, Default)]
pub struct ScrapeService {
    // room for rate limiting, caching etc.
}

impl ScrapeService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScrapeService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("Scrape request received: url={}", req.league_url);

        Box::pin(async move {
            let league_name = league_name_from_url(&req.league_url);
            let output_name = req
                .output_name
                .clone()
                .unwrap_or_else(|| default_output_name(&league_name));
            let output_path = req.output_path.clone();

            let config: ScraperConfig = req.into();
            let mut scraper = MatchScraper::new(config);
            let records = scraper.execute().await?;

            let json_path = export_to_json(&records, &output_path, &output_name)?;

            info!(
                "Scrape complete: {} records, path={:?}",
                records.len(),
                json_path
            );

            Ok(ScrapeResult { records, json_path })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_request_builder() {
        let req = ScrapeRequest::new("https://www.flashscore.com/basketball/usa/nba")
            .with_output_path("/tmp/out")
            .with_output_name("nba_dump")
            .with_last(10)
            .with_headless(false);

        assert_eq!(req.league_url, "https://www.flashscore.com/basketball/usa/nba");
        assert_eq!(req.output_path, PathBuf::from("/tmp/out"));
        assert_eq!(req.output_name.as_deref(), Some("nba_dump"));
        assert_eq!(req.last, Some(10));
        assert!(!req.headless);
    }

    #[test]
    fn test_scrape_request_to_config() {
        let req = ScrapeRequest::new("https://www.flashscore.com/basketball/spain/acb")
            .with_last(5);
        let config: ScraperConfig = req.into();

        assert_eq!(
            config.league_url,
            "https://www.flashscore.com/basketball/spain/acb"
        );
        assert_eq!(config.last, Some(5));
        assert!(config.headless);
    }
}
