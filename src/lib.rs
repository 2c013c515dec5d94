//! Flashscore basketball scraper library
//!
//! - Lists the matches of a league results page with their stage labels
//! - Extracts per-match scores and per-quarter statistics
//! - Serializes match records to a JSON file
//!
//! # Usage
//!
//! ```rust,ignore
//! use hoopscrape::{ScrapeRequest, ScrapeService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScrapeService::new();
//!
//!     let request = ScrapeRequest::new("https://www.flashscore.com/basketball/usa/nba")
//!         .with_last(20)
//!         .with_headless(true);
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("JSON written: {:?}", result.json_path);
//! }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod flashscore;
pub mod output;
pub mod progress;
pub mod service;
pub mod traits;

pub use config::ScraperConfig;
pub use error::ScraperError;
pub use flashscore::{MatchRecord, MatchRef, MatchScraper, QuarterScore};
pub use service::{ScrapeRequest, ScrapeResult, ScrapeService};
pub use traits::Scraper;
