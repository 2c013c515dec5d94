//! Flashscore basketball scraping: match list, summary, per-quarter stats.

pub mod parse;
mod scraper;
mod types;

pub use scraper::MatchScraper;
pub use types::{
    MatchRecord, MatchRef, QuarterScore, QuarterScores, QuarterStats, TeamStats, NOT_AVAILABLE,
};
