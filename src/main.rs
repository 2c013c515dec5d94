//! CLI entry point.
//!
//! ```text
//! hoopscrape --url https://www.flashscore.com/basketball/usa/nba [--output nba] [--last 20] [--no-headless]
//! ```

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hoopscrape::flashscore::parse::select_recent;
use hoopscrape::output::{create_backup, default_output_name, export_to_json, league_name_from_url};
use hoopscrape::progress::ProgressBar;
use hoopscrape::{MatchRecord, MatchScraper, Scraper, ScraperConfig};

#[derive(Parser)]
#[command(name = "hoopscrape", about = "Flashscore basketball match scraper")]
struct Opts {
    /// Flashscore basketball league URL (the season page)
    #[arg(long)]
    url: String,

    /// Output file base name, without extension; generated from the URL when omitted
    #[arg(long)]
    output: Option<String>,

    /// Scrape only the N most recent matches
    #[arg(long)]
    last: Option<usize>,

    /// Run the browser with a visible window
    #[arg(long)]
    no_headless: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let league_name = league_name_from_url(&opts.url);
    let output_name = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output_name(&league_name));

    let config = ScraperConfig::new(&opts.url)
        .with_last(opts.last)
        .with_headless(!opts.no_headless);
    let output_dir = config.output_path.clone();
    let backup_dir = config.backup_path.clone();

    let mut scraper = MatchScraper::new(config);
    scraper.initialize().await?;

    let matches = select_recent(scraper.list_matches().await?, opts.last);
    let total = matches.len();
    info!("Scraping {} matches", total);

    // Every attempt is streamed back (skips included, so the progress bar
    // advances per match), and an interrupt still leaves us with everything
    // scraped so far.
    let (tx, mut rx) = mpsc::channel::<(String, Option<MatchRecord>)>(16);
    let worker = tokio::spawn(async move {
        for match_ref in &matches {
            let result = match scraper.scrape_match(match_ref).await {
                Err(e) if e.is_retryable() => {
                    warn!("Match {} failed ({}), retrying once", match_ref.id, e);
                    scraper.scrape_match(match_ref).await
                }
                other => other,
            };

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping match {}: {}", match_ref.id, e);
                    None
                }
            };
            if tx.send((match_ref.id.clone(), record)).await.is_err() {
                break;
            }
        }
        let _ = scraper.close().await;
    });

    let mut records = Vec::new();
    let mut progress = ProgressBar::new(total);
    let mut interrupted = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, writing partial results");
                interrupted = true;
                break;
            }
            received = rx.recv() => match received {
                Some((match_id, record)) => {
                    progress.tick(&format!("match {}", match_id));
                    if let Some(record) = record {
                        records.push(record);
                    }
                }
                None => break,
            }
        }
    }
    progress.finish();

    if interrupted {
        worker.abort();
    } else if let Err(e) = worker.await {
        warn!("Scrape task ended abnormally: {}", e);
    }

    if records.is_empty() {
        info!("No new data scraped");
        return Ok(());
    }

    let json_path = output_dir.join(format!("{}.json", output_name));
    create_backup(&json_path, &league_name, &backup_dir);
    export_to_json(&records, &output_dir, &output_name)?;

    info!("=== Scrape completed ===");
    Ok(())
}
