//! Flashscore basketball scraper.
//!
//! Drives one browser session over a league results page and the summary and
//! per-quarter statistics pages of each listed match.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use chrono::Local;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{
    debug_screenshot, eval_json, goto_and_settle, launch_browser, new_stealth_page,
    wait_for_load, wait_for_selector,
};
use crate::config::{ScraperConfig, BASE_URL, MAX_PERIODS, MAX_SHOW_MORE_CLICKS, TIMEOUT_FAST};
use crate::error::ScraperError;
use crate::traits::Scraper;

use super::parse::{
    field_or_na, fold_match_rows, parse_period_stats, parse_quarter_scores, select_recent,
    stats_by_team, totals_from_quarters, PeriodTab, RawQuarter, RawResultsRow, RawStatsPayload,
    RawSummary,
};
use super::types::{MatchRecord, MatchRef, QuarterStats, NOT_AVAILABLE};

/// Wait for the quarter-score strip and the statistics container; shorter
/// than [`TIMEOUT_FAST`] because both are optional on a loaded page.
const OPTIONAL_ELEMENT_WAIT: Duration = Duration::from_secs(5);
/// Wait for the match list container on the results page.
const MATCH_LIST_WAIT: Duration = Duration::from_secs(15);
/// Pause after each "show more matches" click so the list can grow.
const SHOW_MORE_DELAY: Duration = Duration::from_secs(2);

/// Serializes the `.event__match` / `.event__title` row sequence, tagging
/// each row so stage tracking can happen in Rust.
const RESULTS_ROWS_SCRIPT: &str = r#"
    (function() {
        var rows = document.querySelectorAll('.event__match, .event__title');
        var out = [];
        for (var i = 0; i < rows.length; i++) {
            var row = rows[i];
            if (row.className.indexOf('event__title') >= 0) {
                var strong = row.querySelector('div.event__titleBox strong');
                out.push({ kind: 'stage', stage: strong ? strong.textContent.trim() : null });
            } else {
                out.push({ kind: 'match', id: row.getAttribute('id') });
            }
        }
        return JSON.stringify(out);
    })()
"#;

/// Clicks the first visible "show more matches" link, trying the known
/// selector variants.
const SHOW_MORE_CLICK_SCRIPT: &str = r#"
    (function() {
        var selectors = ['a.event__more.event__more--static', 'a.wclButtonLink'];
        for (var i = 0; i < selectors.length; i++) {
            var link = document.querySelector(selectors[i]);
            if (link) {
                link.click();
                return true;
            }
        }
        return false;
    })()
"#;

/// Header fields of the match summary page.
const SUMMARY_SCRIPT: &str = r#"
    (function() {
        function text(sel) {
            var el = document.querySelector(sel);
            return el ? el.textContent.trim() : null;
        }
        return JSON.stringify({
            date: text('.duelParticipant__startTime'),
            home_team: text('.duelParticipant__home .participant__participantName'),
            away_team: text('.duelParticipant__away .participant__participantName'),
            home_score: text('.detailScore__wrapper .detailScore__home'),
            away_score: text('.detailScore__wrapper .detailScore__away')
        });
    })()
"#;

/// Per-quarter score columns, `null` once a column is absent.
const QUARTER_SCORES_SCRIPT: &str = r#"
    (function() {
        var container = document.querySelector('.smh__template.basketball');
        var out = [];
        for (var i = 1; i <= 5; i++) {
            if (!container) { out.push(null); break; }
            var home = container.querySelector('.smh__home.smh__part--' + i);
            var away = container.querySelector('.smh__away.smh__part--' + i);
            if (!home || !away) { out.push(null); break; }
            out.push({ home: home.textContent.trim(), away: away.textContent.trim() });
        }
        return JSON.stringify(out);
    })()
"#;

/// Selected period tab label plus every statistics row on the tab.
const PERIOD_STATS_SCRIPT: &str = r#"
    (function() {
        var tab = document.querySelector('button.wcl-tabSelected_T--kd');
        var rows = document.querySelectorAll("div[data-testid='wcl-statistics']");
        var out = [];
        for (var i = 0; i < rows.length; i++) {
            var category = rows[i].querySelector("[data-testid='wcl-statistics-category']");
            var strongs = rows[i].querySelectorAll("[data-testid='wcl-statistics-value'] > strong");
            var values = [];
            for (var j = 0; j < strongs.length; j++) {
                values.push(strongs[j].textContent.trim());
            }
            out.push({
                category: category ? category.textContent.trim() : null,
                values: values
            });
        }
        return JSON.stringify({ period: tab ? tab.textContent.trim() : null, rows: out });
    })()
"#;

pub struct MatchScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
}

impl MatchScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&Arc<Page>, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("browser not initialized".into()))
    }

    /// All matches on the league results page with their stage labels,
    /// newest first, after expanding the list as far as the site allows.
    pub async fn list_matches(&self) -> Result<Vec<MatchRef>, ScraperError> {
        let page = self.get_page()?.clone();
        let results_url = format!("{}/results", self.config.league_url.trim_end_matches('/'));
        info!("Fetching match list from {}", results_url);

        goto_and_settle(&page, &results_url, self.config.page_delay).await?;
        wait_for_load(&page, self.config.timeout).await;

        // Expand the paginated list
        for click in 0..MAX_SHOW_MORE_CLICKS {
            let clicked: bool = page
                .evaluate(SHOW_MORE_CLICK_SCRIPT)
                .await
                .map_err(|e| ScraperError::JavaScript(e.to_string()))?
                .into_value()
                .unwrap_or(false);

            if !clicked {
                debug!("No more \"show more matches\" link after {} clicks", click);
                break;
            }
            sleep(SHOW_MORE_DELAY).await;
        }

        if !wait_for_selector(&page, ".sportName.basketball", MATCH_LIST_WAIT).await {
            warn!("No basketball match list found on {}", results_url);
            if self.config.debug {
                debug_screenshot(&page, "results").await;
            }
            return Ok(Vec::new());
        }

        let rows: Vec<RawResultsRow> = eval_json(&page, RESULTS_ROWS_SCRIPT).await?;
        let matches = fold_match_rows(rows);
        info!("Found {} matches with stages", matches.len());
        Ok(matches)
    }

    /// Scrape one match. `Ok(None)` means the summary page never produced
    /// the expected elements and the match is skipped.
    pub async fn scrape_match(
        &self,
        match_ref: &MatchRef,
    ) -> Result<Option<MatchRecord>, ScraperError> {
        let page = self.get_page()?.clone();
        info!("Processing match {} ({})", match_ref.id, match_ref.stage);

        let summary_url = format!(
            "{}/match/{}/#/match-summary/match-summary",
            BASE_URL, match_ref.id
        );
        goto_and_settle(&page, &summary_url, self.config.page_delay).await?;

        if !wait_for_selector(&page, ".duelParticipant__startTime", TIMEOUT_FAST).await {
            warn!("Summary page did not load for match {}", match_ref.id);
            if self.config.debug {
                debug_screenshot(&page, "summary").await;
            }
            return Ok(None);
        }

        let quarter_scores = if wait_for_selector(
            &page,
            ".smh__template.basketball",
            OPTIONAL_ELEMENT_WAIT,
        )
        .await
        {
            let columns: Vec<Option<RawQuarter>> = eval_json(&page, QUARTER_SCORES_SCRIPT).await?;
            parse_quarter_scores(columns)
        } else {
            debug!("No quarter score strip for match {}", match_ref.id);
            Default::default()
        };

        let summary: RawSummary = eval_json(&page, SUMMARY_SCRIPT).await?;
        let date = field_or_na(summary.date);
        let home_team = field_or_na(summary.home_team);
        let away_team = field_or_na(summary.away_team);
        let mut home_score = field_or_na(summary.home_score);
        let mut away_score = field_or_na(summary.away_score);

        // Some finished games omit the final score element; fall back to the
        // quarter sums.
        if home_score == NOT_AVAILABLE || away_score == NOT_AVAILABLE {
            let (home_total, away_total) = totals_from_quarters(&quarter_scores);
            home_score = home_total;
            away_score = away_total;
        }

        let quarter_stats = self
            .collect_period_stats(&page, &match_ref.id, &home_team, &away_team)
            .await;

        Ok(Some(MatchRecord {
            match_id: match_ref.id.clone(),
            stage: match_ref.stage.clone(),
            date,
            home_team,
            away_team,
            home_score,
            away_score,
            quarter_scores,
            quarter_stats,
            scraped_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }))
    }

    /// Walk the per-period statistics tabs until one fails to appear.
    /// Extraction errors end the walk but never fail the match.
    async fn collect_period_stats(
        &self,
        page: &Page,
        match_id: &str,
        home_team: &str,
        away_team: &str,
    ) -> QuarterStats {
        let mut all_stats = QuarterStats::new();

        for period_index in 1..=MAX_PERIODS {
            let stats_url = format!(
                "{}/match/{}/#/match-summary/match-statistics/{}",
                BASE_URL, match_id, period_index
            );
            if let Err(e) = goto_and_settle(page, &stats_url, self.config.page_delay).await {
                warn!("Navigation to period {} stats failed: {}", period_index, e);
                break;
            }

            if !wait_for_selector(page, "div[data-testid='wcl-statistics']", OPTIONAL_ELEMENT_WAIT)
                .await
            {
                info!(
                    "No statistics for period {}, ending extraction for match {}",
                    period_index, match_id
                );
                break;
            }

            sleep(Duration::from_secs(1)).await;

            let payload: RawStatsPayload = match eval_json(page, PERIOD_STATS_SCRIPT).await {
                Ok(p) => p,
                Err(e) => {
                    warn!("Failed to read period {} statistics: {}", period_index, e);
                    break;
                }
            };

            match parse_period_stats(payload) {
                PeriodTab::Stats { period, home, away } => {
                    info!("Extracted statistics for {} ({} rows)", period, home.len());
                    all_stats.insert(period, stats_by_team(home_team, away_team, home, away));
                }
                PeriodTab::Empty => {
                    debug!("Period {} tab had no tracked statistics", period_index);
                }
                PeriodTab::Missing => {
                    debug!("No selected period tab at index {}", period_index);
                    break;
                }
            }
        }

        all_stats
    }
}

#[async_trait]
impl Scraper for MatchScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        let browser = launch_browser(&self.config).await?;
        let page = new_stealth_page(&browser).await?;
        self.browser = Some(browser);
        self.page = Some(Arc::new(page));
        Ok(())
    }

    async fn collect(&mut self) -> Result<Vec<MatchRecord>, ScraperError> {
        let matches = self.list_matches().await?;
        let matches = select_recent(matches, self.config.last);
        info!("Scraping {} matches", matches.len());

        let mut records = Vec::with_capacity(matches.len());
        for match_ref in &matches {
            if let Some(record) = self.scrape_match(match_ref).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser");
        self.page = None;
        self.browser = None;
        Ok(())
    }
}
