use std::path::PathBuf;
use std::time::Duration;

/// Flashscore base URL; match pages are addressed as `<BASE_URL>/match/<id>/...`.
pub const BASE_URL: &str = "https://www.flashscore.com";

/// Fast wait, for elements expected on an already loaded page.
pub const TIMEOUT_FAST: Duration = Duration::from_millis(10_000);
/// Slow wait, for full page loads.
pub const TIMEOUT_SLOW: Duration = Duration::from_millis(30_000);

/// Upper bound on "show more matches" clicks on the results page.
pub const MAX_SHOW_MORE_CLICKS: u32 = 30;

/// Periods probed per match: Q1-Q4 plus up to five overtimes.
pub const MAX_PERIODS: u32 = 9;

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Statistic categories kept per quarter, in display order. Anything else on
/// the statistics tab is ignored.
pub const STAT_CATEGORIES: &[&str] = &[
    // Scoring
    "Field Goals Attempted",
    "Field Goals Made",
    "Field Goals %",
    "2-Point Field G. Attempted",
    "2-Point Field Goals Made",
    "2-Point Field Goals %",
    "3-Point Field G. Attempted",
    "3-Point Field Goals Made",
    "3-Point Field Goals %",
    "Free Throws Attempted",
    "Free Throws Made",
    "Free Throws %",
    // Rebounds
    "Offensive Rebounds",
    "Defensive Rebounds",
    "Total Rebounds",
    // Other
    "Assists",
    "Blocks",
    "Turnovers",
    "Steals",
    "Personal Fouls",
];

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Flashscore league URL (the season page; `/results` is appended).
    pub league_url: String,
    pub output_path: PathBuf,
    pub backup_path: PathBuf,
    /// Scrape only the N most recent matches.
    pub last: Option<usize>,
    pub headless: bool,
    pub debug: bool,
    /// Pause between navigations.
    pub page_delay: Duration,
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            league_url: String::new(),
            output_path: PathBuf::from("output"),
            backup_path: PathBuf::from("backups"),
            last: None,
            headless: true,
            debug: false,
            page_delay: Duration::from_secs(1),
            timeout: TIMEOUT_SLOW,
        }
    }
}

impl ScraperConfig {
    pub fn new(league_url: impl Into<String>) -> Self {
        Self {
            league_url: league_url.into(),
            ..Default::default()
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    pub fn with_last(mut self, last: Option<usize>) -> Self {
        self.last = last;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
