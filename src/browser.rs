//! Browser launch and page helpers shared by the scraper.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{ScraperConfig, USER_AGENTS};
use crate::error::ScraperError;

/// Interval between element polls in [`wait_for_selector`].
const SELECTOR_POLL_MS: u64 = 250;

/// Pick a user agent for this run. Rotation only needs to vary across runs,
/// so the process clock is enough.
fn pick_user_agent() -> &'static str {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as usize;
    USER_AGENTS[nanos % USER_AGENTS.len()]
}

/// Launch Chrome/Chromium with the usual anti-automation-detection arguments
/// and spawn the CDP event handler in the background.
pub async fn launch_browser(config: &ScraperConfig) -> Result<Browser, ScraperError> {
    info!("Launching browser (headless={})...", config.headless);

    // Unique user data dir so parallel runs do not trip over each other
    let unique_id = format!(
        "{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    );
    let user_data_dir = std::env::temp_dir().join(format!("hoopscrape-{}", unique_id));

    let chrome_path = std::env::var("CHROME_PATH")
        .or_else(|_| std::env::var("CHROMIUM_PATH"))
        .unwrap_or_else(|_| "chromium".to_string());

    let mut builder = BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .user_data_dir(&user_data_dir)
        .window_size(1920, 1080);

    if !config.headless {
        builder = builder.with_head();
    }

    builder = builder
        .no_sandbox()
        .request_timeout(Duration::from_secs(60))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu")
        .arg(format!("--user-agent={}", pick_user_agent()));

    if config.debug {
        builder = builder.arg("--enable-logging=stderr").arg("--v=1");
    }

    let browser_config = builder
        .build()
        .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            debug!("Browser event: {:?}", event);
        }
    });

    info!("Browser launched");
    Ok(browser)
}

/// Open a fresh page with the `navigator.webdriver` override installed before
/// any site script runs.
pub async fn new_stealth_page(browser: &Browser) -> Result<Page, ScraperError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

    let script = AddScriptToEvaluateOnNewDocumentParams::builder()
        .source("Object.defineProperty(navigator, 'webdriver', {get: () => undefined})")
        .build()
        .map_err(ScraperError::BrowserInit)?;
    page.execute(script)
        .await
        .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

    Ok(page)
}

/// Navigate and pause briefly so the page can settle.
pub async fn goto_and_settle(
    page: &Page,
    url: &str,
    delay: Duration,
) -> Result<(), ScraperError> {
    debug!("Navigating to {}", url);
    page.goto(url)
        .await
        .map_err(|e| ScraperError::Navigation(e.to_string()))?;
    sleep(delay).await;
    Ok(())
}

/// Poll for a CSS selector until it appears or the timeout elapses. Returns
/// `false` on timeout; evaluation failures count as "not there yet".
pub async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    let script = format!(
        "document.querySelector({}) !== null",
        serde_json::to_string(selector).unwrap_or_default()
    );

    while start.elapsed() < timeout {
        match page.evaluate(script.as_str()).await {
            Ok(result) => {
                if result.into_value::<bool>().unwrap_or(false) {
                    return true;
                }
            }
            Err(e) => debug!("Selector poll error for {}: {}", selector, e),
        }
        sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
    }

    debug!("Selector {} not found within {:?}", selector, timeout);
    false
}

/// Wait until `document.readyState` reports complete, bounded by `timeout`.
pub async fn wait_for_load(page: &Page, timeout: Duration) {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        let state = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|v| v.into_value::<String>().ok())
            .unwrap_or_default();
        if state == "complete" {
            return;
        }
        sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
    }
    warn!("Page load not complete after {:?}, proceeding anyway", timeout);
}

/// Evaluate a script whose result is a `JSON.stringify(...)` string, and
/// deserialize it.
pub async fn eval_json<T: serde::de::DeserializeOwned>(
    page: &Page,
    script: &str,
) -> Result<T, ScraperError> {
    let result = page
        .evaluate(script)
        .await
        .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
    let json_str = result
        .into_value::<String>()
        .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
    serde_json::from_str(&json_str).map_err(|e| ScraperError::Json(e.to_string()))
}

/// Base64-encoded full-page screenshot logged at debug level; used when a
/// page refuses to produce the expected elements.
pub async fn debug_screenshot(page: &Page, label: &str) {
    use base64::Engine;
    use chromiumoxide::page::ScreenshotParams;

    match page
        .screenshot(ScreenshotParams::builder().full_page(true).build())
        .await
    {
        Ok(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            debug!("{} screenshot: data:image/png;base64,{}", label, encoded);
        }
        Err(e) => debug!("Failed to capture {} screenshot: {}", label, e),
    }
}
