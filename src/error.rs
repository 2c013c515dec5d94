use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("browser init error: {0}")]
    BrowserInit(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("javascript error: {0}")]
    JavaScript(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("json error: {0}")]
    Json(String),

    #[error("file io error: {0}")]
    FileIo(#[from] std::io::Error),
}

impl ScraperError {
    /// Transient failures worth another attempt on the same page.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScraperError::Timeout(_) | ScraperError::Navigation(_) | ScraperError::JavaScript(_)
        )
    }
}
