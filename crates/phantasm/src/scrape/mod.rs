//! Turning a posting URL into [`JobMetadata`].

pub mod extract;
mod fetch;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::analysis::rules::truncate_chars;
use crate::domain::{JobMetadata, Platform};

pub use fetch::{DirectFetch, FetchStrategy, RenderingProxyFetch};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to fetch page (HTTP {0})")]
    Status(u16),

    #[error("could not extract a posting: {0}")]
    Extraction(String),
}

#[async_trait]
pub trait JobScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<JobMetadata, ScrapeError>;
}

/// Fetches the page with the configured strategy and applies per-platform extraction rules.
pub struct HtmlJobScraper {
    fetch: Arc<dyn FetchStrategy>,
}

impl HtmlJobScraper {
    pub fn new(fetch: Arc<dyn FetchStrategy>) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl JobScraper for HtmlJobScraper {
    async fn scrape(&self, url: &str) -> Result<JobMetadata, ScrapeError> {
        let platform = Platform::detect(url);
        let html = self.fetch.fetch(url, platform).await?;
        let page = extract::extract_page(&html, url, platform);

        if page.title.is_empty() && page.raw_text.is_empty() {
            return Err(ScrapeError::Extraction(
                "page had no title and no visible text".to_string(),
            ));
        }

        info!(
            platform = platform.label(),
            strategy = self.fetch.name(),
            title = truncate_chars(&page.title, 60),
            company = %page.company,
            text_length = page.raw_text.chars().count(),
            "posting extracted"
        );

        Ok(JobMetadata {
            url: url.to_string(),
            title: page.title,
            company: page.company,
            posted_date: page.posted_date,
            raw_text: page.raw_text,
            platform,
        })
    }
}
