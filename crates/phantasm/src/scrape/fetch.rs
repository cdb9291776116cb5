use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use super::{ScrapeError, BROWSER_USER_AGENT};
use crate::domain::Platform;

const DIRECT_TIMEOUT: Duration = Duration::from_secs(15);
const PROXY_TIMEOUT: Duration = Duration::from_secs(45);
const SCRAPINGBEE_URL: &str = "https://app.scrapingbee.com/api/v1";

/// How raw page HTML is obtained.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &str, platform: Platform) -> Result<String, ScrapeError>;
}

fn js_heavy(platform: Platform) -> bool {
    matches!(platform, Platform::Linkedin | Platform::Indeed)
}

async fn read_body(response: reqwest::Response) -> Result<String, ScrapeError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Plain GET with browser-like headers. Follows redirects.
pub struct DirectFetch {
    client: Client,
}

impl DirectFetch {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(DIRECT_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn fetch(&self, url: &str, platform: Platform) -> Result<String, ScrapeError> {
        if js_heavy(platform) {
            warn!(
                platform = platform.label(),
                "no rendering proxy configured; direct fetch returns limited data"
            );
        }
        let response = self.client.get(url).send().await?;
        read_body(response).await
    }
}

/// ScrapingBee rendering proxy for pages that only fill in after JavaScript runs.
pub struct RenderingProxyFetch {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl RenderingProxyFetch {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ScrapeError> {
        let client = Client::builder().timeout(PROXY_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: SCRAPINGBEE_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn params(&self, url: &str, platform: Platform) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("url", url.to_string()),
            ("render_js", "true".to_string()),
        ];

        match platform {
            Platform::Linkedin => {
                let scenario = json!({
                    "instructions": [
                        {"wait": 3000},
                        {"click": ".jobs-description__footer-button"},
                        {"wait": 1000},
                        {"click": "button[aria-label='Show more']"},
                        {"wait": 1000},
                    ]
                });
                params.push(("premium_proxy", "true".to_string()));
                params.push(("wait", "5000".to_string()));
                params.push(("js_scenario", scenario.to_string()));
                params.push((
                    "wait_for",
                    ".jobs-description-content__text, .description__text, .show-more-less-html".to_string(),
                ));
            }
            Platform::Indeed => {
                params.push(("premium_proxy", "true".to_string()));
                params.push(("wait", "3000".to_string()));
                params.push(("wait_for", "#jobDescriptionText".to_string()));
            }
            _ => {}
        }

        params
    }
}

#[async_trait]
impl FetchStrategy for RenderingProxyFetch {
    fn name(&self) -> &'static str {
        "rendering-proxy"
    }

    async fn fetch(&self, url: &str, platform: Platform) -> Result<String, ScrapeError> {
        info!(
            platform = platform.label(),
            premium = js_heavy(platform),
            "fetching through rendering proxy"
        );
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.params(url, platform))
            .send()
            .await?;
        read_body(response).await
    }
}
