//! NewsAPI client backing the financial-health check and company research.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{CollaboratorError, CompanyResearcher, FinancialHealth};
use crate::domain::{CompanyResearch, FlagType, RedFlag, Severity, Signal};

const NEWS_API_BASE_URL: &str = "https://newsapi.org/v2/everything";
const SERVICE: &str = "newsapi";
const LAYOFF_TERMS: &str = r#"("layoffs" OR "hiring freeze" OR "downsizing" OR "job cuts")"#;
const CONTROVERSY_TERMS: &str = r#"("scandal" OR "fraud" OR "lawsuit" OR "investigation" OR "SEC" OR "FTC" OR "class action" OR "ponzi" OR "scam")"#;
const FINANCIAL_LOOKBACK_DAYS: i64 = 90;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewsSearch {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
}

impl NewsSearch {
    fn top_headline(&self) -> Option<&str> {
        if self.total_results == 0 {
            return None;
        }
        self.articles.first().map(|article| {
            article
                .title
                .as_deref()
                .unwrap_or("Recent financial concerns")
        })
    }
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    layoff_weight: i32,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>, layoff_weight: i32, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: NEWS_API_BASE_URL.to_string(),
            layoff_weight,
        })
    }

    /// Point the client at another endpoint, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, params: &[(&str, String)]) -> Result<NewsSearch, CollaboratorError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        response
            .json::<NewsSearch>()
            .await
            .map_err(|error| CollaboratorError::Malformed {
                service: SERVICE,
                detail: error.to_string(),
            })
    }
}

pub(crate) fn layoff_query(company: &str) -> String {
    format!("\"{company}\" AND {LAYOFF_TERMS}")
}

pub(crate) fn controversy_query(company: &str) -> String {
    format!("\"{company}\" AND {CONTROVERSY_TERMS}")
}

pub(crate) fn financial_signal(search: &NewsSearch, weight: i32) -> Signal {
    match search.top_headline() {
        Some(headline) => Signal::flagged(
            weight,
            RedFlag::new(
                FlagType::Financial,
                Severity::High,
                format!("Recent news: {headline}"),
            ),
        ),
        None => Signal::neutral(),
    }
}

pub(crate) fn research_from(presence: &NewsSearch, controversy: Option<&NewsSearch>) -> CompanyResearch {
    let headline = controversy
        .filter(|search| search.total_results > 0)
        .and_then(|search| search.articles.first())
        .map(|article| article.title.clone().unwrap_or_default());

    CompanyResearch {
        article_count: Some(presence.total_results),
        has_controversy: headline.is_some(),
        controversy_headline: headline.unwrap_or_default(),
    }
}

#[async_trait]
impl FinancialHealth for NewsApiClient {
    async fn check(&self, company: &str) -> Result<Signal, CollaboratorError> {
        if company.is_empty() {
            return Ok(Signal::neutral());
        }

        let from = (Utc::now() - ChronoDuration::days(FINANCIAL_LOOKBACK_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let search = self
            .search(&[
                ("q", layoff_query(company)),
                ("from", from),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", "5".to_string()),
            ])
            .await?;

        let signal = financial_signal(&search, self.layoff_weight);
        if signal.is_neutral() {
            debug!(company, "no layoff or freeze coverage");
        } else {
            info!(company, articles = search.total_results, "layoff or freeze coverage found");
        }
        Ok(signal)
    }
}

#[async_trait]
impl CompanyResearcher for NewsApiClient {
    async fn research(&self, company: &str) -> Result<CompanyResearch, CollaboratorError> {
        if company.is_empty() {
            return Ok(CompanyResearch::unknown());
        }

        let presence = self
            .search(&[
                ("q", format!("\"{company}\"")),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", "5".to_string()),
                ("language", "en".to_string()),
            ])
            .await?;

        let controversy = match self
            .search(&[
                ("q", controversy_query(company)),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", "3".to_string()),
                ("language", "en".to_string()),
            ])
            .await
        {
            Ok(search) => Some(search),
            Err(error) => {
                warn!(company, %error, "controversy lookup failed");
                None
            }
        };

        let research = research_from(&presence, controversy.as_ref());
        debug!(
            company,
            articles = presence.total_results,
            controversy = research.has_controversy,
            "company research complete"
        );
        Ok(research)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn search(total_results: u64, titles: &[&str]) -> NewsSearch {
        NewsSearch {
            total_results,
            articles: titles
                .iter()
                .map(|title| NewsArticle {
                    title: Some(title.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn queries_quote_the_company() {
        assert!(layoff_query("Acme Corp").starts_with("\"Acme Corp\" AND (\"layoffs\""));
        assert!(controversy_query("Acme").contains("\"class action\""));
    }

    #[test]
    fn any_layoff_article_is_a_high_financial_flag() {
        let signal = financial_signal(&search(3, &["Acme cuts 10% of staff"]), 25);

        assert_eq!(signal.delta, 25);
        let flag = signal.flag.expect("financial flag");
        assert_eq!(flag.kind, FlagType::Financial);
        assert_eq!(flag.severity, Severity::High);
        assert_eq!(flag.message, "Recent news: Acme cuts 10% of staff");
    }

    #[test]
    fn empty_search_is_neutral() {
        assert!(financial_signal(&search(0, &[]), 25).is_neutral());
        assert!(financial_signal(&search(4, &[]), 25).is_neutral());
    }

    #[test]
    fn research_distinguishes_zero_from_unknown() {
        let research = research_from(&search(0, &[]), None);
        assert_eq!(research.article_count, Some(0));
        assert!(!research.has_controversy);

        let research = research_from(&search(12, &[]), Some(&search(1, &["Acme sued by FTC"])));
        assert_eq!(research.article_count, Some(12));
        assert!(research.has_controversy);
        assert_eq!(research.controversy_headline, "Acme sued by FTC");
    }

    async fn client_for(router: Router) -> NewsApiClient {
        let base = crate::testing::serve(router).await;
        NewsApiClient::new("news-key", 25, Duration::from_secs(5))
            .expect("client builds")
            .with_base_url(format!("{base}/v2/everything"))
    }

    #[tokio::test]
    async fn layoff_coverage_from_the_api_raises_a_financial_flag() {
        let router = Router::new().route(
            "/v2/everything",
            get(|RawQuery(query): RawQuery| async move {
                let query = query.unwrap_or_default();
                if !query.contains("apiKey=news-key") || !query.contains("layoffs") {
                    return (StatusCode::BAD_REQUEST, Json(json!({"status": "error"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "status": "ok",
                        "totalResults": 2,
                        "articles": [{"title": "Acme announces hiring freeze"}]
                    })),
                )
            }),
        );
        let client = client_for(router).await;

        let signal = client.check("Acme").await.expect("search succeeds");
        assert_eq!(signal.delta, 25);
        assert_eq!(
            signal.flag.map(|flag| flag.message),
            Some("Recent news: Acme announces hiring freeze".to_string())
        );
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/v2/everything",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let client = client_for(router).await;

        let error = client.check("Acme").await.expect_err("429 is an error");
        assert!(matches!(
            error,
            CollaboratorError::Status {
                service: "newsapi",
                status: 429
            }
        ));
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let router = Router::new().route("/v2/everything", get(|| async { "<html>maintenance</html>" }));
        let client = client_for(router).await;

        let error = client.research("Acme").await.expect_err("html is not a search result");
        assert!(matches!(error, CollaboratorError::Malformed { service: "newsapi", .. }));
    }

    #[tokio::test]
    async fn failed_controversy_lookup_keeps_the_presence_count() {
        let router = Router::new().route(
            "/v2/everything",
            get(|RawQuery(query): RawQuery| async move {
                if query.unwrap_or_default().contains("scandal") {
                    return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"status": "error"})));
                }
                (StatusCode::OK, Json(json!({"status": "ok", "totalResults": 40, "articles": []})))
            }),
        );
        let client = client_for(router).await;

        let research = client.research("Acme").await.expect("presence search succeeds");
        assert_eq!(research.article_count, Some(40));
        assert!(!research.has_controversy);
    }

    #[test]
    fn search_payload_parses_with_missing_fields() {
        let parsed: NewsSearch =
            serde_json::from_str(r#"{"status":"ok","totalResults":2,"articles":[{"title":null}]}"#)
                .expect("payload parses");
        assert_eq!(parsed.total_results, 2);
        assert_eq!(parsed.top_headline(), Some("Recent financial concerns"));
    }
}
