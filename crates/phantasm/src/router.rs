use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;

use crate::domain::{JobMetadata, Platform};
use crate::orchestrator::GhostJobAnalyzer;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub metadata: Option<JobMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Hand-entered posting for pages that cannot be scraped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAnalyzeRequest {
    pub url: String,
    pub title: String,
    pub company: String,
    pub raw_text: String,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl ManualAnalyzeRequest {
    pub fn into_metadata(self) -> JobMetadata {
        let platform = match self.platform.as_deref() {
            Some(label) => Platform::from_label(label),
            None => Platform::detect(&self.url),
        };

        JobMetadata {
            url: self.url,
            title: self.title,
            company: self.company,
            posted_date: self.posted_date.filter(|value| !value.trim().is_empty()),
            raw_text: self.raw_text,
            platform,
        }
    }
}

/// Router builder exposing the analysis endpoints. Every analysis answers 200.
pub fn analysis_router(analyzer: Arc<GhostJobAnalyzer>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/web/scrape-and-analyze", post(scrape_and_analyze_handler))
        .route("/web/manual-analyze", post(manual_analyze_handler))
        .with_state(analyzer)
}

pub(crate) async fn analyze_handler(
    State(analyzer): State<Arc<GhostJobAnalyzer>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response {
    let result = match request.metadata {
        Some(metadata) => analyzer.analyze(metadata, &request.url).await,
        None => analyzer.analyze_url(&request.url).await,
    };
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn scrape_and_analyze_handler(
    State(analyzer): State<Arc<GhostJobAnalyzer>>,
    axum::Json(request): axum::Json<ScrapeRequest>,
) -> Response {
    let result = analyzer.analyze_url(&request.url).await;
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn manual_analyze_handler(
    State(analyzer): State<Arc<GhostJobAnalyzer>>,
    axum::Json(request): axum::Json<ManualAnalyzeRequest>,
) -> Response {
    let job_url = request.url.clone();
    let result = analyzer.analyze(request.into_metadata(), &job_url).await;
    (StatusCode::OK, axum::Json(result)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(platform: Option<&str>) -> ManualAnalyzeRequest {
        ManualAnalyzeRequest {
            url: "https://www.indeed.com/viewjob?jk=1".to_string(),
            title: "Analyst".to_string(),
            company: "Acme".to_string(),
            raw_text: "Analyze quarterly numbers.".to_string(),
            posted_date: Some("  ".to_string()),
            platform: platform.map(str::to_string),
        }
    }

    #[test]
    fn manual_request_maps_unrecognised_platform_to_unknown() {
        let metadata = manual(Some("monster")).into_metadata();
        assert_eq!(metadata.platform, Platform::Unknown);
        assert_eq!(metadata.posted_date, None);
    }

    #[test]
    fn manual_request_without_platform_detects_it_from_the_url() {
        let metadata = manual(None).into_metadata();
        assert_eq!(metadata.platform, Platform::Indeed);
    }

    #[test]
    fn manual_request_reads_camel_case_fields() {
        let request: ManualAnalyzeRequest = serde_json::from_value(serde_json::json!({
            "url": "https://jobs.lever.co/acme/1",
            "title": "Engineer",
            "company": "Acme",
            "rawText": "Build it.",
            "postedDate": "2025-01-01",
            "platform": "Lever"
        }))
        .expect("request deserializes");

        let metadata = request.into_metadata();
        assert_eq!(metadata.platform, Platform::Lever);
        assert_eq!(metadata.posted_date.as_deref(), Some("2025-01-01"));
        assert_eq!(metadata.raw_text, "Build it.");
    }
}
