use metrics_exporter_prometheus::PrometheusHandle;
use phantasm::collaborators::{AnthropicClassifier, CareersPageChecker, Collaborators, NewsApiClient};
use phantasm::config::{AppConfig, CollaboratorConfig};
use phantasm::error::AppError;
use phantasm::scoring::ScoringConfig;
use phantasm::scrape::{DirectFetch, FetchStrategy, HtmlJobScraper, RenderingProxyFetch};
use phantasm::GhostJobAnalyzer;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire every collaborator the configuration has credentials for. The rest stay disabled.
pub(crate) fn build_collaborators(
    config: &CollaboratorConfig,
    scoring: &ScoringConfig,
) -> Result<Collaborators, AppError> {
    let weights = &scoring.collaborators;
    let mut collaborators = Collaborators::disabled();

    collaborators.parity = Arc::new(CareersPageChecker::new(
        weights.parity_pass,
        weights.parity_fail,
        config.timeout,
    )?);

    match &config.news_api_key {
        Some(key) => {
            let news = Arc::new(NewsApiClient::new(
                key.clone(),
                weights.financial_layoffs,
                config.timeout,
            )?);
            collaborators.financial = news.clone();
            collaborators.research = news;
        }
        None => warn!("NEWS_API_KEY not set; financial health and company research disabled"),
    }

    match &config.anthropic_api_key {
        Some(key) => {
            collaborators.sentiment = Arc::new(AnthropicClassifier::new(
                key.clone(),
                config.anthropic_model.clone(),
                weights.clone(),
                config.timeout,
            )?);
        }
        None => warn!("ANTHROPIC_API_KEY not set; sentiment classification disabled"),
    }

    Ok(collaborators)
}

pub(crate) fn build_fetch_strategy(config: &CollaboratorConfig) -> Result<Arc<dyn FetchStrategy>, AppError> {
    let strategy: Arc<dyn FetchStrategy> = match &config.scrapingbee_api_key {
        Some(key) => Arc::new(RenderingProxyFetch::new(key.clone())?),
        None => Arc::new(DirectFetch::new()?),
    };
    info!(strategy = strategy.name(), "scraper fetch strategy selected");
    Ok(strategy)
}

pub(crate) fn build_analyzer(config: &AppConfig) -> Result<GhostJobAnalyzer, AppError> {
    let collaborators = build_collaborators(&config.collaborators, &config.scoring)?;
    let scraper = Arc::new(HtmlJobScraper::new(build_fetch_strategy(&config.collaborators)?));

    Ok(
        GhostJobAnalyzer::new(config.scoring.clone(), collaborators, scraper)
            .with_timeout(config.collaborators.timeout),
    )
}
