use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::analysis::rules::truncate_chars;
use crate::analysis::{CompanyAnalyzer, HeuristicAnalyzer};
use crate::collaborators::{CollaboratorError, Collaborators};
use crate::domain::{AnalysisResult, CompanyResearch, JobMetadata};
use crate::scoring::{Aggregator, ScoringConfig, SignalSet};
use crate::scrape::JobScraper;

pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(10);
pub const SCRAPE_FAILED_TITLE: &str = "Scrape failed; try manual mode";
const SCRAPE_ERROR_CHARS: usize = 200;

/// Runs every signal producer for a posting and folds the results into one verdict.
///
/// Producers run as separate tasks over a shared, read-only [`JobMetadata`]. Any producer
/// that errors, exceeds the timeout, or panics contributes a neutral signal instead.
pub struct GhostJobAnalyzer {
    heuristics: Arc<HeuristicAnalyzer>,
    company: Arc<CompanyAnalyzer>,
    aggregator: Aggregator,
    collaborators: Collaborators,
    scraper: Arc<dyn JobScraper>,
    timeout: Duration,
}

impl GhostJobAnalyzer {
    pub fn new(scoring: ScoringConfig, collaborators: Collaborators, scraper: Arc<dyn JobScraper>) -> Self {
        Self {
            heuristics: Arc::new(HeuristicAnalyzer::new(scoring.heuristics.clone())),
            company: Arc::new(CompanyAnalyzer::new(scoring.company.clone())),
            aggregator: Aggregator::new(scoring),
            collaborators,
            scraper,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Score a posting whose metadata is already known.
    pub async fn analyze(&self, metadata: JobMetadata, job_url: &str) -> AnalysisResult {
        info!(company = %metadata.company, title = %metadata.title, "analyzing posting");

        let metadata = Arc::new(metadata);
        let signals = self.gather(&metadata).await;

        let result = score_or_degrade(&metadata, job_url, || {
            self.aggregator.aggregate(&metadata, job_url, signals)
        });

        info!(
            score = result.ghost_score.score,
            label = result.ghost_score.label.label(),
            flags = result.red_flags.len(),
            "analysis complete"
        );
        result
    }

    /// Scrape the posting first. A scrape failure yields a distinguishable zero-score result.
    pub async fn analyze_url(&self, url: &str) -> AnalysisResult {
        info!(url, "scrape-and-analyze requested");

        match self.scraper.scrape(url).await {
            Ok(metadata) => self.analyze(metadata, url).await,
            Err(scrape_error) => {
                let message = scrape_error.to_string();
                let detail = truncate_chars(&message, SCRAPE_ERROR_CHARS);
                warn!(url, error = detail, "scrape failed");
                AnalysisResult::degraded(url, "", SCRAPE_FAILED_TITLE, format!("Scrape failed: {detail}"))
            }
        }
    }

    async fn gather(&self, metadata: &Arc<JobMetadata>) -> SignalSet {
        let limit = self.timeout;

        let parity = {
            let parity = self.collaborators.parity.clone();
            let metadata = metadata.clone();
            spawn_guarded("parity", async move {
                with_timeout("parity", limit, parity.check(&metadata.company, &metadata.title)).await
            })
        };

        let financial = {
            let financial = self.collaborators.financial.clone();
            let metadata = metadata.clone();
            spawn_guarded("financial", async move {
                with_timeout("financial", limit, financial.check(&metadata.company)).await
            })
        };

        let sentiment = {
            let sentiment = self.collaborators.sentiment.clone();
            let metadata = metadata.clone();
            spawn_guarded("sentiment", async move {
                with_timeout("sentiment", limit, sentiment.classify(&metadata.raw_text, &metadata.title)).await
            })
        };

        let deep = {
            let sentiment = self.collaborators.sentiment.clone();
            let metadata = metadata.clone();
            spawn_guarded("deep", async move {
                with_timeout("deep", limit, sentiment.classify_deep(&metadata.raw_text, &metadata.title)).await
            })
        };

        let heuristics = {
            let analyzer = self.heuristics.clone();
            let metadata = metadata.clone();
            spawn_guarded("heuristics", async move {
                Ok(analyzer.analyze(&metadata.raw_text, &metadata.title))
            })
        };

        let company = {
            let analyzer = self.company.clone();
            let researcher = self.collaborators.research.clone();
            let metadata = metadata.clone();
            spawn_guarded("company", async move {
                let research = settle::<CompanyResearch>(
                    "research",
                    with_timeout("research", limit, researcher.research(&metadata.company)).await,
                );
                Ok(analyzer.analyze(
                    &metadata.company,
                    &metadata.raw_text,
                    &metadata.title,
                    &research,
                ))
            })
        };

        let (parity, financial, sentiment, deep, heuristics, company) =
            tokio::join!(parity, financial, sentiment, deep, heuristics, company);

        SignalSet {
            parity: settle("parity", parity),
            financial: settle("financial", financial),
            sentiment: settle("sentiment", sentiment),
            heuristics: settle("heuristics", heuristics),
            company: settle("company", company),
            deep: settle("deep", deep),
        }
    }
}

async fn with_timeout<T>(
    producer: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| CollaboratorError::Timeout { producer })?
}

/// Run a producer on its own task so a panic inside it stays contained.
async fn spawn_guarded<T>(
    producer: &'static str,
    task: impl Future<Output = Result<T, CollaboratorError>> + Send + 'static,
) -> Result<T, CollaboratorError>
where
    T: Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let detail = if join_error.is_panic() {
                panic_message(join_error.into_panic().as_ref())
            } else {
                join_error.to_string()
            };
            Err(CollaboratorError::TaskFailed { producer, detail })
        }
    }
}

fn settle<T: Default>(producer: &'static str, outcome: Result<T, CollaboratorError>) -> T {
    outcome.unwrap_or_else(|error| {
        warn!(producer, %error, "signal producer downgraded to neutral");
        T::default()
    })
}

fn score_or_degrade(
    metadata: &JobMetadata,
    job_url: &str,
    score: impl FnOnce() -> AnalysisResult,
) -> AnalysisResult {
    match catch_unwind(AssertUnwindSafe(score)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            error!(job_url, detail = %detail, "aggregation failed");
            AnalysisResult::degraded(
                job_url,
                metadata.company.as_str(),
                metadata.title.as_str(),
                format!("Analysis error: {detail}"),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
