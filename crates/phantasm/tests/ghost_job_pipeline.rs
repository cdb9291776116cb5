//! End-to-end behavior of the analysis pipeline through the public analyzer and HTTP router.
//!
//! Collaborators are replaced by in-process fakes that answer, fail, stall or panic on
//! demand, so the fan-out, timeout and fan-in rules can be exercised without the network.

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::response::Response;
    use serde_json::Value;

    use phantasm::collaborators::{
        CareersParity, CollaboratorError, Collaborators, CompanyResearcher, FinancialHealth,
        SentimentClassifier,
    };
    use phantasm::scoring::ScoringConfig;
    use phantasm::scrape::{JobScraper, ScrapeError};
    use phantasm::{
        CompanyResearch, FlagType, GhostJobAnalyzer, JobMetadata, Platform, RedFlag, Severity,
        Signal,
    };

    pub(super) const JOB_URL: &str = "https://boards.greenhouse.io/acmerobotics/jobs/42";

    pub(super) fn metadata() -> JobMetadata {
        JobMetadata {
            url: JOB_URL.to_string(),
            title: "Backend Engineer".to_string(),
            company: "Acme Robotics".to_string(),
            posted_date: None,
            raw_text: [
                "You will join a team of 6 engineers reporting to the VP of Engineering.",
                "We are a Series B company with 120 employees building warehouse robots.",
                "The role owns our billing system migration planned for Q3.",
                "Pay is $140,000 to $165,000 plus equity.",
                "Requires 4 years of experience with distributed systems.",
            ]
            .join("\n\n"),
            platform: Platform::Greenhouse,
        }
    }

    pub(super) fn parity_flag() -> Signal {
        Signal::flagged(
            25,
            RedFlag::new(FlagType::Parity, Severity::High, "Not found on company careers page"),
        )
    }

    pub(super) fn financial_flag() -> Signal {
        Signal::flagged(
            25,
            RedFlag::new(
                FlagType::Financial,
                Severity::High,
                "Recent news: Acme Robotics announces layoffs",
            ),
        )
    }

    pub(super) fn sentiment_flag() -> Signal {
        Signal::flagged(
            20,
            RedFlag::new(FlagType::Sentiment, Severity::High, "Description reads as a template"),
        )
    }

    pub(super) fn deep_flag() -> Signal {
        Signal::flagged(
            8,
            RedFlag::new(
                FlagType::Sentiment,
                Severity::High,
                "AI detected: responsibilities never name a deliverable",
            ),
        )
    }

    /// Answers with a fixed signal after an optional delay.
    pub(super) struct Fixed {
        pub(super) signal: Signal,
        pub(super) delay: Duration,
    }

    impl Fixed {
        pub(super) fn now(signal: Signal) -> Arc<Self> {
            Self::after(signal, Duration::ZERO)
        }

        pub(super) fn after(signal: Signal, delay: Duration) -> Arc<Self> {
            Arc::new(Self { signal, delay })
        }

        async fn answer(&self) -> Signal {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.signal.clone()
        }
    }

    #[async_trait]
    impl CareersParity for Fixed {
        async fn check(&self, _company: &str, _title: &str) -> Result<Signal, CollaboratorError> {
            Ok(self.answer().await)
        }
    }

    #[async_trait]
    impl FinancialHealth for Fixed {
        async fn check(&self, _company: &str) -> Result<Signal, CollaboratorError> {
            Ok(self.answer().await)
        }
    }

    pub(super) struct FixedSentiment {
        pub(super) delay: Duration,
    }

    #[async_trait]
    impl SentimentClassifier for FixedSentiment {
        async fn classify(&self, _text: &str, _title: &str) -> Result<Signal, CollaboratorError> {
            tokio::time::sleep(self.delay).await;
            Ok(sentiment_flag())
        }

        async fn classify_deep(&self, _text: &str, _title: &str) -> Result<Vec<Signal>, CollaboratorError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![deep_flag()])
        }
    }

    pub(super) struct FixedResearch(pub(super) CompanyResearch);

    #[async_trait]
    impl CompanyResearcher for FixedResearch {
        async fn research(&self, _company: &str) -> Result<CompanyResearch, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    /// Upstream answered with an error status.
    pub(super) struct Failing;

    fn unavailable() -> CollaboratorError {
        CollaboratorError::Status {
            service: "fake",
            status: 503,
        }
    }

    #[async_trait]
    impl CareersParity for Failing {
        async fn check(&self, _company: &str, _title: &str) -> Result<Signal, CollaboratorError> {
            Err(unavailable())
        }
    }

    #[async_trait]
    impl CompanyResearcher for Failing {
        async fn research(&self, _company: &str) -> Result<CompanyResearch, CollaboratorError> {
            Err(unavailable())
        }
    }

    /// Never answers inside any reasonable timeout.
    pub(super) struct Stalled;

    #[async_trait]
    impl FinancialHealth for Stalled {
        async fn check(&self, _company: &str) -> Result<Signal, CollaboratorError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(financial_flag())
        }
    }

    pub(super) struct Panicking;

    #[async_trait]
    impl SentimentClassifier for Panicking {
        async fn classify(&self, _text: &str, _title: &str) -> Result<Signal, CollaboratorError> {
            panic!("classifier exploded")
        }

        async fn classify_deep(&self, _text: &str, _title: &str) -> Result<Vec<Signal>, CollaboratorError> {
            panic!("deep classifier exploded")
        }
    }

    pub(super) struct FixedScraper(pub(super) JobMetadata);

    #[async_trait]
    impl JobScraper for FixedScraper {
        async fn scrape(&self, _url: &str) -> Result<JobMetadata, ScrapeError> {
            Ok(self.0.clone())
        }
    }

    pub(super) struct BlockedScraper;

    #[async_trait]
    impl JobScraper for BlockedScraper {
        async fn scrape(&self, _url: &str) -> Result<JobMetadata, ScrapeError> {
            Err(ScrapeError::Status(999))
        }
    }

    pub(super) fn healthy_collaborators(parity_delay: Duration, sentiment_delay: Duration) -> Collaborators {
        Collaborators {
            parity: Fixed::after(parity_flag(), parity_delay),
            financial: Fixed::now(financial_flag()),
            sentiment: Arc::new(FixedSentiment {
                delay: sentiment_delay,
            }),
            research: Arc::new(FixedResearch(CompanyResearch {
                article_count: Some(14),
                has_controversy: false,
                controversy_headline: String::new(),
            })),
        }
    }

    pub(super) fn analyzer(collaborators: Collaborators, scraper: Arc<dyn JobScraper>) -> GhostJobAnalyzer {
        GhostJobAnalyzer::new(ScoringConfig::default(), collaborators, scraper)
            .with_timeout(Duration::from_millis(200))
    }

    pub(super) async fn read_json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read response body");
        serde_json::from_slice(&bytes).expect("response is json")
    }
}

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::*;
use phantasm::collaborators::Collaborators;
use phantasm::domain::{CompanyResearch, FlagType, ScoreLabel, Severity};
use phantasm::orchestrator::SCRAPE_FAILED_TITLE;
use phantasm::analysis_router;

#[tokio::test]
async fn collaborator_flags_lead_the_result_in_canonical_order() {
    let analyzer = analyzer(
        healthy_collaborators(Duration::ZERO, Duration::ZERO),
        Arc::new(BlockedScraper),
    );

    let result = analyzer.analyze(metadata(), JOB_URL).await;

    let messages: Vec<&str> = result.red_flags.iter().map(|flag| flag.message.as_str()).collect();
    assert_eq!(messages[0], "Not found on company careers page");
    assert_eq!(messages[1], "Recent news: Acme Robotics announces layoffs");
    assert_eq!(messages[2], "Description reads as a template");
    assert_eq!(
        messages.last().copied(),
        Some("AI detected: responsibilities never name a deliverable")
    );
    assert!(result.ghost_score.score >= 78);
    assert_eq!(result.ghost_score.label, ScoreLabel::Ghost);
    assert_eq!(result.job_url, JOB_URL);
    assert_eq!(result.company_name, "Acme Robotics");
}

#[tokio::test]
async fn flag_order_does_not_depend_on_completion_order() {
    let slow_parity = analyzer(
        healthy_collaborators(Duration::from_millis(60), Duration::ZERO),
        Arc::new(BlockedScraper),
    );
    let slow_sentiment = analyzer(
        healthy_collaborators(Duration::ZERO, Duration::from_millis(60)),
        Arc::new(BlockedScraper),
    );

    let first = slow_parity.analyze(metadata(), JOB_URL).await;
    let second = slow_sentiment.analyze(metadata(), JOB_URL).await;

    assert_eq!(first.red_flags, second.red_flags);
    assert_eq!(first.ghost_score, second.ghost_score);
}

#[tokio::test]
async fn failing_stalled_and_panicking_collaborators_degrade_to_neutral() {
    let baseline = analyzer(Collaborators::disabled(), Arc::new(BlockedScraper))
        .analyze(metadata(), JOB_URL)
        .await;

    let hostile = Collaborators {
        parity: Arc::new(Failing),
        financial: Arc::new(Stalled),
        sentiment: Arc::new(Panicking),
        research: Arc::new(Failing),
    };
    let result = analyzer(hostile, Arc::new(BlockedScraper))
        .analyze(metadata(), JOB_URL)
        .await;

    assert_eq!(result.red_flags, baseline.red_flags);
    assert_eq!(result.ghost_score, baseline.ghost_score);
    assert!(result
        .red_flags
        .iter()
        .all(|flag| !matches!(flag.kind, FlagType::Parity | FlagType::Financial)));
}

#[tokio::test]
async fn one_failing_collaborator_leaves_the_others_intact() {
    let mut collaborators = healthy_collaborators(Duration::ZERO, Duration::ZERO);
    collaborators.parity = Arc::new(Failing);

    let result = analyzer(collaborators, Arc::new(BlockedScraper))
        .analyze(metadata(), JOB_URL)
        .await;

    assert!(!result
        .red_flags
        .iter()
        .any(|flag| flag.message == "Not found on company careers page"));
    assert_eq!(result.red_flags[0].message, "Recent news: Acme Robotics announces layoffs");
    assert_eq!(result.red_flags[1].message, "Description reads as a template");
}

#[tokio::test]
async fn zero_coverage_flags_presence_but_unknown_research_does_not() {
    let mut zero = Collaborators::disabled();
    zero.research = Arc::new(FixedResearch(CompanyResearch {
        article_count: Some(0),
        has_controversy: false,
        controversy_headline: String::new(),
    }));
    let mut unknown = Collaborators::disabled();
    unknown.research = Arc::new(Failing);

    let zero = analyzer(zero, Arc::new(BlockedScraper))
        .analyze(metadata(), JOB_URL)
        .await;
    let unknown = analyzer(unknown, Arc::new(BlockedScraper))
        .analyze(metadata(), JOB_URL)
        .await;

    let no_coverage = |flag: &&phantasm::RedFlag| flag.message.starts_with("No news coverage found");
    assert_eq!(zero.red_flags.iter().filter(no_coverage).count(), 1);
    assert_eq!(unknown.red_flags.iter().filter(no_coverage).count(), 0);
}

#[tokio::test]
async fn scrape_failure_yields_the_scrape_failed_result() {
    let result = analyzer(Collaborators::disabled(), Arc::new(BlockedScraper))
        .analyze_url(JOB_URL)
        .await;

    assert_eq!(result.ghost_score.score, 0);
    assert_eq!(result.ghost_score.label, ScoreLabel::Safe);
    assert_eq!(result.company_name, "");
    assert_eq!(result.job_title, SCRAPE_FAILED_TITLE);
    assert_eq!(result.red_flags.len(), 1);
    assert_eq!(result.red_flags[0].severity, Severity::Low);
    assert_eq!(
        result.red_flags[0].message,
        "Scrape failed: Failed to fetch page (HTTP 999)"
    );
}

#[tokio::test]
async fn analyze_url_scores_the_scraped_posting() {
    let result = analyzer(Collaborators::disabled(), Arc::new(FixedScraper(metadata())))
        .analyze_url(JOB_URL)
        .await;

    assert_eq!(result.job_title, "Backend Engineer");
    assert_eq!(result.company_name, "Acme Robotics");
}

#[tokio::test]
async fn manual_analyze_route_answers_with_a_result() {
    let app = analysis_router(Arc::new(analyzer(
        healthy_collaborators(Duration::ZERO, Duration::ZERO),
        Arc::new(BlockedScraper),
    )));

    let payload = json!({
        "url": JOB_URL,
        "title": "Backend Engineer",
        "company": "Acme Robotics",
        "rawText": metadata().raw_text,
        "platform": "monster"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/web/manual-analyze")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["jobUrl"], JOB_URL);
    assert_eq!(body["companyName"], "Acme Robotics");
    assert_eq!(body["ghostScore"]["label"], "ghost");
    assert_eq!(body["ghostScore"]["color"], "red");
    assert_eq!(body["redFlags"][0]["type"], "parity");
    assert!(body["analyzedAt"].is_string());
}

#[tokio::test]
async fn scrape_and_analyze_route_reports_scrape_failure_with_ok_status() {
    let app = analysis_router(Arc::new(analyzer(
        Collaborators::disabled(),
        Arc::new(BlockedScraper),
    )));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/web/scrape-and-analyze")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "url": JOB_URL }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["jobTitle"], SCRAPE_FAILED_TITLE);
    assert_eq!(body["companyName"], "");
    assert_eq!(body["ghostScore"]["score"], 0);
}

#[tokio::test]
async fn analyze_route_prefers_supplied_metadata() {
    let app = analysis_router(Arc::new(analyzer(
        Collaborators::disabled(),
        Arc::new(BlockedScraper),
    )));

    let payload = json!({ "url": JOB_URL, "metadata": metadata() });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["jobTitle"], "Backend Engineer");
    assert_ne!(body["jobTitle"], SCRAPE_FAILED_TITLE);
}
