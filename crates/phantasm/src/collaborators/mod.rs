//! External evidence producers and the seams the orchestrator calls them through.

mod llm;
mod news;
mod parity;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{CompanyResearch, Signal};

pub use llm::{AnthropicClassifier, ModelVerdict};
pub use news::NewsApiClient;
pub use parity::CareersPageChecker;

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} returned a malformed response: {detail}")]
    Malformed { service: &'static str, detail: String },

    #[error("{producer} timed out")]
    Timeout { producer: &'static str },

    #[error("{producer} task failed: {detail}")]
    TaskFailed { producer: &'static str, detail: String },
}

/// Cross-checks a title against the employer's own careers page.
#[async_trait]
pub trait CareersParity: Send + Sync {
    async fn check(&self, company: &str, title: &str) -> Result<Signal, CollaboratorError>;
}

/// Looks for recent layoff or hiring-freeze news.
#[async_trait]
pub trait FinancialHealth: Send + Sync {
    async fn check(&self, company: &str) -> Result<Signal, CollaboratorError>;
}

/// Model-backed judgement of how templated and how genuine a description reads.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str, title: &str) -> Result<Signal, CollaboratorError>;

    async fn classify_deep(&self, text: &str, title: &str) -> Result<Vec<Signal>, CollaboratorError>;
}

#[async_trait]
pub trait CompanyResearcher: Send + Sync {
    async fn research(&self, company: &str) -> Result<CompanyResearch, CollaboratorError>;
}

/// Stand-in used when a collaborator has no credentials. Every answer is neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl CareersParity for Disabled {
    async fn check(&self, _company: &str, _title: &str) -> Result<Signal, CollaboratorError> {
        Ok(Signal::neutral())
    }
}

#[async_trait]
impl FinancialHealth for Disabled {
    async fn check(&self, _company: &str) -> Result<Signal, CollaboratorError> {
        Ok(Signal::neutral())
    }
}

#[async_trait]
impl SentimentClassifier for Disabled {
    async fn classify(&self, _text: &str, _title: &str) -> Result<Signal, CollaboratorError> {
        Ok(Signal::neutral())
    }

    async fn classify_deep(&self, _text: &str, _title: &str) -> Result<Vec<Signal>, CollaboratorError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl CompanyResearcher for Disabled {
    async fn research(&self, _company: &str) -> Result<CompanyResearch, CollaboratorError> {
        Ok(CompanyResearch::unknown())
    }
}

/// The full set of external producers one analysis fans out to.
#[derive(Clone)]
pub struct Collaborators {
    pub parity: Arc<dyn CareersParity>,
    pub financial: Arc<dyn FinancialHealth>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub research: Arc<dyn CompanyResearcher>,
}

impl Collaborators {
    pub fn disabled() -> Self {
        Self {
            parity: Arc::new(Disabled),
            financial: Arc::new(Disabled),
            sentiment: Arc::new(Disabled),
            research: Arc::new(Disabled),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::disabled()
    }
}
