//! Ghost-job scoring: text heuristics, company legitimacy rules, external evidence and a
//! bounded 0-100 verdict.

pub mod analysis;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod router;
pub mod scoring;
pub mod scrape;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{
    AnalysisResult, CompanyResearch, FlagType, GhostScore, JobMetadata, Platform, RedFlag,
    ScoreColor, ScoreLabel, Severity, Signal,
};
pub use orchestrator::GhostJobAnalyzer;
pub use router::analysis_router;
