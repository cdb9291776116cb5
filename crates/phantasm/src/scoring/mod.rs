//! Score aggregation and the tunable weights behind every signal.

mod aggregate;
pub mod config;

pub use aggregate::{Aggregator, SignalSet};
pub use config::{
    AgeWeights, CollaboratorWeights, CompanyWeights, HeuristicWeights, ScoreThresholds, MAX_SCORE,
    ScoringConfig,
};
