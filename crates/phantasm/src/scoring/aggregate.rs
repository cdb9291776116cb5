use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{ScoreThresholds, ScoringConfig, MAX_SCORE};
use crate::analysis::age_signal;
use crate::domain::{AnalysisResult, GhostScore, JobMetadata, ScoreColor, ScoreLabel, Signal};

/// Everything the producers gathered for one posting, one slot per producer.
///
/// Flags are read back slot by slot, so the order in which producers finished never leaks
/// into the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub parity: Signal,
    pub financial: Signal,
    pub sentiment: Signal,
    pub heuristics: Vec<Signal>,
    pub company: Vec<Signal>,
    pub deep: Vec<Signal>,
}

impl SignalSet {
    fn into_canonical(self, age: Signal) -> impl Iterator<Item = Signal> {
        [age, self.parity, self.financial, self.sentiment]
            .into_iter()
            .chain(self.heuristics)
            .chain(self.company)
            .chain(self.deep)
    }
}

/// Stateless scorer that folds a [`SignalSet`] into the terminal verdict.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: ScoringConfig,
}

impl Aggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(&self, metadata: &JobMetadata, job_url: &str, signals: SignalSet) -> AnalysisResult {
        self.aggregate_at(metadata, job_url, signals, Utc::now())
    }

    /// Deterministic for a fixed `now`: the posting age is the only time-dependent input.
    pub fn aggregate_at(
        &self,
        metadata: &JobMetadata,
        job_url: &str,
        signals: SignalSet,
        now: DateTime<Utc>,
    ) -> AnalysisResult {
        let age = age_signal(metadata.posted_date.as_deref(), now, &self.config.age);

        let mut total: i64 = 0;
        let mut red_flags = Vec::new();
        for signal in signals.into_canonical(age) {
            total += i64::from(signal.delta);
            red_flags.extend(signal.flag);
        }

        let ghost_score = self.classify(total);
        debug!(raw = total, score = ghost_score.score, flags = red_flags.len(), "signals aggregated");

        AnalysisResult {
            job_url: job_url.to_string(),
            ghost_score,
            red_flags,
            analyzed_at: now,
            company_name: metadata.company.clone(),
            job_title: metadata.title.clone(),
        }
    }

    /// Clamp a raw sum into `[0, MAX_SCORE]` and derive label and color from the thresholds.
    pub fn classify(&self, raw: i64) -> GhostScore {
        let ScoreThresholds { ghost, suspicious } = self.config.thresholds;

        let score = raw.clamp(0, i64::from(MAX_SCORE)) as u8;

        if score >= ghost {
            GhostScore::new(score, ScoreLabel::Ghost, ScoreColor::Red)
        } else if score >= suspicious {
            GhostScore::new(score, ScoreLabel::Suspicious, ScoreColor::Yellow)
        } else {
            GhostScore::new(score, ScoreLabel::Safe, ScoreColor::Green)
        }
    }
}
