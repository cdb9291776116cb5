use serde::{Deserialize, Serialize};

/// Every tunable delta and threshold used by the analyzers and the aggregator.
///
/// Deserializing a partial document keeps the defaults for anything left out, so a
/// deployment can override a single weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub heuristics: HeuristicWeights,
    pub company: CompanyWeights,
    pub age: AgeWeights,
    pub collaborators: CollaboratorWeights,
    pub thresholds: ScoreThresholds,
}

/// Text-rule deltas. The weaker tier of a two-tier rule is half its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub vague_title: i32,
    pub boilerplate_heavy: i32,
    pub no_specifics: i32,
    pub excessive_requirements: i32,
    pub repost_signals: i32,
    pub kitchen_sink: i32,
    pub short_description: i32,
    pub salary_red_flag: i32,
    pub application_red_flag: i32,
    pub urgency_manipulation: i32,
    pub copy_paste_artifacts: i32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            vague_title: 10,
            boilerplate_heavy: 15,
            no_specifics: 12,
            excessive_requirements: 10,
            repost_signals: 15,
            kitchen_sink: 12,
            short_description: 10,
            salary_red_flag: 8,
            application_red_flag: 10,
            urgency_manipulation: 8,
            copy_paste_artifacts: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyWeights {
    pub no_web_presence: i32,
    pub staffing_agency: i32,
    /// Shared by the freelance-reliance rule and the controversy rule.
    pub controversial_model: i32,
    pub tiny_company_big_hire: i32,
    pub high_turnover: i32,
    pub contract_to_hire: i32,
}

impl Default for CompanyWeights {
    fn default() -> Self {
        Self {
            no_web_presence: 15,
            staffing_agency: 12,
            controversial_model: 10,
            tiny_company_big_hire: 8,
            high_turnover: 10,
            contract_to_hire: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeWeights {
    pub stale_after_days: i64,
    pub stale: i32,
    pub aging_after_days: i64,
    pub aging: i32,
}

impl Default for AgeWeights {
    fn default() -> Self {
        Self {
            stale_after_days: 60,
            stale: 30,
            aging_after_days: 30,
            aging: 15,
        }
    }
}

/// Deltas the bundled collaborator clients translate their findings into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorWeights {
    pub parity_fail: i32,
    pub parity_pass: i32,
    pub financial_layoffs: i32,
    pub sentiment_max: i32,
    pub sentiment_medium: i32,
    pub legitimacy_very_low: i32,
    pub legitimacy_low: i32,
    pub legitimacy_medium: i32,
    pub model_flag_primary: i32,
    pub model_flag_secondary: i32,
}

impl Default for CollaboratorWeights {
    fn default() -> Self {
        Self {
            parity_fail: 25,
            parity_pass: -10,
            financial_layoffs: 25,
            sentiment_max: 20,
            sentiment_medium: 10,
            legitimacy_very_low: 20,
            legitimacy_low: 14,
            legitimacy_medium: 8,
            model_flag_primary: 8,
            model_flag_secondary: 5,
        }
    }
}

/// Upper bound of every ghost score. Not tunable.
pub const MAX_SCORE: u8 = 100;

/// Label boundaries. A score at or above `ghost` is a ghost job; at or above `suspicious`
/// it is suspicious.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    pub ghost: u8,
    pub suspicious: u8,
}

impl ScoreThresholds {
    /// Boundaries must satisfy `suspicious <= ghost <= MAX_SCORE`.
    pub fn is_ordered(&self) -> bool {
        self.suspicious <= self.ghost && self.ghost <= MAX_SCORE
    }
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            ghost: 70,
            suspicious: 40,
        }
    }
}

pub(crate) fn half(weight: i32) -> i32 {
    weight.div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"heuristics": {"vague_title": 3}, "thresholds": {"ghost": 80}}"#)
                .expect("partial config parses");

        assert_eq!(config.heuristics.vague_title, 3);
        assert_eq!(config.heuristics.boilerplate_heavy, 15);
        assert_eq!(config.thresholds.ghost, 80);
        assert_eq!(config.thresholds.suspicious, 40);
        assert_eq!(config.company, CompanyWeights::default());
    }

    #[test]
    fn threshold_ordering() {
        assert!(ScoreThresholds::default().is_ordered());
        assert!(!ScoreThresholds { ghost: 30, suspicious: 40 }.is_ordered());
        assert!(!ScoreThresholds { ghost: 120, suspicious: 40 }.is_ordered());
        assert!(ScoreThresholds { ghost: 100, suspicious: 100 }.is_ordered());
    }

    #[test]
    fn half_rounds_down_like_floor_division() {
        assert_eq!(half(15), 7);
        assert_eq!(half(8), 4);
        assert_eq!(half(-5), -3);
    }
}
