//! Posting text heuristics. Pure pattern matching and text statistics; no network access.

mod compensation;
mod phrases;

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use super::rules::{compile, count_patterns, truncate_chars, word_count, CountRule, Tier};
use crate::domain::{FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::{half, HeuristicWeights};
use compensation::CompensationRules;
use phrases::{
    APPLICATION_RED_FLAGS, BOILERPLATE, EXPERIENCE_PATTERN, JUNIOR_TITLE_KEYWORDS,
    KITCHEN_SINK_TECHS, PLACEHOLDER_PATTERNS, REPOST_SIGNALS, SPECIFICITY_PATTERNS,
    URGENCY_PHRASES, VAGUE_TITLE_PATTERNS,
};

/// Stateless text analyzer; the compiled rule tables are built once and shared.
pub struct HeuristicAnalyzer {
    weights: HeuristicWeights,
    vague_titles: Vec<Regex>,
    boilerplate: CountRule,
    specificity: Vec<Regex>,
    kitchen_sink: CountRule,
    repost: CountRule,
    experience: Regex,
    compensation: CompensationRules,
    application: CountRule,
    urgency: CountRule,
    placeholders: Vec<Regex>,
}

impl HeuristicAnalyzer {
    pub fn new(weights: HeuristicWeights) -> Self {
        let boilerplate = CountRule {
            name: "boilerplate",
            kind: FlagType::Sentiment,
            phrases: BOILERPLATE,
            tiers: vec![
                Tier {
                    min_hits: 6,
                    delta: weights.boilerplate_heavy,
                    severity: Severity::High,
                    message: |hits| {
                        format!("Job description contains {hits} generic buzzword phrases; likely a template")
                    },
                },
                Tier {
                    min_hits: 3,
                    delta: half(weights.boilerplate_heavy),
                    severity: Severity::Medium,
                    message: |hits| format!("Job description contains {hits} common buzzword phrases"),
                },
            ],
        };

        let kitchen_sink = CountRule {
            name: "kitchen_sink",
            kind: FlagType::Sentiment,
            phrases: KITCHEN_SINK_TECHS,
            tiers: vec![
                Tier {
                    min_hits: 12,
                    delta: weights.kitchen_sink,
                    severity: Severity::High,
                    message: |hits| {
                        format!("Lists {hits} distinct technologies; unrealistic requirements suggest a placeholder listing")
                    },
                },
                Tier {
                    min_hits: 8,
                    delta: half(weights.kitchen_sink),
                    severity: Severity::Medium,
                    message: |hits| format!("Lists {hits} distinct technologies; unusually broad requirements"),
                },
            ],
        };

        let repost = CountRule {
            name: "repost",
            kind: FlagType::Age,
            phrases: REPOST_SIGNALS,
            tiers: vec![Tier {
                min_hits: 1,
                delta: weights.repost_signals,
                severity: Severity::High,
                message: |_| {
                    "Posting contains language suggesting it is recycled, evergreen, or a talent pipeline"
                        .to_string()
                },
            }],
        };

        let application = CountRule {
            name: "application_process",
            kind: FlagType::Structure,
            phrases: APPLICATION_RED_FLAGS,
            tiers: vec![Tier {
                min_hits: 2,
                delta: weights.application_red_flag,
                severity: Severity::Medium,
                message: |_| {
                    "Application process has multiple red flags (external redirects, email-only, no-contact policies)"
                        .to_string()
                },
            }],
        };

        let urgency = CountRule {
            name: "urgency",
            kind: FlagType::Structure,
            phrases: URGENCY_PHRASES,
            tiers: vec![Tier {
                min_hits: 2,
                delta: weights.urgency_manipulation,
                severity: Severity::Medium,
                message: |hits| {
                    format!("Uses {hits} urgency phrases to pressure quick applications; legitimate roles rarely need high-pressure tactics")
                },
            }],
        };

        Self {
            vague_titles: compile(VAGUE_TITLE_PATTERNS),
            boilerplate,
            specificity: compile(SPECIFICITY_PATTERNS),
            kitchen_sink,
            repost,
            experience: Regex::new(EXPERIENCE_PATTERN).expect("experience pattern compiles"),
            compensation: CompensationRules::new(),
            application,
            urgency,
            placeholders: compile(PLACEHOLDER_PATTERNS),
            weights,
        }
    }

    /// Run every text rule in table order. Empty text yields no signals.
    pub fn analyze(&self, raw_text: &str, title: &str) -> Vec<Signal> {
        let mut signals = Vec::new();
        if raw_text.is_empty() {
            return signals;
        }

        let lowered = raw_text.to_lowercase();
        let words = word_count(raw_text);

        if self.is_vague_title(title) {
            debug!(title, "vague title detected");
            signals.push(Signal::flagged(
                self.weights.vague_title,
                RedFlag::new(
                    FlagType::Sentiment,
                    Severity::Medium,
                    format!("Job title '{title}' is vague or suggests a talent pool, not a real opening"),
                ),
            ));
        }

        signals.extend(self.boilerplate.evaluate(&lowered));

        if words > 100 && count_patterns(&lowered, &self.specificity) < 2 {
            debug!(words, "no concrete specifics found");
            signals.push(Signal::flagged(
                self.weights.no_specifics,
                RedFlag::new(
                    FlagType::Sentiment,
                    Severity::Medium,
                    "No concrete details found: no team size, metrics, projects, or specific deliverables mentioned",
                ),
            ));
        }

        signals.extend(self.kitchen_sink.evaluate(&lowered));
        signals.extend(self.repost.evaluate(&lowered));

        if words > 0 && words < 80 {
            debug!(words, "very short description");
            signals.push(Signal::flagged(
                self.weights.short_description,
                RedFlag::new(
                    FlagType::Sentiment,
                    Severity::Medium,
                    format!("Job description is only {words} words; too brief to be a real, detailed listing"),
                ),
            ));
        }

        signals.extend(self.experience_bar(&lowered, title));
        signals.extend(
            self.compensation
                .evaluate(raw_text, &lowered, self.weights.salary_red_flag),
        );
        signals.extend(self.application.evaluate(&lowered));
        signals.extend(self.urgency.evaluate(&lowered));
        signals.extend(self.copy_paste_artifacts(raw_text, &lowered));

        signals
    }

    fn is_vague_title(&self, title: &str) -> bool {
        let lowered = title.trim().to_lowercase();
        self.vague_titles
            .iter()
            .any(|pattern| pattern.is_match(&lowered))
    }

    fn experience_bar(&self, lowered: &str, title: &str) -> Option<Signal> {
        let max_years = self
            .experience
            .captures_iter(lowered)
            .filter_map(|captures| captures.get(1)?.as_str().parse::<u32>().ok())
            .max()?;

        let title = title.to_lowercase();
        let junior_title = JUNIOR_TITLE_KEYWORDS
            .iter()
            .any(|keyword| title.contains(keyword));

        if max_years >= 10 && junior_title {
            Some(Signal::flagged(
                self.weights.excessive_requirements,
                RedFlag::new(
                    FlagType::Structure,
                    Severity::High,
                    format!("Requires {max_years}+ years experience for a junior/mid-level title; contradictory requirements"),
                ),
            ))
        } else if max_years >= 15 {
            Some(Signal::flagged(
                self.weights.excessive_requirements,
                RedFlag::new(
                    FlagType::Structure,
                    Severity::Medium,
                    format!("Requires {max_years}+ years experience; an extremely high bar may indicate a pre-selected candidate"),
                ),
            ))
        } else {
            None
        }
    }

    /// Placeholders score 2 each and every repeated paragraph scores 1.
    fn copy_paste_artifacts(&self, raw_text: &str, lowered: &str) -> Option<Signal> {
        let mut points = 2 * count_patterns(lowered, &self.placeholders);

        let mut seen = HashSet::new();
        for paragraph in raw_text.split("\n\n").map(str::trim) {
            if paragraph.chars().count() <= 50 {
                continue;
            }
            let key = truncate_chars(&paragraph.to_lowercase(), 100).to_string();
            if !seen.insert(key) {
                points += 1;
            }
        }

        if points < 2 {
            return None;
        }

        debug!(points, "copy-paste artifacts detected");
        Some(Signal::flagged(
            self.weights.copy_paste_artifacts,
            RedFlag::new(
                FlagType::Sentiment,
                Severity::High,
                "Job description contains copy-paste artifacts (placeholder text, duplicate sections); likely recycled from a template",
            ),
        ))
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new(HeuristicWeights::default())
    }
}
