use regex::Regex;

use crate::domain::{FlagType, RedFlag, Severity, Signal};

/// Compile a static pattern table. Tables are constants, so a failure is a programming error.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static rule pattern compiles"))
        .collect()
}

pub(crate) fn count_phrases(lowered: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .count()
}

pub(crate) fn count_patterns(lowered: &str, patterns: &[Regex]) -> usize {
    patterns
        .iter()
        .filter(|pattern| pattern.is_match(lowered))
        .count()
}

pub(crate) fn any_pattern(lowered: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(lowered))
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// One threshold step of a counting rule.
pub(crate) struct Tier {
    pub min_hits: usize,
    pub delta: i32,
    pub severity: Severity,
    pub message: fn(usize) -> String,
}

/// Data-driven rule: count phrase hits, then take the first tier the count reaches.
///
/// Tiers are ordered strongest first, so a rule fires at most once per evaluation.
pub(crate) struct CountRule {
    pub name: &'static str,
    pub kind: FlagType,
    pub phrases: &'static [&'static str],
    pub tiers: Vec<Tier>,
}

impl CountRule {
    pub(crate) fn evaluate(&self, lowered: &str) -> Option<Signal> {
        let hits = count_phrases(lowered, self.phrases);
        let tier = self.tiers.iter().find(|tier| hits >= tier.min_hits)?;

        tracing::debug!(rule = self.name, hits, delta = tier.delta, "rule fired");

        Some(Signal::flagged(
            tier.delta,
            RedFlag::new(self.kind, tier.severity, (tier.message)(hits)),
        ))
    }
}

/// Truncate on a character boundary.
pub(crate) fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}
