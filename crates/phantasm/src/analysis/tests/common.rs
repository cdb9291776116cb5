use crate::analysis::{CompanyAnalyzer, HeuristicAnalyzer};
use crate::domain::{CompanyResearch, FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::{CompanyWeights, HeuristicWeights};

pub(super) fn heuristics() -> HeuristicAnalyzer {
    HeuristicAnalyzer::new(HeuristicWeights::default())
}

pub(super) fn company() -> CompanyAnalyzer {
    CompanyAnalyzer::new(CompanyWeights::default())
}

/// `count` distinct filler tokens that match no rule table.
pub(super) fn filler_words(count: usize) -> String {
    (0..count)
        .map(|index| format!("w{index}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn boilerplate_posting() -> String {
    [
        "Join our dynamic team in a fast-paced environment.",
        "We want a self-starter and team player who is detail-oriented.",
        "You will wear many hats and hit the ground running.",
    ]
    .join(" ")
}

pub(super) fn specific_posting() -> String {
    [
        "You will join a team of 6 engineers reporting to the VP of Engineering.",
        "We are a Series B company with 120 employees.",
        "The role owns our billing system migration planned for Q3 and targets a 30% cost reduction.",
        "Pay is $140,000 to $165,000 plus equity.",
        "We track work in Linear and hold a quarterly review with every engineer.",
        "Requires 4 years of experience with distributed systems.",
    ]
    .join("\n\n")
}

pub(super) fn known_research(article_count: u64) -> CompanyResearch {
    CompanyResearch {
        article_count: Some(article_count),
        has_controversy: false,
        controversy_headline: String::new(),
    }
}

pub(super) fn flags(signals: &[Signal]) -> Vec<&RedFlag> {
    signals.iter().filter_map(|signal| signal.flag.as_ref()).collect()
}

pub(super) fn find_flag<'a>(signals: &'a [Signal], needle: &str) -> Option<&'a Signal> {
    signals.iter().find(|signal| {
        signal
            .flag
            .as_ref()
            .is_some_and(|flag| flag.message.contains(needle))
    })
}

pub(super) fn assert_flag(signal: &Signal, delta: i32, kind: FlagType, severity: Severity) {
    assert_eq!(signal.delta, delta, "unexpected delta for {signal:?}");
    let flag = signal.flag.as_ref().expect("signal carries a flag");
    assert_eq!(flag.kind, kind);
    assert_eq!(flag.severity, severity);
}
