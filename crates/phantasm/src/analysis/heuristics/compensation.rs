use regex::Regex;

use super::phrases::{DOE_PATTERNS, DOLLAR_FIGURE_PATTERN, SALARY_RANGE_PATTERN};
use crate::analysis::rules::{any_pattern, compile};
use crate::domain::{FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::half;

/// Compensation transparency and realism checks.
pub(crate) struct CompensationRules {
    salary_range: Regex,
    dollar_figure: Regex,
    doe: Vec<Regex>,
}

impl CompensationRules {
    pub(crate) fn new() -> Self {
        Self {
            salary_range: Regex::new(SALARY_RANGE_PATTERN).expect("salary pattern compiles"),
            dollar_figure: Regex::new(DOLLAR_FIGURE_PATTERN).expect("dollar pattern compiles"),
            doe: compile(DOE_PATTERNS),
        }
    }

    pub(crate) fn evaluate(&self, raw_text: &str, lowered: &str, weight: i32) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some(signal) = self.range_spread(raw_text, weight) {
            signals.push(signal);
        }

        let has_figures = self.dollar_figure.is_match(raw_text);

        if !has_figures
            && lowered.contains("competitive")
            && (lowered.contains("salary") || lowered.contains("compensation"))
        {
            signals.push(Signal::flagged(
                half(weight),
                RedFlag::new(
                    FlagType::Compensation,
                    Severity::Low,
                    "Claims 'competitive salary' but provides no actual numbers; lack of pay transparency is a red flag",
                ),
            ));
        }

        if !has_figures && any_pattern(lowered, &self.doe) {
            signals.push(Signal::flagged(
                half(weight),
                RedFlag::new(
                    FlagType::Compensation,
                    Severity::Low,
                    "Compensation listed as 'depends on experience' with no range, common in ghost postings that aren't budgeted",
                ),
            ));
        }

        signals
    }

    /// The first range spreading 2x or more decides the tier; narrower ranges are skipped.
    fn range_spread(&self, raw_text: &str, weight: i32) -> Option<Signal> {
        for captures in self.salary_range.captures_iter(raw_text) {
            let (Some(low), Some(high)) = (
                captures.get(1).and_then(|m| parse_amount(m.as_str())),
                captures.get(2).and_then(|m| parse_amount(m.as_str())),
            ) else {
                continue;
            };

            if low == 0 || high == 0 {
                continue;
            }

            let ratio = high as f64 / low as f64;
            if ratio >= 3.0 {
                return Some(Signal::flagged(
                    weight,
                    RedFlag::new(
                        FlagType::Compensation,
                        Severity::Medium,
                        format!(
                            "Salary range is extremely wide (${}-${}, a {ratio:.1}x spread); vague compensation suggests the role is not well-defined",
                            thousands(low),
                            thousands(high)
                        ),
                    ),
                ));
            }
            if ratio >= 2.0 {
                return Some(Signal::flagged(
                    half(weight),
                    RedFlag::new(
                        FlagType::Compensation,
                        Severity::Low,
                        format!(
                            "Salary range is broad (${}-${}); the role scope may be unclear",
                            thousands(low),
                            thousands(high)
                        ),
                    ),
                ));
            }
        }

        None
    }
}

/// Amounts under 1000 are written in thousands ("50k", "$50-$90").
fn parse_amount(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    let value: u64 = digits.parse().ok()?;
    Some(if value < 1000 { value * 1000 } else { value })
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
