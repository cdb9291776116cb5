use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::{FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::AgeWeights;

/// Score a posting by how long it has been listed. Missing or unreadable dates are neutral.
pub fn age_signal(posted_date: Option<&str>, now: DateTime<Utc>, weights: &AgeWeights) -> Signal {
    let Some(posted) = posted_date.and_then(parse_posted_date) else {
        return Signal::neutral();
    };

    let days_old = (now - posted).num_days();

    if days_old > weights.stale_after_days {
        Signal::flagged(
            weights.stale,
            RedFlag::new(
                FlagType::Age,
                Severity::High,
                format!("Posted {days_old} days ago; stale listings often indicate ghost jobs"),
            ),
        )
    } else if days_old > weights.aging_after_days {
        Signal::flagged(
            weights.aging,
            RedFlag::new(
                FlagType::Age,
                Severity::Medium,
                format!("Posted {days_old} days ago; listing is aging"),
            ),
        )
    } else {
        Signal::neutral()
    }
}

/// RFC 3339, naive ISO date-time (read as UTC), or a bare calendar date.
pub fn parse_posted_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
