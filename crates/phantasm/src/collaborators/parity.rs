use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info};

use super::{CareersParity, CollaboratorError};
use crate::domain::{FlagType, RedFlag, Severity, Signal};
use crate::scrape::extract::visible_text;
use crate::scrape::BROWSER_USER_AGENT;

const CAREERS_PATHS: &[&str] = &["/careers", "/jobs", "/career", "/join-us", "/open-positions"];
const MATCH_THRESHOLD: f64 = 0.5;

/// Fetches `https://www.<company>.com/<careers path>` and checks the title words appear on it.
pub struct CareersPageChecker {
    client: Client,
    pass_delta: i32,
    fail_delta: i32,
    word: Regex,
}

impl CareersPageChecker {
    pub fn new(pass_delta: i32, fail_delta: i32, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            pass_delta,
            fail_delta,
            word: Regex::new(r"[a-zA-Z]+").expect("word pattern compiles"),
        })
    }

    fn significant_words(&self, title: &str) -> Vec<String> {
        let lowered = title.to_lowercase();
        self.word
            .find_iter(&lowered)
            .map(|found| found.as_str().to_string())
            .filter(|word| word.len() > 3)
            .collect()
    }

    async fn careers_page_text(&self, domain: &str) -> Option<String> {
        for path in CAREERS_PATHS {
            let url = format!("https://www.{domain}{path}");
            let response = match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    debug!(url = %url, status = response.status().as_u16(), "careers path rejected");
                    continue;
                }
                Err(error) => {
                    debug!(url = %url, %error, "careers path unreachable");
                    continue;
                }
            };

            if let Ok(html) = response.text().await {
                return Some(visible_text(&html).to_lowercase());
            }
        }
        None
    }

    fn verdict(&self, ratio: f64) -> Signal {
        if ratio >= MATCH_THRESHOLD {
            Signal::silent(self.pass_delta)
        } else {
            Signal::flagged(
                self.fail_delta,
                RedFlag::new(
                    FlagType::Parity,
                    Severity::High,
                    "Not found on company careers page",
                ),
            )
        }
    }
}

/// Best-effort domain guess: "Acme Corp" becomes "acmecorp.com".
pub(crate) fn company_domain(company: &str) -> String {
    let cleaned: String = company
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    format!("{cleaned}.com")
}

pub(crate) fn match_ratio(words: &[String], page_text: &str) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let matches = words
        .iter()
        .filter(|word| page_text.contains(word.as_str()))
        .count();
    matches as f64 / words.len() as f64
}

#[async_trait]
impl CareersParity for CareersPageChecker {
    async fn check(&self, company: &str, title: &str) -> Result<Signal, CollaboratorError> {
        if company.is_empty() || title.is_empty() {
            return Ok(Signal::neutral());
        }

        let words = self.significant_words(title);
        if words.is_empty() {
            return Ok(Signal::neutral());
        }

        let domain = company_domain(company);
        let Some(page_text) = self.careers_page_text(&domain).await else {
            info!(company, domain = %domain, "careers page unreachable");
            return Ok(Signal::neutral());
        };

        let ratio = match_ratio(&words, &page_text);
        info!(company, title, ratio, "careers page cross-check");
        Ok(self.verdict(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> CareersPageChecker {
        CareersPageChecker::new(-10, 25, Duration::from_secs(1)).expect("client builds")
    }

    #[test]
    fn domain_keeps_only_alphanumerics() {
        assert_eq!(company_domain("Acme Corp"), "acmecorp.com");
        assert_eq!(company_domain("AT&T Inc."), "attinc.com");
    }

    #[test]
    fn significant_words_skip_short_tokens() {
        let words = checker().significant_words("Sr. Data Engineer, ML/AI");
        assert_eq!(words, vec!["data".to_string(), "engineer".to_string()]);
    }

    #[test]
    fn half_the_words_is_enough_to_pass() {
        let words = vec!["data".to_string(), "engineer".to_string()];
        assert_eq!(match_ratio(&words, "we are hiring a platform engineer"), 0.5);
        assert_eq!(match_ratio(&words, "no openings"), 0.0);
        assert_eq!(match_ratio(&[], "anything"), 0.0);
    }

    #[test]
    fn verdict_rewards_matches_and_flags_misses() {
        let checker = checker();

        let pass = checker.verdict(0.5);
        assert_eq!(pass.delta, -10);
        assert!(pass.flag.is_none());

        let miss = checker.verdict(0.25);
        assert_eq!(miss.delta, 25);
        let flag = miss.flag.expect("parity flag");
        assert_eq!(flag.kind, FlagType::Parity);
        assert_eq!(flag.severity, Severity::High);
    }

    #[tokio::test]
    async fn missing_inputs_are_neutral_without_network() {
        let checker = checker();
        assert!(checker.check("", "Engineer").await.expect("neutral").is_neutral());
        assert!(checker.check("Acme", "").await.expect("neutral").is_neutral());
        assert!(checker.check("Acme", "QA Sr").await.expect("neutral").is_neutral());
    }
}
