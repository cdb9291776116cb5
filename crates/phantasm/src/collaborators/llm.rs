//! Anthropic Messages API client that grades a description for template use and legitimacy.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::info;

use super::{CollaboratorError, SentimentClassifier};
use crate::analysis::rules::truncate_chars;
use crate::domain::{FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::CollaboratorWeights;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const SERVICE: &str = "anthropic";
const MAX_PROMPT_CHARS: usize = 6000;
const MAX_MODEL_FLAGS: usize = 3;

const SYSTEM_PROMPT: &str = r#"You are an expert at identifying ghost job postings: jobs that companies post with no real intention of filling.

Analyze the job description and return ONLY a JSON object, with no markdown and no explanation, with these fields:

{
  "templateScore": <int 0-100>,
  "legitimacyScore": <int 0-100>,
  "redFlags": [<string>, ...],
  "reasoning": "<one sentence>"
}

templateScore: How generic/boilerplate is this JD? 100 = pure copy-paste template. 0 = highly specific custom role.

legitimacyScore: How likely is this a real, active hire? 100 = definitely real. 0 = almost certainly a ghost job.
Consider: specificity of responsibilities, realistic requirements, clear team/reporting structure, genuine business need expressed, salary transparency.

redFlags: List specific concerns you notice. Examples:
- "No specific projects or deliverables mentioned"
- "Requirements span multiple unrelated disciplines"
- "Boilerplate equal opportunity statement is longer than the actual job description"
- "Title doesn't match the described responsibilities"
- "Sounds like compliance hiring (posting for legal/visa reasons with a pre-selected candidate)"

Keep redFlags to 3 items max. Only include genuine concerns, not generic observations.
Only flag missing salary/compensation if you have searched the ENTIRE provided text and found NO dollar amounts, salary ranges, or compensation figures. If any pay information exists, do NOT include a salary-related red flag."#;

/// Structured answer the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVerdict {
    #[serde(default, deserialize_with = "lenient_score")]
    pub template_score: f64,
    #[serde(default = "full_legitimacy", deserialize_with = "lenient_score")]
    pub legitimacy_score: f64,
    #[serde(default)]
    pub red_flags: Vec<Value>,
    #[serde(default)]
    pub reasoning: String,
}

fn full_legitimacy() -> f64 {
    100.0
}

/// Models sometimes quote their numbers ("85" or "85%").
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("score {number} is out of range"))),
        Value::String(text) => {
            let digits = text.trim().trim_end_matches('%').trim_end();
            digits
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("score {text:?} is not a number")))
        }
        other => Err(D::Error::custom(format!("expected a score, got {other}"))),
    }
}

impl ModelVerdict {
    /// Parse model output, tolerating a surrounding markdown code fence.
    pub fn parse(text: &str) -> Result<Self, CollaboratorError> {
        let (fence_open, fence_close) = fences();

        let trimmed = text.trim();
        let opened = fence_open.replace(trimmed, "");
        let cleaned = fence_close.replace(&opened, "");

        serde_json::from_str(cleaned.trim()).map_err(|error| CollaboratorError::Malformed {
            service: SERVICE,
            detail: error.to_string(),
        })
    }

    pub(crate) fn template_signal(&self, weights: &CollaboratorWeights) -> Signal {
        let score = self.template_score as i64;
        if score > 80 {
            Signal::flagged(
                weights.sentiment_max,
                RedFlag::new(
                    FlagType::Sentiment,
                    Severity::High,
                    format!("AI analysis: JD is {score}% boilerplate; {}", self.reasoning),
                ),
            )
        } else if score >= 50 {
            Signal::flagged(
                weights.sentiment_medium,
                RedFlag::new(
                    FlagType::Sentiment,
                    Severity::Medium,
                    format!("AI analysis: JD is {score}% generic; {}", self.reasoning),
                ),
            )
        } else {
            Signal::neutral()
        }
    }

    pub(crate) fn deep_signals(&self, weights: &CollaboratorWeights) -> Vec<Signal> {
        let mut signals = Vec::new();
        let score = self.legitimacy_score as i64;

        let legitimacy = if score < 20 {
            Some((
                weights.legitimacy_very_low,
                Severity::High,
                "this posting has strong ghost job indicators",
            ))
        } else if score < 40 {
            Some((
                weights.legitimacy_low,
                Severity::High,
                "multiple concerns about whether this is a genuine hire",
            ))
        } else if score < 60 {
            Some((
                weights.legitimacy_medium,
                Severity::Medium,
                "some concerns about this listing",
            ))
        } else {
            None
        };

        if let Some((delta, severity, summary)) = legitimacy {
            signals.push(Signal::flagged(
                delta,
                RedFlag::new(
                    FlagType::Sentiment,
                    severity,
                    format!("AI legitimacy assessment: {score}/100; {summary}"),
                ),
            ));
        }

        // Position among the first three entries decides weight, even if earlier ones were skipped.
        for (index, entry) in self.red_flags.iter().take(MAX_MODEL_FLAGS).enumerate() {
            let Some(text) = entry.as_str() else {
                continue;
            };
            if text.chars().count() <= 10 {
                continue;
            }
            let (delta, severity) = if index == 0 {
                (weights.model_flag_primary, Severity::High)
            } else {
                (weights.model_flag_secondary, Severity::Medium)
            };
            signals.push(Signal::flagged(
                delta,
                RedFlag::new(FlagType::Sentiment, severity, format!("AI detected: {text}")),
            ));
        }

        signals
    }
}

fn fences() -> &'static (Regex, Regex) {
    static FENCES: OnceLock<(Regex, Regex)> = OnceLock::new();
    FENCES.get_or_init(|| {
        (
            Regex::new(r"^```(?:json)?\s*").expect("fence pattern compiles"),
            Regex::new(r"\s*```$").expect("fence pattern compiles"),
        )
    })
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicClassifier {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    weights: CollaboratorWeights,
}

impl AnthropicClassifier {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        weights: CollaboratorWeights,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            weights,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn verdict(&self, text: &str, title: &str) -> Result<ModelVerdict, CollaboratorError> {
        let description = truncate_chars(text, MAX_PROMPT_CHARS);
        let body = json!({
            "model": self.model,
            "max_tokens": 512,
            "temperature": 0,
            "system": SYSTEM_PROMPT,
            "messages": [{
                "role": "user",
                "content": format!("Job Title: {title}\n\nJob Description:\n{description}"),
            }],
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let message: MessagesResponse =
            response
                .json()
                .await
                .map_err(|error| CollaboratorError::Malformed {
                    service: SERVICE,
                    detail: error.to_string(),
                })?;

        let text = message
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| CollaboratorError::Malformed {
                service: SERVICE,
                detail: "response carried no text block".to_string(),
            })?;

        let verdict = ModelVerdict::parse(&text)?;
        info!(
            title,
            template = verdict.template_score,
            legitimacy = verdict.legitimacy_score,
            reasoning = %verdict.reasoning,
            "model verdict received"
        );
        Ok(verdict)
    }
}

#[async_trait]
impl SentimentClassifier for AnthropicClassifier {
    async fn classify(&self, text: &str, title: &str) -> Result<Signal, CollaboratorError> {
        if text.is_empty() {
            return Ok(Signal::neutral());
        }
        let verdict = self.verdict(text, title).await?;
        Ok(verdict.template_signal(&self.weights))
    }

    async fn classify_deep(&self, text: &str, title: &str) -> Result<Vec<Signal>, CollaboratorError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let verdict = self.verdict(text, title).await?;
        Ok(verdict.deep_signals(&self.weights))
    }
}
