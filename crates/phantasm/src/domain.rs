use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job board a posting was collected from. Unrecognised labels deserialize as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Platform {
    Linkedin,
    Indeed,
    Greenhouse,
    Lever,
    #[default]
    Unknown,
}

impl Platform {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Self::Linkedin,
            "indeed" => Self::Indeed,
            "greenhouse" => Self::Greenhouse,
            "lever" => Self::Lever,
            _ => Self::Unknown,
        }
    }

    /// Detect the platform from the posting URL host.
    pub fn detect(url: &str) -> Self {
        if url.contains("linkedin.com") {
            Self::Linkedin
        } else if url.contains("indeed.com") {
            Self::Indeed
        } else if url.contains("greenhouse.io") {
            Self::Greenhouse
        } else if url.contains("lever.co") {
            Self::Lever
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Indeed => "indeed",
            Self::Greenhouse => "greenhouse",
            Self::Lever => "lever",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

/// Structured posting fields every analyzer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub url: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub posted_date: Option<String>,
    pub raw_text: String,
    #[serde(default)]
    pub platform: Platform,
}

/// Evidence category attached to a red flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    Age,
    Parity,
    Sentiment,
    Financial,
    Company,
    Compensation,
    Structure,
}

impl FlagType {
    pub fn label(&self) -> &'static str {
        match self {
            FlagType::Age => "age",
            FlagType::Parity => "parity",
            FlagType::Sentiment => "sentiment",
            FlagType::Financial => "financial",
            FlagType::Company => "company",
            FlagType::Compensation => "compensation",
            FlagType::Structure => "structure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    #[serde(rename = "type")]
    pub kind: FlagType,
    pub message: String,
    pub severity: Severity,
}

impl RedFlag {
    pub fn new(kind: FlagType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
        }
    }
}

/// A score delta paired with an optional flag. Either half may be empty on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signal {
    pub delta: i32,
    pub flag: Option<RedFlag>,
}

impl Signal {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn flagged(delta: i32, flag: RedFlag) -> Self {
        Self {
            delta,
            flag: Some(flag),
        }
    }

    /// Delta without a flag, e.g. a careers-page match lowering the score.
    pub fn silent(delta: i32) -> Self {
        Self { delta, flag: None }
    }

    pub fn is_neutral(&self) -> bool {
        self.delta == 0 && self.flag.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLabel {
    Safe,
    Suspicious,
    Ghost,
}

impl ScoreLabel {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreLabel::Safe => "safe",
            ScoreLabel::Suspicious => "suspicious",
            ScoreLabel::Ghost => "ghost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Green,
    Yellow,
    Red,
}

/// Bounded verdict. Only the scoring module constructs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostScore {
    pub score: u8,
    pub label: ScoreLabel,
    pub color: ScoreColor,
}

impl GhostScore {
    pub(crate) fn new(score: u8, label: ScoreLabel, color: ScoreColor) -> Self {
        Self {
            score,
            label,
            color,
        }
    }

    /// The conservative verdict used when no evidence could be gathered.
    pub(crate) fn safe() -> Self {
        Self::new(0, ScoreLabel::Safe, ScoreColor::Green)
    }
}

/// Terminal artifact returned to every caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub job_url: String,
    pub ghost_score: GhostScore,
    pub red_flags: Vec<RedFlag>,
    pub analyzed_at: DateTime<Utc>,
    pub company_name: String,
    pub job_title: String,
}

impl AnalysisResult {
    /// Structurally valid result carrying a single low-severity explanation.
    pub fn degraded(
        job_url: impl Into<String>,
        company_name: impl Into<String>,
        job_title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job_url: job_url.into(),
            ghost_score: GhostScore::safe(),
            red_flags: vec![RedFlag::new(FlagType::Parity, Severity::Low, message)],
            analyzed_at: Utc::now(),
            company_name: company_name.into(),
            job_title: job_title.into(),
        }
    }
}

/// Outcome of the company news lookup.
///
/// `article_count` is `None` when the lookup could not run at all, which must not be read as
/// "no coverage".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResearch {
    pub article_count: Option<u64>,
    pub has_controversy: bool,
    pub controversy_headline: String,
}

impl CompanyResearch {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.article_count.is_none()
    }
}
