//! Company legitimacy rules over the employer name, the posting text, and news research.

use regex::Regex;
use tracing::debug;

use super::rules::{any_pattern, compile, count_phrases, truncate_chars};
use crate::domain::{CompanyResearch, FlagType, RedFlag, Severity, Signal};
use crate::scoring::config::{half, CompanyWeights};

const STAFFING_KEYWORDS: &[&str] = &[
    "staffing",
    "recruiting",
    "recruitment",
    "talent acquisition",
    "temp agency",
    "temporary staffing",
    "contract staffing",
    "manpower",
    "outsourcing",
    "consulting firm",
    "placement agency",
    "employment agency",
    "headhunter",
    "body shop",
    "contracting",
    "staff augmentation",
];

const KNOWN_STAFFING_FIRMS: &[&str] = &[
    "robert half", "adecco", "randstad", "manpower", "kelly services", "hays", "michael page",
    "kforce", "insight global", "tek systems", "teksystems", "aerotek", "modis", "apex systems",
    "cybercoders", "dice", "toptal", "upwork", "fiverr", "belay", "boldly", "staffmark",
    "spherion", "express employment", "jobot", "nesco resource", "yoh", "judge group",
    "collabera", "infosys bpo", "wipro", "tata consultancy", "cognizant", "hcl technologies",
    "tech mahindra", "capgemini",
];

const CLIENT_PATTERNS: &[&str] = &[
    r"on behalf of",
    r"our client",
    r"client company",
    r"client is (a|an|seeking)",
    r"hiring for (a|an|our) client",
    r"direct hire .* client",
];

const FREELANCE_KEYWORDS: &[&str] = &[
    "freelance",
    "1099",
    "independent contractor",
    "gig",
    "per diem",
    "on-call",
    "as-needed basis",
    "project-based",
    "no benefits",
    "no health insurance",
    "unpaid internship",
];

const TURNOVER_SIGNALS: &[&str] = &[
    "high growth",
    "rapidly scaling",
    "constant change",
    "high-pressure",
    "must be available 24/7",
    "on call",
    "unlimited pto",
    "startup mentality",
    "we work hard and play hard",
    "we're like a family",
    "hustle",
    "grind",
];

const SENIOR_TITLE_KEYWORDS: &[&str] = &[
    "vp",
    "vice president",
    "director",
    "head of",
    "chief",
    "c-suite",
    "cto",
    "cfo",
    "coo",
];

const EARLY_STAGE_SIGNALS: &[&str] = &[
    "small team",
    "startup",
    "early stage",
    "seed stage",
    "pre-revenue",
    "founding",
];

const CONTRACT_TO_HIRE_PATTERNS: &[&str] = &[
    r"contract[- ]to[- ]hire",
    r"temp[- ]to[- ]perm",
    r"contract with (possibility|option) (of|to)",
    r"potential for (full[- ]time|permanent|conversion)",
];

pub struct CompanyAnalyzer {
    weights: CompanyWeights,
    client_patterns: Vec<Regex>,
    contract_to_hire: Vec<Regex>,
}

impl CompanyAnalyzer {
    pub fn new(weights: CompanyWeights) -> Self {
        Self {
            weights,
            client_patterns: compile(CLIENT_PATTERNS),
            contract_to_hire: compile(CONTRACT_TO_HIRE_PATTERNS),
        }
    }

    /// Evaluate every legitimacy rule. An empty company name yields no signals.
    pub fn analyze(
        &self,
        company: &str,
        raw_text: &str,
        title: &str,
        research: &CompanyResearch,
    ) -> Vec<Signal> {
        let mut signals = Vec::new();
        if company.is_empty() {
            return signals;
        }

        let lowered = raw_text.to_lowercase();

        if self.is_staffing_agency(company, &lowered) {
            debug!(company, "staffing or outsourcing agency detected");
            signals.push(Signal::flagged(
                self.weights.staffing_agency,
                RedFlag::new(
                    FlagType::Company,
                    Severity::High,
                    format!("'{company}' appears to be a staffing agency or outsourcing firm; the actual employer is hidden"),
                ),
            ));
        }

        let freelance = count_phrases(&lowered, FREELANCE_KEYWORDS);
        if freelance >= 3 {
            debug!(company, freelance, "high freelance reliance");
            signals.push(Signal::flagged(
                self.weights.controversial_model,
                RedFlag::new(
                    FlagType::Company,
                    Severity::High,
                    format!("Role has {freelance} signals of freelance/contractor classification; may not be a real employee position"),
                ),
            ));
        } else if freelance >= 1 {
            signals.push(Signal::flagged(
                half(self.weights.controversial_model),
                RedFlag::new(
                    FlagType::Company,
                    Severity::Medium,
                    "Role mentions freelance or independent contractor terms; verify employment classification",
                ),
            ));
        }

        let turnover = count_phrases(&lowered, TURNOVER_SIGNALS);
        if turnover >= 3 {
            debug!(company, turnover, "high turnover culture signals");
            signals.push(Signal::flagged(
                self.weights.high_turnover,
                RedFlag::new(
                    FlagType::Company,
                    Severity::Medium,
                    format!("Job posting contains {turnover} high-turnover culture signals (hustle culture, always-on expectations)"),
                ),
            ));
        }

        if research.article_count == Some(0) {
            debug!(company, "no news presence");
            signals.push(Signal::flagged(
                self.weights.no_web_presence,
                RedFlag::new(
                    FlagType::Company,
                    Severity::Medium,
                    format!("No news coverage found for '{company}'; company may be too new, too small, or fictitious"),
                ),
            ));
        }

        if research.has_controversy {
            let headline = truncate_chars(&research.controversy_headline, 120);
            debug!(company, headline, "controversy found");
            signals.push(Signal::flagged(
                self.weights.controversial_model,
                RedFlag::new(
                    FlagType::Company,
                    Severity::High,
                    format!("Company linked to controversy: {headline}"),
                ),
            ));
        }

        let title_lowered = title.to_lowercase();
        let senior_role = SENIOR_TITLE_KEYWORDS
            .iter()
            .any(|keyword| title_lowered.contains(keyword));
        if senior_role && count_phrases(&lowered, EARLY_STAGE_SIGNALS) >= 2 {
            signals.push(Signal::flagged(
                self.weights.tiny_company_big_hire,
                RedFlag::new(
                    FlagType::Structure,
                    Severity::Medium,
                    "Senior leadership role at a very early-stage company; role may be aspirational rather than an active hire",
                ),
            ));
        }

        if any_pattern(&lowered, &self.contract_to_hire) {
            signals.push(Signal::flagged(
                self.weights.contract_to_hire,
                RedFlag::new(
                    FlagType::Structure,
                    Severity::Low,
                    "Contract-to-hire arrangement; conversion is not guaranteed and companies often cycle contractors without hiring",
                ),
            ));
        }

        signals
    }

    fn is_staffing_agency(&self, company: &str, lowered: &str) -> bool {
        let company = company.to_lowercase();
        KNOWN_STAFFING_FIRMS
            .iter()
            .any(|firm| company.contains(firm))
            || count_phrases(lowered, STAFFING_KEYWORDS) >= 2
            || any_pattern(lowered, &self.client_patterns)
    }
}

impl Default for CompanyAnalyzer {
    fn default() -> Self {
        Self::new(CompanyWeights::default())
    }
}
