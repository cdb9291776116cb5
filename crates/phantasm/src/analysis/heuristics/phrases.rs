//! Phrase and pattern tables for the posting text rules. All entries are lowercase.

pub(crate) const BOILERPLATE: &[&str] = &[
    "fast-paced environment",
    "dynamic team",
    "passionate individual",
    "self-starter",
    "wear many hats",
    "hit the ground running",
    "rockstar",
    "ninja",
    "guru",
    "synergy",
    "think outside the box",
    "go-getter",
    "team player",
    "excellent communication skills",
    "detail-oriented",
    "results-driven",
    "work hard play hard",
    "like a family",
    "competitive salary",
    "exciting opportunity",
    "unique opportunity",
    "world-class",
    "best-in-class",
    "move the needle",
    "leverage",
    "circle back",
    "low-hanging fruit",
    "bandwidth",
    "alignment",
    "take ownership",
    "proactive",
    "strong work ethic",
    "able to thrive",
    "other duties as assigned",
    "duties as needed",
    "flexible schedule required",
    "comfortable with ambiguity",
    "bias for action",
    "sense of urgency",
];

pub(crate) const VAGUE_TITLE_PATTERNS: &[&str] = &[
    r"^(associate|specialist|coordinator|representative|analyst)$",
    r"various\s+(positions|roles|openings)",
    r"multiple\s+(positions|roles|openings)",
    r"general\s+application",
    r"talent\s+(pool|community|network)",
    r"future\s+(opening|role|opportunity|consideration)",
    r"expression\s+of\s+interest",
    r"team\s+member",
    r"brand\s+ambassador",
];

pub(crate) const REPOST_SIGNALS: &[&str] = &[
    "reposted",
    "re-posted",
    "updated posting",
    "previously listed",
    "ongoing recruitment",
    "continuous posting",
    "evergreen",
    "pipeline",
    "talent pool",
    "always accepting",
    "rolling basis",
    "open until filled",
    "continuous recruitment",
];

pub(crate) const KITCHEN_SINK_TECHS: &[&str] = &[
    "java", "python", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "scala",
    "kotlin", "swift", "php", "perl", "react", "angular", "vue", "svelte", "next.js", "nuxt",
    "node.js", "django", "flask", "spring", "rails", "aws", "azure", "gcp", "kubernetes",
    "docker", "terraform", "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "kafka",
    "rabbitmq", "graphql", "rest", "machine learning", "deep learning", "nlp",
    "computer vision", "tensorflow", "pytorch", "spark", "hadoop",
];

pub(crate) const SPECIFICITY_PATTERNS: &[&str] = &[
    r"\d+\s*(years?|months?)\s*(of)?\s*(experience|exp)",
    r"\$[\d,]+",
    r"\d+%",
    r"team of \d+",
    r"report(ing)? to",
    r"(q[1-4]|quarter)",
    r"(series [a-d]|seed|ipo)",
    r"\d+ (employees|people|engineers|developers)",
    r"(slack|jira|confluence|notion|figma|linear|asana|monday)",
    r"(annual|quarterly) review",
    r"\d+\s*(direct reports|headcount)",
];

pub(crate) const EXPERIENCE_PATTERN: &str =
    r"(\d+)\+?\s*(?:years?|yrs?)\s*(?:of)?\s*(?:experience|exp)";

pub(crate) const JUNIOR_TITLE_KEYWORDS: &[&str] = &["junior", "jr", "entry", "associate", "intern"];

pub(crate) const APPLICATION_RED_FLAGS: &[&str] = &[
    "apply on company website",
    "send resume to",
    "email your resume",
    "apply via email",
    "no phone calls",
    "do not contact",
    "no recruiters",
];

pub(crate) const URGENCY_PHRASES: &[&str] = &[
    "apply immediately",
    "position will be filled quickly",
    "don't miss this opportunity",
    "limited time",
    "act fast",
    "apply today",
    "urgent hire",
    "immediate need",
    "asap",
    "time-sensitive",
];

pub(crate) const PLACEHOLDER_PATTERNS: &[&str] = &[
    r"\[company\s*name\]",
    r"\[insert\s",
    r"\{company\}",
    r"<company>",
    r"lorem ipsum",
    r"xxx",
    r"\[tbd\]",
    r"\[fill in\]",
];

/// Matched against the un-lowered text; `k` and `K` both appear in the wild.
pub(crate) const SALARY_RANGE_PATTERN: &str =
    r"\$\s*([\d,]+)\s*(?:k|K|,000)?\s*(?:-|to|–)\s*\$\s*([\d,]+)\s*(?:k|K|,000)?";

pub(crate) const DOLLAR_FIGURE_PATTERN: &str = r"\$\s*[\d,]+";

pub(crate) const DOE_PATTERNS: &[&str] = &[
    r"\bdoe\b",
    r"depends on experience",
    r"commensurate with experience",
    r"based on experience",
];
