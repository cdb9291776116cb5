//! Per-platform field extraction from fetched HTML.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::analysis::rules::truncate_chars;
use crate::domain::Platform;

const MAX_RAW_TEXT_CHARS: usize = 8000;
const MIN_DESCRIPTION_CHARS: usize = 100;
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "svg", "head"];
const GREENHOUSE_URL_PATTERN: &str = r"^https?://([^./]+)\.greenhouse\.io(?:/([^/?#]+))?";
const LEVER_URL_PATTERN: &str = r"^https?://jobs\.lever\.co/([^/?#]+)";

fn greenhouse_url() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(GREENHOUSE_URL_PATTERN).expect("greenhouse url pattern compiles"))
}

fn lever_url() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(LEVER_URL_PATTERN).expect("lever url pattern compiles"))
}

/// Fields pulled out of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub company: String,
    pub posted_date: Option<String>,
    pub raw_text: String,
}

pub fn extract_page(html: &str, url: &str, platform: Platform) -> ExtractedPage {
    let document = Html::parse_document(html);

    let (mut title, company) = match platform {
        Platform::Linkedin => linkedin_fields(&document),
        Platform::Indeed => indeed_fields(&document),
        Platform::Greenhouse => greenhouse_fields(&document, url),
        Platform::Lever => lever_fields(&document, url),
        Platform::Unknown => generic_fields(&document),
    };
    if title.is_empty() {
        title = generic_fields(&document).0;
    }

    let description = description_block(&document, platform)
        .unwrap_or_else(|| visible_text_of(&document));

    ExtractedPage {
        title,
        company,
        posted_date: date_posted(&document),
        raw_text: truncate_chars(&description, MAX_RAW_TEXT_CHARS).to_string(),
    }
}

/// Visible page text with script, style, and head content skipped.
pub fn visible_text(html: &str) -> String {
    visible_text_of(&Html::parse_document(html))
}

fn visible_text_of(document: &Html) -> String {
    let mut parts = Vec::new();
    collect_visible(document.root_element(), &mut parts);
    parts.join(" ")
}

fn collect_visible(element: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !SKIPPED_TAGS.contains(&child.value().name()) {
                collect_visible(child, parts);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(document: &Html, selectors: &[&str]) -> String {
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn meta_content(document: &Html, property: &str) -> String {
    for css in [
        format!(r#"meta[property="{property}"]"#),
        format!(r#"meta[name="{property}"]"#),
    ] {
        let Ok(selector) = Selector::parse(&css) else {
            continue;
        };
        let content = document
            .select(&selector)
            .filter_map(|element| element.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty());
        if let Some(content) = content {
            return content.to_string();
        }
    }
    String::new()
}

fn or_fallback(value: String, fallback: impl FnOnce() -> String) -> String {
    if value.is_empty() {
        fallback()
    } else {
        value
    }
}

/// "Company hiring Title in Location", "Title - Company", or a bare title.
pub(crate) fn split_linkedin_title(og_title: &str) -> (String, String) {
    let clean = og_title.replace(" | LinkedIn", "");
    let clean = clean.trim();

    if let Some((company, job)) = clean.split_once(" hiring ") {
        let title = match job.rsplit_once(" in ") {
            Some((title, _location)) => title,
            None => job,
        };
        (title.trim().to_string(), company.trim().to_string())
    } else if let Some((title, company)) = clean.split_once(" - ") {
        (title.trim().to_string(), company.trim().to_string())
    } else {
        (clean.to_string(), String::new())
    }
}

fn linkedin_fields(document: &Html) -> (String, String) {
    let (mut title, mut company) = split_linkedin_title(&meta_content(document, "og:title"));

    if company.is_empty() {
        let description = meta_content(document, "og:description");
        let lowered = description.to_lowercase();
        for marker in [" is hiring", " posted"] {
            if let Some(head) = lowered.find(marker).and_then(|index| description.get(..index)) {
                company = head.trim().to_string();
                break;
            }
        }
    }

    if title.is_empty() {
        title = first_text(
            document,
            &[".job-details-jobs-unified-top-card__job-title", "h1"],
        );
    }
    if company.is_empty() {
        company = first_text(document, &[".job-details-jobs-unified-top-card__company-name"]);
    }

    (title, company)
}

fn indeed_fields(document: &Html) -> (String, String) {
    let title = or_fallback(meta_content(document, "og:title"), || {
        first_text(
            document,
            &["h1[class*='jobTitle']", "h1[class*='JobTitle']", "h1"],
        )
    });
    let title = match title.split_once(" - ") {
        Some((head, _)) => head.trim().to_string(),
        None => title,
    };

    let description = meta_content(document, "og:description");
    let company = match description.split_once(" - ") {
        Some((head, _)) => head.trim().to_string(),
        None => String::new(),
    };

    (title, company)
}

fn greenhouse_fields(document: &Html, url: &str) -> (String, String) {
    let title = or_fallback(first_text(document, &["h1.app-title"]), || {
        or_fallback(meta_content(document, "og:title"), || first_text(document, &["h1"]))
    });
    let company = or_fallback(first_text(document, &["span.company-name"]), || {
        or_fallback(meta_content(document, "og:site_name"), || {
            company_from_url(url, greenhouse_url())
        })
    });
    (title, company)
}

fn lever_fields(document: &Html, url: &str) -> (String, String) {
    let title = or_fallback(first_text(document, &["h2"]), || {
        or_fallback(meta_content(document, "og:title"), || first_text(document, &["h1"]))
    });
    let company = or_fallback(meta_content(document, "og:site_name"), || {
        company_from_url(url, lever_url())
    });
    (title, company)
}

fn generic_fields(document: &Html) -> (String, String) {
    let title = or_fallback(meta_content(document, "og:title"), || {
        first_text(document, &["h1", "title"])
    });
    (title, meta_content(document, "og:site_name"))
}

/// Hosted boards put the tenant either in the subdomain or, on shared hosts, in the first path segment.
fn company_from_url(url: &str, pattern: &Regex) -> String {
    let Some(captures) = pattern.captures(url) else {
        return String::new();
    };

    let host_slug = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let slug = match (host_slug, captures.get(2)) {
        ("boards" | "job-boards", Some(path)) => path.as_str(),
        _ => host_slug,
    };
    title_case(&slug.replace('-', " "))
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn description_block(document: &Html, platform: Platform) -> Option<String> {
    let selectors: &[&str] = match platform {
        Platform::Linkedin => &[
            ".jobs-description-content__text",
            ".description__text",
            ".show-more-less-html__markup",
            "article.jobs-description__container",
        ],
        Platform::Indeed => &["#jobDescriptionText", ".jobsearch-JobComponent-description"],
        Platform::Greenhouse => &["#content"],
        Platform::Lever => &[".posting-page"],
        Platform::Unknown => &[],
    };

    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        let element = document.select(&selector).next()?;
        let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        (text.chars().count() > MIN_DESCRIPTION_CHARS).then_some(text)
    })
}

/// `datePosted` from schema.org JobPosting markup, when the page carries it.
fn date_posted(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        find_date_posted(&value)
    })
}

fn find_date_posted(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map
            .get("datePosted")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.get("@graph").and_then(find_date_posted)),
        Value::Array(items) => items.iter().find_map(find_date_posted),
        _ => None,
    }
}
