use crate::infra::build_analyzer;
use clap::Args;
use phantasm::config::AppConfig;
use phantasm::error::AppError;
use phantasm::router::ManualAnalyzeRequest;
use phantasm::{AnalysisResult, ScoreLabel};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyzeArgs {
    /// Posting URL. Scraped unless the manual fields are supplied.
    #[arg(long)]
    pub(crate) url: String,
    /// Job title (manual mode)
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Hiring company (manual mode)
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// File holding the posting text (manual mode)
    #[arg(long)]
    pub(crate) text_file: Option<PathBuf>,
    /// Date the posting went live, e.g. 2025-01-31
    #[arg(long)]
    pub(crate) posted_date: Option<String>,
    /// linkedin, indeed, greenhouse or lever. Anything else is treated as unknown.
    #[arg(long)]
    pub(crate) platform: Option<String>,
    /// Print the raw JSON result instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

impl AnalyzeArgs {
    fn is_manual(&self) -> bool {
        self.title.is_some() || self.company.is_some() || self.text_file.is_some()
    }

    fn manual_request(&self) -> Result<ManualAnalyzeRequest, AppError> {
        let (Some(title), Some(company), Some(text_file)) =
            (&self.title, &self.company, &self.text_file)
        else {
            return Err(AppError::Input(
                "manual mode needs --title, --company and --text-file together".to_string(),
            ));
        };

        Ok(ManualAnalyzeRequest {
            url: self.url.clone(),
            title: title.clone(),
            company: company.clone(),
            raw_text: std::fs::read_to_string(text_file)?,
            posted_date: self.posted_date.clone(),
            platform: self.platform.clone(),
        })
    }
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let analyzer = build_analyzer(&config)?;

    let result = if args.is_manual() {
        let request = args.manual_request()?;
        analyzer.analyze(request.into_metadata(), &args.url).await
    } else {
        analyzer.analyze_url(&args.url).await
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::Input(format!("unable to render result: {err}")))?;
        println!("{rendered}");
    } else {
        print!("{}", render_report(&result));
    }

    Ok(())
}

pub(crate) fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let score = &result.ghost_score;
    let verdict = match score.label {
        ScoreLabel::Ghost => "likely ghost job",
        ScoreLabel::Suspicious => "suspicious",
        ScoreLabel::Safe => "looks legitimate",
    };

    let _ = writeln!(out, "Ghost job report");
    let _ = writeln!(out, "  Posting: {}", result.job_url);
    if !result.job_title.is_empty() || !result.company_name.is_empty() {
        let _ = writeln!(
            out,
            "  Role: {} at {}",
            result.job_title,
            display_or(&result.company_name, "unknown company")
        );
    }
    let _ = writeln!(out, "  Score: {}/100 ({})", score.score, verdict);
    let _ = writeln!(out, "  Analyzed: {}", result.analyzed_at.format("%Y-%m-%d %H:%M UTC"));

    if result.red_flags.is_empty() {
        let _ = writeln!(out, "\nRed flags: none");
    } else {
        let _ = writeln!(out, "\nRed flags");
        for flag in &result.red_flags {
            let _ = writeln!(
                out,
                "  [{:<6}] {:<12} {}",
                flag.severity.label(),
                flag.kind.label(),
                flag.message
            );
        }
    }

    out
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
