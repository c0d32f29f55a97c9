//! Feedback Aggregator: advisory per-answer feedback and the single
//! end-of-session composite report.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::interview::prompts::{COMPOSITE_REPORT_PROMPT_TEMPLATE, MICRO_FEEDBACK_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::LanguageModel;
use crate::models::{AnswerRecord, Profile};

/// Short feedback on one answer. Best-effort: any failure yields `""`.
pub async fn micro_feedback(
    profile: &Profile,
    role: &str,
    question: &str,
    answer: &str,
    llm: &dyn LanguageModel,
) -> String {
    let prompt = fill_template(
        MICRO_FEEDBACK_PROMPT_TEMPLATE,
        &[
            ("role", role),
            ("profile_json", &profile_json(profile)),
            ("question", question),
            ("answer", answer),
        ],
    );

    match llm.generate(&prompt, false).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Micro-feedback unavailable, continuing without it: {e}");
            String::new()
        }
    }
}

/// End-of-session report. `text` is what the model produced and what gets
/// persisted; the other fields are decoded from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeReport {
    pub final_score: u32,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub text: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Heading {
    Strengths,
    Improve,
}

fn final_score_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)final\s+score\s*[:\-]?\s*\**\s*(\d{1,3})").expect("valid regex")
    })
}

impl CompositeReport {
    /// Decodes a report from free text. Missing pieces decode as 0 / empty.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let final_score = final_score_regex()
            .captures(&text)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(|s| s.min(100))
            .unwrap_or(0);

        let mut strengths = Vec::new();
        let mut areas_to_improve = Vec::new();
        let mut heading = None;

        for line in text.lines() {
            let trimmed = line.trim();
            let bare = trimmed.trim_matches(|c| c == '*' || c == '#').trim();
            let lower = bare.to_lowercase();

            if lower.starts_with("strengths") {
                heading = Some(Heading::Strengths);
                continue;
            }
            if lower.starts_with("areas to improve") || lower.starts_with("areas for improvement") {
                heading = Some(Heading::Improve);
                continue;
            }
            if lower.starts_with("final score") {
                heading = None;
                continue;
            }

            let Some(item) = bullet(trimmed) else {
                continue;
            };
            match heading {
                Some(Heading::Strengths) => strengths.push(item),
                Some(Heading::Improve) => areas_to_improve.push(item),
                None => {}
            }
        }

        Self {
            final_score,
            strengths,
            areas_to_improve,
            text,
        }
    }
}

/// Text of a `-`, `*`, `•` or `1.` list item, if the line is one.
fn bullet(line: &str) -> Option<String> {
    let rest = if let Some(rest) = line.strip_prefix(&['-', '*', '•'][..]) {
        rest
    } else {
        let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        line[digits..].strip_prefix(&['.', ')'][..])?
    };
    let item = rest.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Produces the composite report. Called at most once per session; `None`
/// when the model is unavailable or returns nothing.
pub async fn composite_report(
    profile: &Profile,
    answers: &[AnswerRecord],
    role: &str,
    llm: &dyn LanguageModel,
) -> Option<CompositeReport> {
    let answers_json = serde_json::to_string_pretty(answers).unwrap_or_else(|_| "[]".to_string());
    let prompt = fill_template(
        COMPOSITE_REPORT_PROMPT_TEMPLATE,
        &[
            ("profile_json", &profile_json(profile)),
            ("role", role),
            ("answers_json", &answers_json),
        ],
    );

    match llm.generate(&prompt, false).await {
        Ok(text) if !text.trim().is_empty() => {
            let report = CompositeReport::from_text(text.trim());
            info!(
                "Composite report: score {}, {} strengths, {} areas to improve",
                report.final_score,
                report.strengths.len(),
                report.areas_to_improve.len()
            );
            Some(report)
        }
        Ok(_) => {
            warn!("Composite report came back empty");
            None
        }
        Err(e) => {
            warn!("Composite report unavailable: {e}");
            None
        }
    }
}

/// Writes the report text to `path` exactly as produced.
pub async fn persist_report(path: &Path, report: &CompositeReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, report.text.as_bytes()).await
}
