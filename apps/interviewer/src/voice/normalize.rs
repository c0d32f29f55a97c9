//! Text clean-up applied before speech synthesis.

use std::sync::OnceLock;

use regex::Regex;

static ACRONYMS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

/// Expands acronyms that synthesizers tend to mispronounce.
/// Matches whole words only, case-insensitively.
pub fn expand_acronyms(text: &str) -> String {
    let rules = ACRONYMS.get_or_init(|| {
        [
            (r"(?i)\bml\b", "Machine Learning"),
            (r"(?i)\bai\b", "Artificial Intelligence"),
            (r"(?i)\bnlp\b", "Natural Language Processing"),
            (r"(?i)\bcv\b", "Computer Vision"),
        ]
        .into_iter()
        .map(|(pattern, full)| (Regex::new(pattern).expect("valid acronym pattern"), full))
        .collect()
    });

    rules
        .iter()
        .fold(text.to_string(), |acc, (re, full)| {
            re.replace_all(&acc, *full).into_owned()
        })
}
