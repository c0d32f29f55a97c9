// Shared prompt constants and prompt-building utilities.
// Each component that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use crate::models::profile::Profile;

/// System prompt that enforces JSON-only output. Sent with every structured call.
pub const JSON_ONLY_SYSTEM: &str = "You are a strict JSON generator. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Pretty-printed profile JSON embedded in every candidate-aware prompt.
pub fn profile_json(profile: &Profile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string())
}

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so candidate text that happens to
/// contain `{answer}` stays literal. Unknown names and stray braces (the JSON
/// examples inside prompts) are copied as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match filled {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
