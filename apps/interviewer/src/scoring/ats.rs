//! ATS evaluation: scores a profile against the target role.

use tracing::info;

use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::{generate_json_or_default, LanguageModel};
use crate::models::{Profile, RoleFitResult};
use crate::scoring::prompts::ATS_PROMPT_TEMPLATE;

/// Minimum `match_score` that lets an interview start.
pub const GATE_THRESHOLD: u32 = 65;

/// Evaluates the profile for `role`. A failed or malformed reply is the
/// default result (score 0), which never passes the gate.
pub async fn evaluate(profile: &Profile, role: &str, llm: &dyn LanguageModel) -> RoleFitResult {
    let prompt = fill_template(
        ATS_PROMPT_TEMPLATE,
        &[("role", role), ("profile_json", &profile_json(profile))],
    );

    let fit: RoleFitResult = generate_json_or_default(llm, &prompt, "ATS evaluation").await;
    info!(
        "ATS score for '{}' as '{role}': {}/100 ({} missing skills)",
        profile.display_name(),
        fit.match_score,
        fit.missing_skills.len()
    );
    fit
}

/// The interview gate: proceed only at or above [`GATE_THRESHOLD`].
pub fn passes_gate(fit: &RoleFitResult) -> bool {
    fit.match_score >= GATE_THRESHOLD
}
