//! Alternate-role suggestions. Advisory only; never affects the gate.

use tracing::info;

use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::{generate_json_or_default, LanguageModel};
use crate::models::scoring::SuggestedRoles;
use crate::models::Profile;
use crate::scoring::prompts::ALTERNATE_ROLES_PROMPT_TEMPLATE;

/// Suggests roles the candidate is likely to clear the gate for, in the
/// order the model lists them. Empty on any failure.
pub async fn suggest_alternates(
    profile: &Profile,
    role: &str,
    missing_skills: &[String],
    llm: &dyn LanguageModel,
) -> Vec<String> {
    let prompt = fill_template(
        ALTERNATE_ROLES_PROMPT_TEMPLATE,
        &[
            ("role", role),
            ("missing_skills", &missing_skills.join(", ")),
            ("profile_json", &profile_json(profile)),
        ],
    );

    let reply: SuggestedRoles = generate_json_or_default(llm, &prompt, "alternate roles").await;
    info!("Suggested {} alternate roles", reply.roles.len());
    reply.roles
}
