//! Profile parsing: turns raw résumé text into a structured `Profile`.

use tracing::{info, warn};

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{generate_json_or_default, LanguageModel};
use crate::models::Profile;
use crate::resume::prompts::PROFILE_PARSE_PROMPT;

/// Asks the language model to structure the résumé text.
///
/// Never fails: a failed or malformed reply yields an empty profile, which
/// the rest of the flow tolerates.
pub async fn parse_profile(resume_text: &str, llm: &dyn LanguageModel) -> Profile {
    if resume_text.trim().is_empty() {
        warn!("Résumé text is empty; the profile will be empty too");
    }

    let prompt = fill_template(PROFILE_PARSE_PROMPT, &[("resume_text", resume_text)]);
    let profile: Profile = generate_json_or_default(llm, &prompt, "profile parsing").await;

    info!(
        "Parsed profile for '{}' with {} skills",
        profile.display_name(),
        profile.skills.len()
    );
    profile
}
