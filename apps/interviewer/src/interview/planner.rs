//! Section Planner: asks the model how to split the interview into sections.

use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::{generate_json_or_default, LanguageModel};
use crate::models::interview::SectionPlanReply;
use crate::models::{Profile, SectionPlan};
use crate::interview::prompts::SECTION_PLAN_PROMPT_TEMPLATE;

/// Returns the plan exactly as the model ordered it.
///
/// The 2–4 sections / 2–3 questions policy is only requested, not enforced.
/// A failed call or unusable reply yields an empty plan; the session refuses
/// to start on an empty plan.
pub async fn plan_sections(profile: &Profile, role: &str, llm: &dyn LanguageModel) -> SectionPlan {
    let prompt = fill_template(
        SECTION_PLAN_PROMPT_TEMPLATE,
        &[("role", role), ("profile_json", &profile_json(profile))],
    );

    let reply: SectionPlanReply = generate_json_or_default(llm, &prompt, "section planning").await;
    let plan = reply.sections;

    if plan.is_empty() {
        warn!("Section planner returned no usable sections");
    } else {
        info!(
            "Planned {} sections ({} questions): {}",
            plan.len(),
            plan.total_questions(),
            plan.names().join(", ")
        );
    }
    plan
}
