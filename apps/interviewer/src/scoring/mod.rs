// Scoring Pipeline: ATS evaluation, alternate roles, and the interview gate.
// All LLM calls go through llm_client; every failure degrades to an empty result.

pub mod alternates;
pub mod ats;
pub mod prompts;

use crate::llm_client::LanguageModel;
use crate::models::{Profile, RoleFitResult};

pub use alternates::suggest_alternates;
pub use ats::{evaluate, passes_gate, GATE_THRESHOLD};

/// Outcome of screening a candidate before an interview.
#[derive(Debug, Clone)]
pub struct Screening {
    pub fit: RoleFitResult,
    pub alternates: Vec<String>,
    pub proceed: bool,
}

/// Scores the profile, gathers alternate roles, and applies the gate.
pub async fn screen(profile: &Profile, role: &str, llm: &dyn LanguageModel) -> Screening {
    let fit = evaluate(profile, role, llm).await;
    let alternates = suggest_alternates(profile, role, &fit.missing_skills, llm).await;
    let proceed = passes_gate(&fit);
    Screening {
        fit,
        alternates,
        proceed,
    }
}
