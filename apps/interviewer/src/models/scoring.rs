use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// ATS-style evaluation of a profile against a target role.
///
/// `Default` is the documented fallback for a failed or malformed scoring
/// call: score 0, empty summary, no missing skills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleFitResult {
    #[serde(default, deserialize_with = "lenient::score")]
    pub match_score: u32, // 0 – 100
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub missing_skills: Vec<String>,
}

/// Reply shape of the alternate-role prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestedRoles {
    #[serde(
        rename = "SuggestedRoles",
        default,
        deserialize_with = "lenient::string_list"
    )]
    pub roles: Vec<String>,
}
