use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Candidate profile extracted from the résumé. Immutable for a session's lifetime.
///
/// Field names match the JSON keys the parsing prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Name", default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "Skills", default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(rename = "Experience", default, deserialize_with = "lenient::text")]
    pub experience: String,
    #[serde(rename = "Education", default, deserialize_with = "lenient::text")]
    pub education: String,
}

impl Profile {
    /// Name used when addressing the candidate.
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => "Candidate",
            name => name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.skills.is_empty()
            && self.experience.trim().is_empty()
            && self.education.trim().is_empty()
    }
}
