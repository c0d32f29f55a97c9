// Scoring Pipeline prompt templates.

/// ATS evaluation prompt. Replace `{role}` and `{profile_json}` before sending.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Act as an Applicant Tracking System (ATS).
Analyze this candidate profile for the role '{role}'.

Candidate Profile:
{profile_json}

Return JSON:
{
  "match_score": number (0-100),
  "summary": "...",
  "missing_skills": ["..."]
}"#;

/// Alternate-role prompt. Replace `{role}`, `{missing_skills}` and `{profile_json}`.
pub const ALTERNATE_ROLES_PROMPT_TEMPLATE: &str = r#"Candidate applied for "{role}" but is missing skills: {missing_skills}.
Based on their profile, suggest 2-3 alternate roles for which the candidate will surely have an ATS score of more than 65.

Candidate Profile:
{profile_json}

Return JSON:
{
  "SuggestedRoles": ["role1", "role2"]
}"#;
