// Résumé parsing prompt templates.

/// Profile extraction prompt. Replace `{resume_text}` before sending.
pub const PROFILE_PARSE_PROMPT: &str = r#"Extract the following information from this resume text.
Return valid JSON only:

{
  "Name": "...",
  "Skills": ["..."],
  "Experience": "...",
  "Education": "..."
}

Resume:
{resume_text}"#;
