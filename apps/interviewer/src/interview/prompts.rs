// Interview prompt templates: planning, questions, and feedback.

/// Section planning prompt. Replace `{role}` and `{profile_json}`.
pub const SECTION_PLAN_PROMPT_TEMPLATE: &str = r#"Based on the following candidate profile and the applied role "{role}",
divide the interview into 2-4 logical sections.
Each section should focus on either technical skills, behavioral aspects,
or domain-specific knowledge. Allocate 2-3 questions per section.

Candidate Profile:
{profile_json}

Return JSON strictly in this format:
{
  "sections": {
    "SectionName1": number_of_questions,
    "SectionName2": number_of_questions
  }
}"#;

/// Next-question prompt. Replace `{role}`, `{profile_json}`, `{section}` and `{asked_json}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Candidate Role: {role}
Candidate Profile: {profile_json}

Current Section: {section}
Already Asked Questions: {asked_json}

Generate ONE new question for this section.
Do not repeat any previous questions.
Reply with the question text only."#;

/// Per-answer feedback prompt. Replace `{role}`, `{profile_json}`, `{question}` and `{answer}`.
pub const MICRO_FEEDBACK_PROMPT_TEMPLATE: &str = r#"Candidate Role: {role}
Candidate Profile: {profile_json}

Interview Question: "{question}"
Candidate Answer: "{answer}"

Give short constructive feedback (2-3 sentences).
Focus on correctness, clarity, and improvements."#;

/// End-of-session report prompt. Replace `{profile_json}`, `{role}` and `{answers_json}`.
pub const COMPOSITE_REPORT_PROMPT_TEMPLATE: &str = r#"You are an interviewer providing detailed feedback after a mock interview.

Candidate Profile:
{profile_json}

Role Applied: {role}

Candidate Answers:
{answers_json}

Please return feedback in this structured format:
Final Score: (0-100)

Strengths:
- Point 1
- Point 2

Areas to Improve:
- Point 1
- Point 2"#;
