//! Question Sequencer: one new question at a time, never a repeat.

use tracing::{debug, warn};

use crate::errors::InterviewError;
use crate::interview::prompts::QUESTION_PROMPT_TEMPLATE;
use crate::interview::state::AskedQuestions;
use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::LanguageModel;
use crate::models::Profile;

/// Requests questions for a section, retrying on repeats and failures.
///
/// The session-wide asked set is authoritative: a question asked in any
/// earlier section counts as a repeat. After `retry_cap` attempts without a
/// new question the sequencer reports `QuestionGenerationStalled`.
pub struct QuestionSequencer<'a> {
    llm: &'a dyn LanguageModel,
    retry_cap: u32,
}

impl<'a> QuestionSequencer<'a> {
    pub fn new(llm: &'a dyn LanguageModel, retry_cap: u32) -> Self {
        Self {
            llm,
            retry_cap: retry_cap.max(1),
        }
    }

    pub async fn next(
        &self,
        section: &str,
        profile: &Profile,
        role: &str,
        asked: &AskedQuestions,
    ) -> Result<String, InterviewError> {
        let asked_json =
            serde_json::to_string(asked.as_slice()).unwrap_or_else(|_| "[]".to_string());
        let prompt = fill_template(
            QUESTION_PROMPT_TEMPLATE,
            &[
                ("role", role),
                ("profile_json", &profile_json(profile)),
                ("section", section),
                ("asked_json", &asked_json),
            ],
        );

        for attempt in 1..=self.retry_cap {
            let reply = match self.llm.generate(&prompt, false).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(
                        "Question generation attempt {attempt} for '{section}': {}",
                        InterviewError::from(e)
                    );
                    continue;
                }
            };

            let question = clean_question(&reply);
            if question.is_empty() {
                debug!("Attempt {attempt} for '{section}' produced an empty question");
                continue;
            }
            if asked.contains(&question) {
                debug!("Attempt {attempt} for '{section}' repeated an earlier question");
                continue;
            }
            return Ok(question);
        }

        Err(InterviewError::QuestionGenerationStalled {
            attempts: self.retry_cap,
        })
    }
}

/// Trims whitespace and any wrapping quotes the model adds around the question.
fn clean_question(reply: &str) -> String {
    reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::state::{Event, SessionState};
    use crate::models::{RoleFitResult, SectionPlan};
    use crate::testing::{Reply, ScriptedModel};

    /// An asked set holding `questions`, built through the state machine.
    fn asked_with(questions: &[&str]) -> AskedQuestions {
        let plan = SectionPlan::new([("Technical", questions.len() as u32 + 1)]);
        let (mut state, _) = SessionState::new(Profile::default(), "SWE", RoleFitResult::default())
            .apply(Event::PlanReady(plan))
            .unwrap();
        for q in questions {
            let (next, _) = state.apply(Event::QuestionReady(q.to_string())).unwrap();
            let (next, _) = next.apply(Event::AnswerCaptured("ok".to_string())).unwrap();
            state = next;
        }
        state.asked().clone()
    }

    #[tokio::test]
    async fn test_returns_first_new_question() {
        let llm = ScriptedModel::new(["  \"What is ownership in Rust?\"  "]);
        let sequencer = QuestionSequencer::new(&llm, 5);
        let question = sequencer
            .next("Technical", &Profile::default(), "SWE", &AskedQuestions::default())
            .await
            .unwrap();
        assert_eq!(question, "What is ownership in Rust?");
        assert_eq!(llm.structured_flags(), vec![false]);
    }

    #[tokio::test]
    async fn test_repeats_are_retried() {
        let asked = asked_with(&["Describe a conflict.", "Why Rust?"]);
        let llm = ScriptedModel::new(["Why Rust?", "Describe a conflict.", "What is a trait?"]);
        let sequencer = QuestionSequencer::new(&llm, 5);
        let question = sequencer
            .next("Technical", &Profile::default(), "SWE", &asked)
            .await
            .unwrap();
        assert_eq!(question, "What is a trait?");
        assert_eq!(llm.call_count(), 3);
        assert!(llm.prompts()[0].contains(r#"["Describe a conflict.","Why Rust?"]"#));
    }

    #[tokio::test]
    async fn test_section_name_with_braces_stays_literal() {
        let asked = asked_with(&["Why Rust?"]);
        let llm = ScriptedModel::new(["What is a trait object?"]);
        let sequencer = QuestionSequencer::new(&llm, 5);
        sequencer
            .next("Design {asked_json}", &Profile::default(), "SWE", &asked)
            .await
            .unwrap();
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Current Section: Design {asked_json}"));
        assert_eq!(prompt.matches(r#"["Why Rust?"]"#).count(), 1);
    }

    #[tokio::test]
    async fn test_stalls_after_retry_cap() {
        let asked = asked_with(&["Why Rust?"]);
        let llm = ScriptedModel::new(["Why Rust?"; 10]);
        let sequencer = QuestionSequencer::new(&llm, 5);
        let err = sequencer
            .next("Technical", &Profile::default(), "SWE", &asked)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InterviewError::QuestionGenerationStalled { attempts: 5 }
        ));
        assert_eq!(llm.call_count(), 5);
    }

    #[tokio::test]
    async fn test_failed_calls_count_as_attempts() {
        let llm = ScriptedModel::from_replies([
            Reply::Unavailable,
            Reply::Text("   ".to_string()),
            Reply::Text("Tell me about a project.".to_string()),
        ]);
        let sequencer = QuestionSequencer::new(&llm, 3);
        let question = sequencer
            .next("Behavioral", &Profile::default(), "SWE", &AskedQuestions::default())
            .await
            .unwrap();
        assert_eq!(question, "Tell me about a project.");
    }

    #[test]
    fn test_zero_cap_still_makes_one_attempt() {
        let llm = ScriptedModel::default();
        assert_eq!(QuestionSequencer::new(&llm, 0).retry_cap, 1);
    }
}
