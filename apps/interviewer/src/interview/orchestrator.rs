//! Drives a session: feeds events into the state machine and carries out the
//! effects it returns against the language model and voice collaborators.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::InterviewError;
use crate::interview::feedback::{self, CompositeReport};
use crate::interview::planner::plan_sections;
use crate::interview::sequencer::QuestionSequencer;
use crate::interview::state::{
    ConclusionReason, Effect, Event, Phase, SessionError, SessionState,
};
use crate::llm_client::LanguageModel;
use crate::models::{AnswerRecord, Profile, RoleFitResult};
use crate::voice::{hear, say, VoiceInput, VoiceOutput};

/// What a finished session leaves behind.
#[derive(Debug)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub reason: ConclusionReason,
    pub answers: Vec<AnswerRecord>,
    pub questions_asked: usize,
    pub report: Option<CompositeReport>,
    /// Set only when the report was written.
    pub feedback_file: Option<PathBuf>,
}

pub struct Interviewer<'a> {
    llm: &'a dyn LanguageModel,
    output: &'a dyn VoiceOutput,
    input: &'a dyn VoiceInput,
    listen_timeout: Duration,
    retry_cap: u32,
    feedback_path: PathBuf,
}

impl<'a> Interviewer<'a> {
    pub fn new(
        config: &Config,
        llm: &'a dyn LanguageModel,
        output: &'a dyn VoiceOutput,
        input: &'a dyn VoiceInput,
    ) -> Self {
        Self {
            llm,
            output,
            input,
            listen_timeout: config.listen_timeout,
            retry_cap: config.question_retry_cap,
            feedback_path: config.feedback_file.clone(),
        }
    }

    /// Runs one interview from planning to the persisted report.
    ///
    /// Collaborator failures degrade inside the loop. Only an empty plan or an
    /// illegal transition ends the run with an error.
    pub async fn run(
        &self,
        profile: Profile,
        role: &str,
        fit: RoleFitResult,
    ) -> Result<SessionSummary, InterviewError> {
        let mut state = SessionState::new(profile, role, fit);
        info!(
            "Session {} started for role '{role}' (match score {})",
            state.id, state.fit.match_score
        );

        let plan = plan_sections(&state.profile, role, self.llm).await;
        let (next, effects) = state.apply(Event::PlanReady(plan)).map_err(|e| match e {
            SessionError::EmptyPlan => {
                InterviewError::PlanningFailed("the section planner returned no sections".to_string())
            }
            other => other.into(),
        })?;
        state = next;
        info!("Session {} plan: {:?}", state.id, state.plan().names());

        let sequencer = QuestionSequencer::new(self.llm, self.retry_cap);
        let mut queue: VecDeque<Effect> = effects.into();
        let mut report = None;
        let mut saved_to = None;

        while let Some(effect) = queue.pop_front() {
            let event = match effect {
                Effect::Speak(text) => {
                    say(self.output, &text).await;
                    None
                }
                Effect::RequestQuestion { section } => {
                    match sequencer
                        .next(&section, &state.profile, &state.role, state.asked())
                        .await
                    {
                        Ok(question) => Some(Event::QuestionReady(question)),
                        Err(e) => {
                            warn!("Abandoning section '{section}': {e}");
                            Some(Event::QuestionStalled)
                        }
                    }
                }
                Effect::Listen => {
                    let answer = hear(self.input, self.listen_timeout).await;
                    debug!("Captured answer ({} chars)", answer.len());
                    Some(Event::AnswerCaptured(answer))
                }
                Effect::MicroFeedback { question, answer } => {
                    let text = feedback::micro_feedback(
                        &state.profile,
                        &state.role,
                        &question,
                        &answer,
                        self.llm,
                    )
                    .await;
                    if !text.is_empty() {
                        println!("\nFeedback: {text}");
                        say(
                            self.output,
                            &format!("Here's some feedback on your answer: {text}"),
                        )
                        .await;
                    }
                    None
                }
                Effect::ComposeReport => {
                    let (composed, path) = self.compose_and_persist(&state).await;
                    let saved = path.is_some();
                    report = composed;
                    saved_to = path;
                    Some(Event::ReportFinished { saved })
                }
            };

            if let Some(event) = event {
                let (next, effects) = state.apply(event)?;
                state = next;
                queue.extend(effects);
            }
        }

        let reason = match (state.phase(), state.conclusion()) {
            (Phase::Terminated, Some(reason)) => reason,
            (phase, _) => {
                return Err(anyhow::anyhow!("effect queue drained in phase {phase:?}").into());
            }
        };
        info!(
            "Session {} terminated ({reason:?}) after {} questions in {}s",
            state.id,
            state.asked().len(),
            (Utc::now() - state.started_at).num_seconds()
        );

        Ok(SessionSummary {
            session_id: state.id,
            reason,
            questions_asked: state.asked().len(),
            answers: state.into_answers(),
            report,
            feedback_file: saved_to,
        })
    }

    async fn compose_and_persist(
        &self,
        state: &SessionState,
    ) -> (Option<CompositeReport>, Option<PathBuf>) {
        let Some(report) =
            feedback::composite_report(&state.profile, state.answers(), &state.role, self.llm)
                .await
        else {
            return (None, None);
        };

        println!("\nFinal Interview Feedback:\n{}", report.text);
        match feedback::persist_report(&self.feedback_path, &report).await {
            Ok(()) => {
                println!("Feedback generated and saved to {}", self.feedback_path.display());
                (Some(report), Some(self.feedback_path.clone()))
            }
            Err(e) => {
                warn!(
                    "Could not save feedback to {}: {e}",
                    self.feedback_path.display()
                );
                (Some(report), None)
            }
        }
    }
}
