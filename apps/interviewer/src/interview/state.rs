//! Session State Machine: the interview as a pure function of (state, event).
//!
//! Phases only move forward:
//!
//! ```text
//! Planning ──PlanReady──▶ InProgress ──(plan done | exit | exhausted)──▶ Concluding ──ReportFinished──▶ Terminated
//! ```
//!
//! `SessionState::apply` never performs I/O. It returns the next state and the
//! list of side effects the orchestrator must carry out, in order. Each
//! effect that produces a result feeds back in as the next event.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AnswerRecord, Profile, RoleFitResult, SectionPlan};

/// Fragments that end the interview when an answer contains any of them.
pub const EXIT_UTTERANCES: &[&str] = &["exit", "quit", "stop", "thanks", "thank you"];

pub const MSG_CONCLUDED: &str = "That concludes our interview. Thank you for your time.";
pub const MSG_USER_EXIT: &str = "You're welcome! It was a pleasure interviewing you.";
pub const MSG_EXHAUSTED: &str =
    "I've run out of new questions, so that concludes our interview. Thank you for your time.";
pub const MSG_REPORT_READY: &str =
    "Here is your feedback. Please check the saved file for details.";
pub const MSG_REPORT_UNAVAILABLE: &str =
    "I'm sorry, I couldn't prepare your written feedback this time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Planning,
    InProgress,
    Concluding,
    Terminated,
}

/// Why the session left `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConclusionReason {
    /// Every section reached its target.
    Completed,
    /// The candidate used an exit utterance.
    UserExit,
    /// Question generation stalled and no section had questions left.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PlanReady(SectionPlan),
    /// A question the sequencer confirmed as new.
    QuestionReady(String),
    /// The sequencer gave up on the current section.
    QuestionStalled,
    /// Capture finished; the answer may be empty.
    AnswerCaptured(String),
    ReportFinished { saved: bool },
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::PlanReady(_) => "PlanReady",
            Event::QuestionReady(_) => "QuestionReady",
            Event::QuestionStalled => "QuestionStalled",
            Event::AnswerCaptured(_) => "AnswerCaptured",
            Event::ReportFinished { .. } => "ReportFinished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Speak(String),
    RequestQuestion { section: String },
    Listen,
    MicroFeedback { question: String, answer: String },
    ComposeReport,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the section plan is empty")]
    EmptyPlan,

    #[error("event {event} is not valid in phase {phase:?}")]
    InvalidEvent { phase: Phase, event: &'static str },

    #[error("question was already asked: {0}")]
    DuplicateQuestion(String),
}

/// Every question asked this session, in asking order. Append-only.
#[derive(Debug, Clone, Default)]
pub struct AskedQuestions {
    order: Vec<String>,
    index: HashSet<String>,
}

impl AskedQuestions {
    pub fn contains(&self, question: &str) -> bool {
        self.index.contains(question)
    }

    fn insert(&mut self, question: String) -> bool {
        if !self.index.insert(question.clone()) {
            return false;
        }
        self.order.push(question);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// Questions asked per section, plus sections abandoned after a stall.
#[derive(Debug, Clone, Default)]
pub struct SectionProgress {
    asked: HashMap<String, u32>,
    exhausted: HashSet<String>,
}

impl SectionProgress {
    pub fn asked(&self, section: &str) -> u32 {
        self.asked.get(section).copied().unwrap_or(0)
    }

    pub fn is_exhausted(&self, section: &str) -> bool {
        self.exhausted.contains(section)
    }
}

/// Complete state of one interview session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub profile: Profile,
    pub role: String,
    pub fit: RoleFitResult,
    plan: SectionPlan,
    progress: SectionProgress,
    current: Option<usize>,
    asked: AskedQuestions,
    answers: Vec<AnswerRecord>,
    pending_question: Option<String>,
    phase: Phase,
    conclusion: Option<ConclusionReason>,
    report_requested: bool,
}

impl SessionState {
    /// A fresh session in `Planning`. Only created once the gate has passed.
    pub fn new(profile: Profile, role: impl Into<String>, fit: RoleFitResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            profile,
            role: role.into(),
            fit,
            plan: SectionPlan::default(),
            progress: SectionProgress::default(),
            current: None,
            asked: AskedQuestions::default(),
            answers: Vec::new(),
            pending_question: None,
            phase: Phase::Planning,
            conclusion: None,
            report_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn conclusion(&self) -> Option<ConclusionReason> {
        self.conclusion
    }

    pub fn plan(&self) -> &SectionPlan {
        &self.plan
    }

    #[cfg(test)]
    pub fn progress(&self) -> &SectionProgress {
        &self.progress
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.plan.iter().nth(i))
            .map(|s| s.name.as_str())
    }

    pub fn asked(&self) -> &AskedQuestions {
        &self.asked
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn into_answers(self) -> Vec<AnswerRecord> {
        self.answers
    }

    /// Applies one event, returning the next state and the effects to run.
    /// `self` is left untouched, so a rejected event loses nothing.
    pub fn apply(&self, event: Event) -> Result<(Self, Vec<Effect>), SessionError> {
        self.clone().step(event)
    }

    fn step(mut self, event: Event) -> Result<(Self, Vec<Effect>), SessionError> {
        let mut effects = Vec::new();

        match (self.phase, event) {
            (Phase::Planning, Event::PlanReady(plan)) => {
                if plan.is_empty() {
                    return Err(SessionError::EmptyPlan);
                }
                effects.push(Effect::Speak(format!(
                    "We will structure your interview into the following sections: {}.",
                    plan.names().join(", ")
                )));
                self.plan = plan;
                self.phase = Phase::InProgress;
                self.advance(&mut effects);
            }

            (Phase::InProgress, Event::QuestionReady(question))
                if self.pending_question.is_none() && self.current.is_some() =>
            {
                if self.asked.contains(&question) {
                    return Err(SessionError::DuplicateQuestion(question));
                }
                let section = self.current_name();
                *self.progress.asked.entry(section).or_insert(0) += 1;
                self.asked.insert(question.clone());
                effects.push(Effect::Speak(question.clone()));
                effects.push(Effect::Listen);
                self.pending_question = Some(question);
            }

            (Phase::InProgress, Event::QuestionStalled)
                if self.pending_question.is_none() && self.current.is_some() =>
            {
                let section = self.current_name();
                self.progress.exhausted.insert(section);
                self.advance(&mut effects);
            }

            (Phase::InProgress, Event::AnswerCaptured(answer))
                if self.pending_question.is_some() =>
            {
                let question = self.pending_question.take().unwrap_or_default();
                if is_exit_utterance(&answer) {
                    self.conclude(ConclusionReason::UserExit, &mut effects);
                } else {
                    let section = self.current_name();
                    self.answers.push(AnswerRecord {
                        section,
                        question: question.clone(),
                        answer: answer.clone(),
                    });
                    effects.push(Effect::MicroFeedback { question, answer });
                    self.advance(&mut effects);
                }
            }

            (Phase::Concluding, Event::ReportFinished { saved }) => {
                self.phase = Phase::Terminated;
                effects.push(Effect::Speak(
                    if saved {
                        MSG_REPORT_READY
                    } else {
                        MSG_REPORT_UNAVAILABLE
                    }
                    .to_string(),
                ));
            }

            (phase, event) => {
                return Err(SessionError::InvalidEvent {
                    phase,
                    event: event.name(),
                });
            }
        }

        Ok((self, effects))
    }

    fn current_name(&self) -> String {
        self.current_section().unwrap_or_default().to_string()
    }

    fn section_open(&self, index: usize) -> bool {
        self.plan.iter().nth(index).is_some_and(|s| {
            self.progress.asked(&s.name) < s.target && !self.progress.is_exhausted(&s.name)
        })
    }

    /// Stays on the current section while it has questions left, otherwise
    /// moves to the first open section in plan order, otherwise concludes.
    fn advance(&mut self, effects: &mut Vec<Effect>) {
        let next = match self.current {
            Some(i) if self.section_open(i) => Some(i),
            _ => (0..self.plan.len()).find(|&i| self.section_open(i)),
        };

        match next {
            Some(i) => {
                self.current = Some(i);
                effects.push(Effect::RequestQuestion {
                    section: self.current_name(),
                });
            }
            None => {
                let reason = if self.progress.exhausted.is_empty() {
                    ConclusionReason::Completed
                } else {
                    ConclusionReason::Exhausted
                };
                self.conclude(reason, effects);
            }
        }
    }

    fn conclude(&mut self, reason: ConclusionReason, effects: &mut Vec<Effect>) {
        self.phase = Phase::Concluding;
        self.conclusion = Some(reason);
        let closing = match reason {
            ConclusionReason::Completed => MSG_CONCLUDED,
            ConclusionReason::UserExit => MSG_USER_EXIT,
            ConclusionReason::Exhausted => MSG_EXHAUSTED,
        };
        effects.push(Effect::Speak(closing.to_string()));
        if !self.report_requested {
            self.report_requested = true;
            effects.push(Effect::ComposeReport);
        }
    }
}

/// Case-insensitive containment of any exit fragment, so "quitting" and
/// "stopping here" end the session too.
pub fn is_exit_utterance(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    EXIT_UTTERANCES.iter().any(|u| lowered.contains(u))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> SectionPlan {
        SectionPlan::new([("Technical", 2), ("Behavioral", 2)])
    }

    fn started(plan: SectionPlan) -> (SessionState, Vec<Effect>) {
        SessionState::new(Profile::default(), "Backend Engineer", RoleFitResult::default())
            .apply(Event::PlanReady(plan))
            .unwrap()
    }

    fn assert_quota_invariant(state: &SessionState) {
        for section in state.plan().iter() {
            assert!(
                state.progress().asked(&section.name) <= section.target,
                "section {} exceeded its target",
                section.name
            );
        }
    }

    /// Asks one question and answers it, returning the effects of the answer.
    fn ask_and_answer(
        state: SessionState,
        question: &str,
        answer: &str,
    ) -> (SessionState, Vec<Effect>) {
        let (state, effects) = state
            .apply(Event::QuestionReady(question.to_string()))
            .unwrap();
        assert_eq!(
            effects,
            vec![Effect::Speak(question.to_string()), Effect::Listen]
        );
        assert_quota_invariant(&state);
        let (state, effects) = state
            .apply(Event::AnswerCaptured(answer.to_string()))
            .unwrap();
        assert_quota_invariant(&state);
        (state, effects)
    }

    #[test]
    fn test_plan_ready_announces_and_requests_first_section() {
        let (state, effects) = started(two_by_two());
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(
            effects,
            vec![
                Effect::Speak(
                    "We will structure your interview into the following sections: Technical, Behavioral."
                        .to_string()
                ),
                Effect::RequestQuestion {
                    section: "Technical".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_plan_never_enters_in_progress() {
        let state =
            SessionState::new(Profile::default(), "Backend Engineer", RoleFitResult::default());
        let result = state.apply(Event::PlanReady(SectionPlan::default()));
        assert_eq!(result.unwrap_err(), SessionError::EmptyPlan);
    }

    #[test]
    fn test_four_answers_on_two_by_two_plan_conclude() {
        let (mut state, _) = started(two_by_two());
        for i in 1..=3 {
            let (next, effects) = ask_and_answer(state, &format!("Q{i}"), "an answer");
            assert_eq!(next.phase(), Phase::InProgress);
            assert!(matches!(effects.last(), Some(Effect::RequestQuestion { .. })));
            state = next;
        }
        let (state, effects) = ask_and_answer(state, "Q4", "final answer");

        assert_eq!(state.phase(), Phase::Concluding);
        assert_eq!(state.conclusion(), Some(ConclusionReason::Completed));
        assert_eq!(state.answers().len(), 4);
        assert_eq!(
            effects,
            vec![
                Effect::MicroFeedback {
                    question: "Q4".to_string(),
                    answer: "final answer".to_string()
                },
                Effect::Speak(MSG_CONCLUDED.to_string()),
                Effect::ComposeReport,
            ]
        );
    }

    #[test]
    fn test_sections_visited_in_plan_order() {
        let (state, _) = started(two_by_two());
        let (state, _) = ask_and_answer(state, "Q1", "a");
        assert_eq!(state.current_section(), Some("Technical"));
        let (state, effects) = ask_and_answer(state, "Q2", "b");
        assert_eq!(state.current_section(), Some("Behavioral"));
        assert_eq!(
            effects.last(),
            Some(&Effect::RequestQuestion {
                section: "Behavioral".to_string()
            })
        );
        assert_eq!(state.answers()[1].section, "Technical");
    }

    #[test]
    fn test_thank_you_on_second_question_concludes_immediately() {
        let (state, _) = started(two_by_two());
        let (state, _) = ask_and_answer(state, "Q1", "I built a cache.");
        let (state, effects) = ask_and_answer(state, "Q2", "THANK YOU");

        assert_eq!(state.phase(), Phase::Concluding);
        assert_eq!(state.conclusion(), Some(ConclusionReason::UserExit));
        assert_eq!(state.asked().len(), 2);
        assert_eq!(state.answers().len(), 1);
        assert_eq!(
            effects,
            vec![Effect::Speak(MSG_USER_EXIT.to_string()), Effect::ComposeReport]
        );

        let err = state
            .apply(Event::QuestionReady("Q3".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidEvent { .. }));
    }

    #[test]
    fn test_empty_answer_is_recorded_and_does_not_exit() {
        let (state, _) = started(two_by_two());
        let (state, effects) = ask_and_answer(state, "Q1", "");
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.answers()[0].answer, "");
        assert!(matches!(effects[0], Effect::MicroFeedback { .. }));
    }

    #[test]
    fn test_duplicate_question_is_rejected_without_recording() {
        let (state, _) = started(two_by_two());
        let (state, _) = ask_and_answer(state, "Tell me about Rust.", "ok");
        let err = state
            .apply(Event::QuestionReady("Tell me about Rust.".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::DuplicateQuestion(_)));
        assert_eq!(state.asked().len(), 1);
        assert_eq!(state.progress().asked("Technical"), 1);
    }

    #[test]
    fn test_stall_abandons_section_and_moves_on() {
        let (state, _) = started(two_by_two());
        let (state, effects) = state.apply(Event::QuestionStalled).unwrap();
        assert_eq!(
            effects,
            vec![Effect::RequestQuestion {
                section: "Behavioral".to_string()
            }]
        );
        assert!(state.progress().is_exhausted("Technical"));

        let (state, effects) = state.apply(Event::QuestionStalled).unwrap();
        assert_eq!(state.phase(), Phase::Concluding);
        assert_eq!(state.conclusion(), Some(ConclusionReason::Exhausted));
        assert_eq!(
            effects,
            vec![Effect::Speak(MSG_EXHAUSTED.to_string()), Effect::ComposeReport]
        );
    }

    #[test]
    fn test_zero_target_sections_are_skipped() {
        let plan = SectionPlan::new([("Warmup", 0), ("Technical", 1)]);
        let (state, effects) = started(plan);
        assert_eq!(state.current_section(), Some("Technical"));
        assert_eq!(
            effects[1],
            Effect::RequestQuestion {
                section: "Technical".to_string()
            }
        );
    }

    #[test]
    fn test_report_finishes_session_once() {
        let (state, _) = started(SectionPlan::new([("Technical", 1)]));
        let (state, _) = ask_and_answer(state, "Q1", "stop");
        let (state, effects) = state.apply(Event::ReportFinished { saved: true }).unwrap();
        assert_eq!(state.phase(), Phase::Terminated);
        assert_eq!(effects, vec![Effect::Speak(MSG_REPORT_READY.to_string())]);

        let err = state
            .apply(Event::ReportFinished { saved: true })
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidEvent {
                phase: Phase::Terminated,
                event: "ReportFinished"
            }
        );
    }

    #[test]
    fn test_answer_without_question_is_invalid() {
        let (state, _) = started(two_by_two());
        let err = state
            .apply(Event::AnswerCaptured("hello".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidEvent { .. }));
    }

    #[test]
    fn test_exit_vocabulary() {
        assert!(is_exit_utterance("exit"));
        assert!(is_exit_utterance("Okay, let's STOP here."));
        assert!(is_exit_utterance("thanks!"));
        assert!(is_exit_utterance("Thank you so much"));
        assert!(is_exit_utterance("I want to quit"));
        assert!(!is_exit_utterance(""));
        assert!(!is_exit_utterance("I thank my team, you know"));
    }

    #[test]
    fn test_exit_fragments_match_inside_words() {
        assert!(is_exit_utterance("I'm quitting now"));
        assert!(is_exit_utterance("Stopping here, thankyou"));
        assert!(is_exit_utterance("exiting"));
        assert!(is_exit_utterance("I wrote an unstoppable parser"));
    }
}
