use thiserror::Error;

use crate::interview::state::SessionError;
use crate::llm_client::LlmError;
use crate::voice::ListenError;

/// Interview-level error type.
///
/// Every collaborator failure is classified into one of these kinds. A
/// session cannot continue after `PlanningFailed` or a rejected transition;
/// the orchestrator degrades the others to safe defaults and keeps going.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    #[error("Question generation stalled after {attempts} attempts")]
    QuestionGenerationStalled { attempts: u32 },

    #[error("No voice input within the listening window")]
    InputTimeout,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl InterviewError {
    /// True when the session must not continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InterviewError::PlanningFailed(_)
                | InterviewError::Session(_)
                | InterviewError::Internal(_)
        )
    }
}

impl From<LlmError> for InterviewError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Parse(_) | LlmError::EmptyContent => {
                InterviewError::MalformedResponse(e.to_string())
            }
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited { .. } => {
                InterviewError::CollaboratorUnavailable(e.to_string())
            }
        }
    }
}

impl From<ListenError> for InterviewError {
    fn from(e: ListenError) -> Self {
        match e {
            ListenError::Timeout => InterviewError::InputTimeout,
            ListenError::Unintelligible => {
                InterviewError::MalformedResponse("speech was not intelligible".to_string())
            }
            ListenError::Service(msg) => InterviewError::CollaboratorUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_maps_to_malformed_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: InterviewError = LlmError::Parse(parse_err).into();
        assert!(matches!(err, InterviewError::MalformedResponse(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_api_failure_maps_to_collaborator_unavailable() {
        let err: InterviewError = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, InterviewError::CollaboratorUnavailable(_)));
    }

    #[test]
    fn test_listen_timeout_maps_to_input_timeout() {
        let err: InterviewError = ListenError::Timeout.into();
        assert!(matches!(err, InterviewError::InputTimeout));
    }

    #[test]
    fn test_collaborator_failures_are_not_fatal() {
        assert!(InterviewError::PlanningFailed("empty".to_string()).is_fatal());
        assert!(!InterviewError::QuestionGenerationStalled { attempts: 5 }.is_fatal());
        assert!(!InterviewError::InputTimeout.is_fatal());
    }
}
