//! Voice I/O collaborators.
//!
//! `VoiceOutput` speaks an utterance to completion; `VoiceInput` captures one
//! answer within a timeout. Both are best-effort from the interview's point of
//! view: [`say`] and [`hear`] log failures and degrade instead of propagating.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::warn;

use crate::errors::InterviewError;

pub mod capture;
pub mod console;
pub mod normalize;
pub mod openai;

pub use console::ConsoleVoice;
pub use openai::OpenAiVoice;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio playback failed: {0}")]
    Playback(String),

    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a capture produced no answer. Kept apart for diagnostics only.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("no speech detected before the timeout")]
    Timeout,

    #[error("speech could not be understood")]
    Unintelligible,

    #[error("speech recognition service error: {0}")]
    Service(String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait VoiceOutput: Send + Sync {
    /// Speaks `text` and returns once playback has finished.
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

#[async_trait]
pub trait VoiceInput: Send + Sync {
    /// Captures one utterance, giving up after `timeout` without speech.
    async fn listen(&self, timeout: Duration) -> Result<String, ListenError>;
}

/// Speaks `text`, logging a failure instead of returning it.
pub async fn say(output: &dyn VoiceOutput, text: &str) {
    if let Err(e) = output.speak(text).await {
        warn!("Voice output failed ({e}); continuing as if delivered");
    }
}

/// Listens for an answer. Every failure kind degrades to an empty answer;
/// the kinds differ only in what gets logged.
pub async fn hear(input: &dyn VoiceInput, timeout: Duration) -> String {
    match input.listen(timeout).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("{}; treating the answer as empty", InterviewError::from(e));
            String::new()
        }
    }
}
