//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{LanguageModel, LlmError};
use crate::voice::{ListenError, VoiceError, VoiceInput, VoiceOutput};

/// One canned language-model reply.
pub enum Reply {
    Text(String),
    Unavailable,
}

/// Language model that replays a fixed script, one reply per call, and
/// records every prompt it was given. Calls past the end of the script fail
/// as if the service were down.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_replies(replies.into_iter().map(|r| Reply::Text(r.into())))
    }

    pub fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A model whose first `n` calls fail.
    pub fn failing(n: usize) -> Self {
        Self::from_replies((0..n).map(|_| Reply::Unavailable))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn structured_flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(_, s)| *s).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, structured: bool) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), structured));
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Unavailable) | None => Err(LlmError::Api {
                status: 503,
                message: "scripted outage".to_string(),
            }),
        }
    }
}

/// Voice that records everything spoken and replays scripted answers.
/// Once the answers run out every capture times out.
#[derive(Default)]
pub struct ScriptedVoice {
    spoken: Mutex<Vec<String>>,
    answers: Mutex<VecDeque<Result<String, ListenError>>>,
    listens: Mutex<usize>,
}

impl ScriptedVoice {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(answers.into_iter().map(|a| Ok(a.into())))
    }

    pub fn from_results(answers: impl IntoIterator<Item = Result<String, ListenError>>) -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            answers: Mutex::new(answers.into_iter().collect()),
            listens: Mutex::new(0),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn listen_count(&self) -> usize {
        *self.listens.lock().unwrap()
    }
}

#[async_trait]
impl VoiceOutput for ScriptedVoice {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl VoiceInput for ScriptedVoice {
    async fn listen(&self, _timeout: Duration) -> Result<String, ListenError> {
        *self.listens.lock().unwrap() += 1;
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ListenError::Timeout))
    }
}
