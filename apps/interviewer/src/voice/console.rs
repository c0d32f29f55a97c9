//! Terminal-backed voice: utterances are printed, answers are typed.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::voice::normalize::expand_acronyms;
use crate::voice::{ListenError, VoiceError, VoiceInput, VoiceOutput};

/// Text-mode stand-in for speech I/O, selected with `--text`.
///
/// Reads answers line by line from any buffered reader (stdin in production).
pub struct ConsoleVoice<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
}

impl ConsoleVoice {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleVoice<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> VoiceOutput for ConsoleVoice<R> {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        println!("{}", utterance_line(text));
        Ok(())
    }
}

/// What the console shows for a spoken line, normalized the same way as
/// text sent to the synthesizer.
fn utterance_line(text: &str) -> String {
    format!("\nInterviewer: {}", expand_acronyms(text))
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> VoiceInput for ConsoleVoice<R> {
    async fn listen(&self, timeout: Duration) -> Result<String, ListenError> {
        println!("\nYour answer (type 'exit' to quit):");
        let mut lines = self.lines.lock().await;
        // `next_line` is cancel-safe, so a timed-out read loses no input.
        match tokio::time::timeout(timeout, lines.next_line()).await {
            Err(_) => Err(ListenError::Timeout),
            Ok(Ok(Some(line))) => Ok(line.trim().to_string()),
            Ok(Ok(None)) => Err(ListenError::Service("input stream closed".to_string())),
            Ok(Err(e)) => Err(ListenError::Service(e.to_string())),
        }
    }
}
