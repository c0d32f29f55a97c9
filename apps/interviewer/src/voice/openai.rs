//! Speech I/O over the OpenAI audio endpoints.
//!
//! Output: `/audio/speech` → temporary mp3 → external player, run to completion.
//! Input: external recorder → temporary wav → speech check →
//! `/audio/transcriptions`.
//!
//! Temporary audio files are `NamedTempFile`s and are removed when dropped,
//! which covers every return path including playback and capture failures.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::voice::capture::{speech_onset, Onset};
use crate::voice::normalize::expand_acronyms;
use crate::voice::{ListenError, VoiceError, VoiceInput, VoiceOutput};

/// Size of a canonical PCM wav header; a capture no larger holds no audio.
const WAV_HEADER_LEN: u64 = 44;

/// Extra wait for the recorder to start and flush beyond its capture window.
const RECORDER_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct Transcription {
    #[serde(default)]
    text: String,
}

#[derive(Clone)]
pub struct OpenAiVoice {
    client: Client,
    api_key: String,
    base_url: String,
    tts_model: String,
    tts_voice: String,
    stt_model: String,
    player: String,
    recorder: String,
    max_phrase: Duration,
    scratch_dir: PathBuf,
}

impl OpenAiVoice {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
            stt_model: config.stt_model.clone(),
            player: config.audio_player.clone(),
            recorder: config.audio_recorder.clone(),
            max_phrase: config.max_phrase,
            scratch_dir: std::env::temp_dir(),
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Bytes, VoiceError> {
        let request = SpeechRequest {
            model: &self.tts_model,
            voice: &self.tts_voice,
            input: text,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VoiceError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Synthesis(format!("status {status}: {body}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| VoiceError::Synthesis(e.to_string()))
    }

    async fn play(&self, file: &Path) -> Result<(), VoiceError> {
        let mut command = command_from_template(&self.player, file, 0)
            .ok_or_else(|| VoiceError::Playback("AUDIO_PLAYER is empty".to_string()))?;
        let status = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(VoiceError::Playback(format!("player exited with {status}")))
        }
    }

    /// Writes `audio` to a temporary mp3 and plays it. The file is removed on
    /// every path, failed playback included.
    async fn play_audio(&self, audio: &[u8]) -> Result<(), VoiceError> {
        let file = tempfile::Builder::new()
            .prefix("interviewer-tts-")
            .suffix(".mp3")
            .tempfile_in(&self.scratch_dir)?;
        tokio::fs::write(file.path(), audio).await?;
        debug!("Playing {} bytes of speech from {}", audio.len(), file.path().display());
        self.play(file.path()).await
    }

    /// Records one answer into `file`. The capture window is the listen
    /// timeout plus the maximum phrase length, so an answer that starts late
    /// in the wait is not cut short.
    async fn record(&self, file: &Path, timeout: Duration) -> Result<(), ListenError> {
        let window = timeout + self.max_phrase;
        let seconds = window.as_secs().max(1);
        let mut command = command_from_template(&self.recorder, file, seconds)
            .ok_or_else(|| ListenError::Service("AUDIO_RECORDER is empty".to_string()))?;
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ListenError::Service(format!("failed to start recorder: {e}")))?;

        match tokio::time::timeout(window + RECORDER_GRACE, child.wait()).await {
            Err(_) => {
                let _ = child.kill().await;
                Err(ListenError::Timeout)
            }
            Ok(Err(e)) => Err(ListenError::Service(e.to_string())),
            Ok(Ok(status)) if !status.success() => Err(ListenError::Service(format!(
                "recorder exited with {status}"
            ))),
            Ok(Ok(_)) => Ok(()),
        }
    }

    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, ListenError> {
        let part = Part::bytes(audio)
            .file_name("answer.wav")
            .mime_str("audio/wav")
            .map_err(|e| ListenError::Service(e.to_string()))?;
        let form = Form::new()
            .text("model", self.stt_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ListenError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListenError::Service(format!("status {status}: {body}")));
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| ListenError::Service(e.to_string()))?;
        Ok(transcription.text.trim().to_string())
    }
}

#[async_trait]
impl VoiceOutput for OpenAiVoice {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let text = expand_acronyms(text);
        println!("\nInterviewer (speaking): {text}");

        let audio = self.synthesize(&text).await?;
        self.play_audio(&audio).await
    }
}

#[async_trait]
impl VoiceInput for OpenAiVoice {
    async fn listen(&self, timeout: Duration) -> Result<String, ListenError> {
        println!("\nListening... (say 'exit' to quit)");
        let file =
            capture_file(&self.scratch_dir).map_err(|e| ListenError::Service(e.to_string()))?;
        self.record(file.path(), timeout).await?;

        let audio = tokio::fs::read(file.path())
            .await
            .map_err(|e| ListenError::Service(e.to_string()))?;
        screen_capture(&audio, timeout)?;

        let text = self.transcribe(audio).await?;
        if text.is_empty() {
            return Err(ListenError::Unintelligible);
        }
        println!("You (said): {text}");
        Ok(text)
    }
}

fn capture_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("interviewer-stt-")
        .suffix(".wav")
        .tempfile_in(dir)
}

/// Rejects captures that should not be transcribed: no audio, no speech, or
/// speech that only started after `timeout`. All count as no answer.
fn screen_capture(audio: &[u8], timeout: Duration) -> Result<(), ListenError> {
    if audio.len() as u64 <= WAV_HEADER_LEN {
        return Err(ListenError::Timeout);
    }
    match speech_onset(audio) {
        Onset::Silent => {
            debug!("Capture of {} bytes held no speech", audio.len());
            Err(ListenError::Timeout)
        }
        Onset::At(onset) if onset > timeout => {
            debug!("Speech started after {onset:?}, past the {timeout:?} wait");
            Err(ListenError::Timeout)
        }
        Onset::At(_) | Onset::Unknown => Ok(()),
    }
}

/// Builds a command from a whitespace-separated template, substituting
/// `{file}` and `{seconds}` in each argument. `None` for an empty template.
fn command_from_template(template: &str, file: &Path, seconds: u64) -> Option<Command> {
    let file = file.to_string_lossy();
    let seconds = seconds.to_string();
    let mut parts = template.split_whitespace().map(|part| {
        part.replace("{file}", &file)
            .replace("{seconds}", &seconds)
    });

    let mut command = Command::new(parts.next()?);
    command.args(parts);
    Some(command)
}
