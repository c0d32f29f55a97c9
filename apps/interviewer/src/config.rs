use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";
const DEFAULT_TTS_VOICE: &str = "nova";
const DEFAULT_STT_MODEL: &str = "whisper-1";
const DEFAULT_PLAYER: &str = "ffplay -nodisp -autoexit -loglevel quiet {file}";
const DEFAULT_RECORDER: &str = "arecord -q -f S16_LE -r 16000 -c 1 -d {seconds} {file}";

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to each component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub stt_model: String,
    /// How long to wait for the candidate to start answering.
    pub listen_timeout: Duration,
    /// Upper bound on the length of a single recorded answer.
    pub max_phrase: Duration,
    /// Player command line; `{file}` is replaced by the audio path.
    pub audio_player: String,
    /// Recorder command line; `{file}` and `{seconds}` are substituted.
    pub audio_recorder: String,
    pub feedback_file: PathBuf,
    /// Attempts the question sequencer makes before reporting a stall.
    pub question_retry_cap: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: env_or("INTERVIEW_MODEL", DEFAULT_MODEL),
            tts_model: env_or("TTS_MODEL", DEFAULT_TTS_MODEL),
            tts_voice: env_or("TTS_VOICE", DEFAULT_TTS_VOICE),
            stt_model: env_or("STT_MODEL", DEFAULT_STT_MODEL),
            listen_timeout: Duration::from_secs(parse_env("LISTEN_TIMEOUT_SECS", 5)?),
            max_phrase: Duration::from_secs(parse_env("MAX_PHRASE_SECS", 15)?),
            audio_player: env_or("AUDIO_PLAYER", DEFAULT_PLAYER),
            audio_recorder: env_or("AUDIO_RECORDER", DEFAULT_RECORDER),
            feedback_file: PathBuf::from(env_or("FEEDBACK_FILE", "interview_feedback.txt")),
            question_retry_cap: parse_env("QUESTION_RETRY_CAP", 5)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for unit tests; never reads the environment.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
            listen_timeout: Duration::from_secs(5),
            max_phrase: Duration::from_secs(15),
            audio_player: DEFAULT_PLAYER.to_string(),
            audio_recorder: DEFAULT_RECORDER.to_string(),
            feedback_file: PathBuf::from("interview_feedback.txt"),
            question_retry_cap: 5,
            rust_log: "info".to_string(),
        }
    }
}
