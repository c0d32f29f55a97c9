mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod scoring;
#[cfg(test)]
mod testing;
mod voice;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::{Interviewer, SessionSummary};
use crate::llm_client::prompts::profile_json;
use crate::llm_client::LlmClient;
use crate::voice::{hear, say, ConsoleVoice, OpenAiVoice, VoiceInput, VoiceOutput};

#[derive(Parser)]
#[command(name = "interviewer")]
#[command(about = "Voice-driven mock interview against a target role")]
struct Cli {
    /// Résumé to interview from (PDF or plain text)
    #[arg(long)]
    resume: PathBuf,

    /// Target role; asked for by voice when omitted
    #[arg(long)]
    role: Option<String>,

    /// Type answers on stdin instead of speaking them
    #[arg(long)]
    text: bool,

    /// Where to write the final feedback report
    #[arg(long)]
    feedback_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = cli.feedback_out.clone() {
        config.feedback_file = path;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interviewer v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(&config);
    info!("LLM client initialized (model: {})", llm.model());

    let console;
    let speech;
    let (output, input): (&dyn VoiceOutput, &dyn VoiceInput) = if cli.text {
        console = ConsoleVoice::stdin();
        (&console, &console)
    } else {
        speech = OpenAiVoice::new(&config);
        (&speech, &speech)
    };

    let resume_text = resume::extract_text_or_empty(&cli.resume).await;
    if resume_text.is_empty() {
        warn!("No text extracted from {}; continuing with an empty profile", cli.resume.display());
    }
    let profile = resume::parse_profile(&resume_text, &llm).await;
    if profile.is_empty() {
        warn!("Profile is empty; scoring and questions will be generic");
    }
    println!("\nExtracted Profile:\n{}", profile_json(&profile));

    let role = match cli.role {
        Some(role) => role,
        None => {
            say(
                output,
                &format!(
                    "Hello {}! Please tell me the role you are applying for.",
                    profile.display_name()
                ),
            )
            .await;
            hear(input, config.listen_timeout).await
        }
    };
    if role.is_empty() {
        warn!("No target role captured; scoring against an empty role");
    }
    println!("\nTarget Role: {role}");

    let screening = scoring::screen(&profile, &role, &llm).await;
    println!(
        "\nATS Score: {}\nSummary: {}\nMissing Skills: {}",
        screening.fit.match_score,
        screening.fit.summary,
        screening.fit.missing_skills.join(", ")
    );

    if !screening.alternates.is_empty() {
        say(
            output,
            &format!(
                "I also found that your profile may fit roles like {}.",
                screening.alternates.join(", ")
            ),
        )
        .await;
    }

    if !screening.proceed {
        info!(
            "Match score {} is below the gate of {}",
            screening.fit.match_score,
            scoring::GATE_THRESHOLD
        );
        say(
            output,
            "Your ATS score is low. Consider alternate roles before the interview.",
        )
        .await;
        return Ok(());
    }

    say(
        output,
        &format!("Great! Let's begin your interview for the role of {role}."),
    )
    .await;

    let interviewer = Interviewer::new(&config, &llm, output, input);
    match interviewer.run(profile, &role, screening.fit).await {
        Ok(summary) => {
            report_summary(&summary);
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e).context("interview session failed"),
        Err(e) => {
            warn!("Interview ended early: {e}");
            Ok(())
        }
    }
}

fn report_summary(summary: &SessionSummary) {
    info!(
        "Session {} finished ({:?}): {} questions asked, {} answers recorded",
        summary.session_id,
        summary.reason,
        summary.questions_asked,
        summary.answers.len()
    );
    match (&summary.report, &summary.feedback_file) {
        (Some(report), Some(path)) => info!(
            "Final score {}/100, report saved to {}",
            report.final_score,
            path.display()
        ),
        (Some(report), None) => warn!(
            "Final score {}/100, but the report could not be saved",
            report.final_score
        ),
        (None, _) => warn!("No final report was produced"),
    }
}
