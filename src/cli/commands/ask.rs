//! Ask command implementation: load a video and answer one question.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::orchestrator::{LoadOutcome, Orchestrator};
use crate::session::Session;
use anyhow::Result;

/// Run the one-shot ask command.
pub async fn run_ask(url: &str, question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let mut session = Session::new();

    let spinner = Output::spinner("Loading video transcript...");
    let outcome = orchestrator.load_video(&mut session, url).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(LoadOutcome::Loaded { chunks_indexed, .. }) => {
            Output::success(&format!("Transcript loaded ({} chunks)", chunks_indexed));
        }
        Ok(LoadOutcome::CaptionsDisabled) => {
            Output::warning("Captions are disabled for this video, so there is no transcript.");
            return Ok(());
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    let spinner = Output::spinner("Processing your question...");
    match orchestrator.ask(&mut session, question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
