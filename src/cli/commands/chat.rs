//! Interactive chat command.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::Result;
use crate::orchestrator::{LoadOutcome, Orchestrator};
use crate::session::Session;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat session.
pub async fn run_chat(url: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e);
    }

    let orchestrator = Orchestrator::new(settings)?;
    let mut session = Session::new();

    println!("\n{}", style("Vidchat").bold().cyan());
    println!(
        "{}\n",
        style("Paste a YouTube URL to load a video, then ask questions about it.").dim()
    );
    println!(
        "{}\n",
        style("Commands: 'new' starts a new chat, 'history' shows the conversation, 'exit' quits.")
            .dim()
    );

    if let Some(url) = url {
        load_video(&orchestrator, &mut session, &url).await;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        let prompt = if session.is_ready() { "You:" } else { "URL:" };
        print!("{} ", style(prompt).green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("new") {
            orchestrator.reset(&mut session);
            Output::info("Started a new chat. Paste a YouTube URL to load a video.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            if session.history().is_empty() {
                Output::info("No conversation yet.");
            } else {
                Output::header("Conversation History");
                println!();
                for turn in session.history() {
                    Output::turn(&turn.question, &turn.answer);
                }
            }
            continue;
        }

        if session.is_ready() {
            ask(&orchestrator, &mut session, input).await;
        } else {
            load_video(&orchestrator, &mut session, input).await;
        }
    }

    Ok(())
}

/// Load a video into the session, reporting the outcome.
async fn load_video(orchestrator: &Orchestrator, session: &mut Session, input: &str) {
    let spinner = Output::spinner("Loading video transcript...");

    match orchestrator.load_video(session, input).await {
        Ok(LoadOutcome::Loaded {
            title,
            chunks_indexed,
            ..
        }) => {
            spinner.finish_and_clear();
            Output::success("Video transcript loaded successfully!");
            if let Some(title) = title {
                Output::kv("Title", &title);
            }
            Output::kv("Chunks indexed", &chunks_indexed.to_string());
            println!();
        }
        Ok(LoadOutcome::CaptionsDisabled) => {
            spinner.finish_and_clear();
            Output::warning("Captions are disabled for this video, so there is no transcript.");
            Output::info("Try a different video.");
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            Output::info("Please try again with a different video URL.");
        }
    }
}

/// Ask a question in the session, reporting the answer or error.
async fn ask(orchestrator: &Orchestrator, session: &mut Session, question: &str) {
    let spinner = Output::spinner("Processing your question...");

    match orchestrator.ask(session, question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{} {}\n", style("Bot:").cyan().bold(), answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            Output::info("Your previous turns are unaffected; try rephrasing the question.");
        }
    }
}
