//! Vidchat - Chat with YouTube videos
//!
//! A CLI tool that fetches a YouTube video's transcript, indexes it for
//! semantic retrieval, and answers questions about the video in a
//! conversational loop grounded in the transcript.
//!
//! # Overview
//!
//! Vidchat allows you to:
//! - Load the transcript of any captioned YouTube video
//! - Ask questions and get answers grounded in the transcript
//! - Hold a multi-turn conversation; follow-ups are condensed into
//!   standalone questions before retrieval
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `transcript` - Transcript fetching with language fallback
//! - `chunking` - Character chunking with overlap
//! - `embedding` - Embedding generation
//! - `index` - Ephemeral in-memory vector index
//! - `generation` - LLM text generation
//! - `rag` - Query condensing and grounded answer synthesis
//! - `session` - Per-conversation state
//! - `orchestrator` - The load/ask/reset pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use vidchat::config::Settings;
//! use vidchat::orchestrator::{LoadOutcome, Orchestrator};
//! use vidchat::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!     let mut session = Session::new();
//!
//!     match orchestrator.load_video(&mut session, "https://www.youtube.com/watch?v=dQw4w9WgXcQ").await? {
//!         LoadOutcome::Loaded { chunks_indexed, .. } => {
//!             println!("Indexed {} chunks", chunks_indexed);
//!             let answer = orchestrator.ask(&mut session, "What is the video about?").await?;
//!             println!("{}", answer);
//!         }
//!         LoadOutcome::CaptionsDisabled => println!("Captions are disabled for this video."),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod transcript;

pub use error::{Result, VidchatError};
