//! Conversation orchestrator for vidchat.
//!
//! Composes the fetch/chunk/index pipeline at load time and the
//! condense/retrieve/synthesize loop per question. Session state is passed
//! explicitly to every operation; nothing lives in globals.

use crate::chunking::{split_documents, ChunkingConfig};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidchatError};
use crate::generation::{Generator, OpenAIGenerator};
use crate::index::VectorIndex;
use crate::rag::{AnswerSynthesizer, QueryCondenser};
use crate::session::Session;
use crate::transcript::{TranscriptFetcher, TranscriptSource, YoutubeClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the vidchat pipeline.
pub struct Orchestrator {
    settings: Settings,
    source: Arc<dyn TranscriptSource>,
    embedder: Arc<dyn Embedder>,
    condenser: QueryCondenser,
    synthesizer: AnswerSynthesizer,
}

/// Result of loading a video into a session.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Transcript fetched, chunked, and indexed; the session is ready.
    Loaded {
        source_id: String,
        title: Option<String>,
        chunks_indexed: usize,
    },
    /// Captions are disabled for this video. Not an error: the session is
    /// left untouched and the caller should suggest a different video.
    CaptionsDisabled,
}

impl Orchestrator {
    /// Create an orchestrator with the default providers.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let source = Arc::new(YoutubeClient::new(Duration::from_secs(
            settings.transcript.request_timeout_seconds,
        ))?);

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let generator = Arc::new(OpenAIGenerator::new(
            &settings.rag.model,
            settings.rag.temperature,
        ));

        Ok(Self::with_components(
            settings, prompts, source, embedder, generator,
        ))
    }

    /// Create an orchestrator with injected providers.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        source: Arc<dyn TranscriptSource>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let condenser = QueryCondenser::new(generator.clone(), prompts.clone());
        let synthesizer =
            AnswerSynthesizer::new(generator, prompts, settings.rag.max_context_chars);

        Self {
            settings,
            source,
            embedder,
            condenser,
            synthesizer,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load a video: fetch transcript, chunk, and build the index.
    ///
    /// The new index and an empty history are installed into the session
    /// only once everything succeeded; any failure leaves the session
    /// exactly as it was.
    #[instrument(skip(self, session), fields(input = %input))]
    pub async fn load_video(&self, session: &mut Session, input: &str) -> Result<LoadOutcome> {
        let fetcher = TranscriptFetcher::new(
            self.source.clone(),
            self.settings.transcript.languages.clone(),
        )
        .with_video_info(self.settings.transcript.add_video_info);

        let docs = fetcher.load(input).await?;
        if docs.is_empty() {
            return Ok(LoadOutcome::CaptionsDisabled);
        }

        let config = ChunkingConfig::new(
            self.settings.chunking.chunk_size,
            self.settings.chunking.overlap,
        )?;
        let chunks = split_documents(&docs, &config);

        let source_id = docs[0].source_id.clone();
        let title = docs[0]
            .metadata
            .get("title")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string());

        info!("Indexing {} chunks for video {}", chunks.len(), source_id);

        let chunks_indexed = chunks.len();
        let index = VectorIndex::build(chunks, self.embedder.clone()).await?;

        session.install_index(index);

        Ok(LoadOutcome::Loaded {
            source_id,
            title,
            chunks_indexed,
        })
    }

    /// Answer a question in the session's conversation.
    ///
    /// Condenses history plus the question into a standalone question,
    /// retrieves context, and synthesizes a grounded answer. The turn is
    /// appended to history only on success.
    #[instrument(skip(self, session), fields(question = %question))]
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<String> {
        let index = session.index().ok_or_else(|| {
            VidchatError::InvalidInput("No video loaded; load a video first".to_string())
        })?;

        let standalone = self.condenser.condense(session.history(), question).await?;

        let context = index
            .retrieve(&standalone, self.settings.rag.max_context_chunks)
            .await?;

        let answer = self.synthesizer.synthesize(&standalone, &context).await?;

        session.push_turn(question.to_string(), answer.clone());

        Ok(answer)
    }

    /// Start a new chat: discard index and history unconditionally.
    pub fn reset(&self, session: &mut Session) {
        session.reset();
    }
}
