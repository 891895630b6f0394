//! Grounded answer synthesis.

use crate::config::Prompts;
use crate::error::Result;
use crate::generation::Generator;
use crate::index::ScoredChunk;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Generates an answer constrained to the retrieved transcript context.
pub struct AnswerSynthesizer {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    max_context_chars: usize,
}

impl AnswerSynthesizer {
    pub fn new(generator: Arc<dyn Generator>, prompts: Prompts, max_context_chars: usize) -> Self {
        Self {
            generator,
            prompts,
            max_context_chars,
        }
    }

    /// Answer a standalone question from ranked context chunks.
    ///
    /// The answer template instructs the model to use only the given
    /// context and to decline rather than fabricate, so the result may be
    /// an "I don't know" style response.
    #[instrument(skip(self, context), fields(chunks = context.len()))]
    pub async fn synthesize(&self, question: &str, context: &[ScoredChunk]) -> Result<String> {
        let context_text = build_context(context, self.max_context_chars);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let prompt = Prompts::render_checked(&self.prompts.answer.user, &vars)?;
        let answer = self
            .generator
            .generate(&self.prompts.answer.system, &prompt)
            .await?;

        debug!("Synthesized answer of {} characters", answer.len());
        Ok(answer.trim().to_string())
    }
}

/// Concatenate chunk texts in rank order up to a character budget.
///
/// Deterministic truncation: chunks are taken highest-similarity first and
/// the first chunk that would exceed the budget (and everything after it)
/// is dropped. The top-ranked chunk is always included so the context is
/// never empty when any chunk was retrieved.
fn build_context(context: &[ScoredChunk], max_chars: usize) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut used = 0usize;

    for (i, scored) in context.iter().enumerate() {
        let len = scored.chunk.text.chars().count();
        if i > 0 && used + len > max_chars {
            break;
        }
        parts.push(&scored.chunk.text);
        used += len;
    }

    parts.join("\n\n")
}
