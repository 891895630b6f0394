//! Follow-up question condensing.

use super::format_history;
use crate::config::Prompts;
use crate::error::Result;
use crate::generation::Generator;
use crate::session::Turn;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Rewrites a follow-up question into a standalone question.
pub struct QueryCondenser {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl QueryCondenser {
    pub fn new(generator: Arc<dyn Generator>, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    /// Condense history plus a question into a history-independent question.
    ///
    /// The first turn is returned unchanged without touching the provider.
    /// No retries; a provider failure propagates. An empty generation falls
    /// back to the raw question so the result is never empty.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn condense(&self, history: &[Turn], question: &str) -> Result<String> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let mut vars = HashMap::new();
        vars.insert("chat_history".to_string(), format_history(history));
        vars.insert("question".to_string(), question.to_string());

        let prompt = Prompts::render_checked(&self.prompts.condense.user, &vars)?;
        let standalone = self
            .generator
            .generate(&self.prompts.condense.system, &prompt)
            .await?;

        let standalone = standalone.trim();
        if standalone.is_empty() {
            debug!("Condenser returned nothing, keeping the raw question");
            return Ok(question.to_string());
        }

        debug!("Condensed {:?} into {:?}", question, standalone);
        Ok(standalone.to_string())
    }
}
