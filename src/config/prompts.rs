//! Prompt templates for vidchat.
//!
//! Templates are data: each declares its named slots as `{{slot}}` and every
//! slot must be provided at render time. Prompts can be customized by
//! placing TOML files in the custom prompts directory.

use crate::error::{Result, VidchatError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub condense: CondensePrompt,
    pub answer: AnswerPrompt,
}

/// Prompt for rewriting a follow-up question into a standalone question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CondensePrompt {
    pub system: String,
    pub user: String,
}

impl Default for CondensePrompt {
    fn default() -> Self {
        Self {
            system: "You rewrite conversational follow-up questions so they can be \
                     understood without the conversation."
                .to_string(),

            user: r#"Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question.

Chat History:
{{chat_history}}
Follow Up Input: {{question}}
Standalone question:"#
                .to_string(),
        }
    }
}

/// Prompt for grounded answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompt {
    pub system: String,
    pub user: String,
}

impl Default for AnswerPrompt {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful AI assistant that answers questions about a video using only its transcript.

Guidelines:
- Use only the provided context delimited by << >> to answer
- If you don't know the answer, just say you don't know. DO NOT try to make up an answer
- If the question is not related to the context, politely respond that you are tuned to only answer questions related to the video content"#
                .to_string(),

            user: r#"Context from the video transcript:
<<{{context}}>>

Question: {{question}}

Helpful answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let condense_path = custom_path.join("condense.toml");
            if condense_path.exists() {
                let content = std::fs::read_to_string(&condense_path)?;
                prompts.condense = toml::from_str(&content)?;
            }

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// List the slot names a template requires.
    pub fn required_slots(template: &str) -> Vec<String> {
        let mut slots = Vec::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            rest = &rest[start + 2..];
            if let Some(end) = rest.find("}}") {
                let name = rest[..end].trim().to_string();
                if !name.is_empty() && !slots.contains(&name) {
                    slots.push(name);
                }
                rest = &rest[end + 2..];
            } else {
                break;
            }
        }
        slots
    }

    /// Render a template, requiring a value for every slot it declares.
    ///
    /// Validated before any provider call so a malformed template fails
    /// fast instead of producing a prompt with dangling `{{slot}}` markers.
    pub fn render_checked(template: &str, vars: &HashMap<String, String>) -> Result<String> {
        let mut result = template.to_string();
        for slot in Self::required_slots(template) {
            let value = vars.get(&slot).ok_or_else(|| {
                VidchatError::InvalidInput(format!("Missing prompt variable: {}", slot))
            })?;
            result = result.replace(&format!("{{{{{}}}}}", slot), value);
        }
        Ok(result)
    }
}
