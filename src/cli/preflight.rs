//! Pre-flight checks before starting a session.
//!
//! The embedding and generation providers need a credential at process
//! start; its absence is a fatal configuration error, not something to
//! discover halfway through a conversation.

use crate::error::{Result, VidchatError};

/// Check that the OpenAI API key is configured and non-empty.
pub fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(VidchatError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(VidchatError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
