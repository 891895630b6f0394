//! Text generation for condensing and answer synthesis.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for language-generation providers.
///
/// The core treats generation as a black box: a system instruction plus a
/// rendered prompt in, text out.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for a prompt.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}
