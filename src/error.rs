//! Error types for vidchat.

use thiserror::Error;

/// Library-level error type for vidchat operations.
///
/// Disabled captions are deliberately not represented here: a video with
/// captions turned off yields an empty document list from the fetcher, not
/// an error.
#[derive(Error, Debug)]
pub enum VidchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No transcript found: {0}")]
    NoTranscriptFound(String),

    #[error("Video metadata unavailable: {0}")]
    Metadata(String),

    #[error("Cannot build an index from an empty transcript")]
    EmptyIndex,

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for vidchat operations.
pub type Result<T> = std::result::Result<T, VidchatError>;
