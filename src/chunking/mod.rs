//! Transcript chunking for retrieval.
//!
//! Splits transcripts into bounded-size character chunks with optional
//! overlap. Cuts prefer natural boundaries (paragraph break, sentence end,
//! word) within the window and fall back to a hard cut. All offsets are in
//! characters, never bytes, so multibyte text is never split mid-codepoint.
//!
//! The split is deterministic and reconstructible: each chunk after the
//! first starts exactly `overlap` characters before the previous chunk's
//! end, so concatenating the non-overlapping portions yields the original
//! text.

use crate::error::{Result, VidchatError};
use crate::transcript::TranscriptDocument;
use serde::{Deserialize, Serialize};

/// A chunk of transcript text, the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Video id of the parent document.
    pub source_id: String,
    /// Text content of this chunk.
    pub text: String,
    /// Position of this chunk in the original transcript.
    pub order: usize,
    /// Metadata inherited from the parent document.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters.
    pub overlap: usize,
}

impl ChunkingConfig {
    /// Create a validated config. The overlap must be strictly smaller than
    /// the chunk size so every chunk makes forward progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(VidchatError::InvalidInput(
                "Chunk size must be positive".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(VidchatError::InvalidInput(format!(
                "Overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 0,
        }
    }
}

/// Split documents into ordered chunks, propagating metadata.
///
/// An empty input produces an empty output without error; callers detect
/// the empty case explicitly.
pub fn split_documents(docs: &[TranscriptDocument], config: &ChunkingConfig) -> Vec<TextChunk> {
    let mut chunks = Vec::new();

    for doc in docs {
        for (order, text) in split_text(&doc.text, config).into_iter().enumerate() {
            chunks.push(TextChunk {
                source_id: doc.source_id.clone(),
                text,
                order,
                metadata: doc.metadata.clone(),
            });
        }
    }

    chunks
}

/// Split a text into chunks of at most `chunk_size` characters.
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    if total == 0 {
        return Vec::new();
    }
    if total <= config.chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let window_end = (start + config.chunk_size).min(total);
        let end = if window_end == total {
            total
        } else {
            find_cut(&chars, start, window_end, config.overlap)
        };

        chunks.push(chars[start..end].iter().collect());

        if end == total {
            break;
        }
        // Next chunk begins `overlap` characters before this one's end
        start = end - config.overlap;
    }

    chunks
}

/// Pick a cut position in `(start + overlap, window_end]`, preferring a
/// paragraph break, then a sentence end, then a space, then the hard limit.
/// The lower bound keeps the next start strictly past the current one.
fn find_cut(chars: &[char], start: usize, window_end: usize, overlap: usize) -> usize {
    let min_cut = start + overlap + 1;

    for boundary in [&['\n', '\n'][..], &['.', ' '][..], &[' '][..]] {
        if let Some(cut) = rfind_boundary(chars, min_cut, window_end, boundary) {
            return cut;
        }
    }

    window_end
}

/// Find the last position in `[min_cut, window_end]` that immediately
/// follows `boundary`.
fn rfind_boundary(
    chars: &[char],
    min_cut: usize,
    window_end: usize,
    boundary: &[char],
) -> Option<usize> {
    let len = boundary.len();
    (min_cut.max(len)..=window_end)
        .rev()
        .find(|&cut| &chars[cut - len..cut] == boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig::new(chunk_size, overlap).unwrap()
    }

    /// Concatenate chunks' non-overlapping portions.
    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut result = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                result.push_str(chunk);
            } else {
                result.extend(chunk.chars().skip(overlap));
            }
        }
        result
    }

    #[test]
    fn test_config_validation() {
        assert!(ChunkingConfig::new(0, 0).is_err());
        assert!(ChunkingConfig::new(10, 10).is_err());
        assert!(ChunkingConfig::new(10, 15).is_err());
        assert!(ChunkingConfig::new(10, 9).is_ok());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("Hello world.", &config(100, 0));
        assert_eq!(chunks, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn test_round_trip_no_overlap() {
        let text = "Hello world. This is a test. Another sentence here, a bit longer. And more.";
        let chunks = split_text(text, &config(15, 0));
        assert!(chunks.len() >= 2);
        assert_eq!(reconstruct(&chunks, 0), text);
    }

    #[test]
    fn test_round_trip_with_overlap() {
        let text =
            "One two three four five six seven eight nine ten eleven twelve thirteen fourteen.";
        for overlap in [1, 3, 7] {
            let chunks = split_text(text, &config(20, overlap));
            assert_eq!(reconstruct(&chunks, overlap), text, "overlap {}", overlap);

            // Each chunk shares its first `overlap` chars with the prior tail
            for pair in chunks.windows(2) {
                let prior_tail: String = pair[0]
                    .chars()
                    .skip(pair[0].chars().count() - overlap)
                    .collect();
                let next_head: String = pair[1].chars().take(overlap).collect();
                assert_eq!(prior_tail, next_head);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "a b c d e f g h i j k l m n o p q r s t u v w x y z".repeat(10);
        let a = split_text(&text, &config(37, 5));
        let b = split_text(&text, &config(37, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_prefers_word_boundary() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = split_text(text, &config(12, 0));
        // Cuts land after a space rather than mid-word
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with(' '), "chunk {:?} should end at a space", chunk);
        }
        assert_eq!(reconstruct(&chunks, 0), text);
    }

    #[test]
    fn test_prefers_paragraph_boundary() {
        let text = "First paragraph.\n\nSecond one follows here with more text.";
        let chunks = split_text(text, &config(25, 0));
        assert_eq!(chunks[0], "First paragraph.\n\n");
    }

    #[test]
    fn test_hard_cut_without_separators() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = split_text(text, &config(10, 2));
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(reconstruct(&chunks, 2), text);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "æøå ".repeat(20);
        let chunks = split_text(&text, &config(11, 3));
        assert_eq!(reconstruct(&chunks, 3), text);
    }

    #[test]
    fn test_split_documents_empty_input() {
        let chunks = split_documents(&[], &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_split_documents_propagates_metadata() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("source".to_string(), "abc123".into());
        metadata.insert("title".to_string(), "Test".into());

        let doc = TranscriptDocument {
            source_id: "abc123".to_string(),
            text: "Hello world. This is a test.".to_string(),
            metadata,
        };

        let chunks = split_documents(std::slice::from_ref(&doc), &config(15, 0));
        assert!(chunks.len() >= 2);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.source_id, "abc123");
            assert_eq!(chunk.order, i);
            assert_eq!(chunk.metadata["title"], "Test");
        }
    }
}
