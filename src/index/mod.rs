//! Ephemeral in-memory vector index.
//!
//! Built once per loaded video and discarded on reset; there is no
//! incremental update and no persistence.

use crate::chunking::TextChunk;
use crate::embedding::Embedder;
use crate::error::{Result, VidchatError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A chunk paired with its embedding, never mutated after build.
#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: TextChunk,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: TextChunk,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// In-memory vector index over transcript chunks.
pub struct VectorIndex {
    entries: Vec<IndexedChunk>,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl VectorIndex {
    /// Build an index by embedding every chunk.
    ///
    /// All-or-nothing: an embedding failure leaves no partial index behind,
    /// and an empty chunk list is rejected since an empty index cannot
    /// answer retrieval queries.
    #[instrument(skip(chunks, embedder), fields(chunks = chunks.len()))]
    pub async fn build(chunks: Vec<TextChunk>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(VidchatError::EmptyIndex);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(VidchatError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect::<Vec<_>>();

        debug!("Built vector index with {} entries", entries.len());

        Ok(Self { entries, embedder })
    }

    /// Retrieve the top `k` chunks for a query, ranked by descending cosine
    /// similarity. Ties keep original chunk insertion order (stable sort).
    #[instrument(skip(self), fields(query = %query))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic fake: embeds a text as letter-frequency counts.
    struct FakeEmbedder;

    fn letter_counts(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; 26];
        for c in text.to_lowercase().chars() {
            if c.is_ascii_lowercase() {
                v[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        v
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(letter_counts(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| letter_counts(t)).collect())
        }

        fn dimensions(&self) -> usize {
            26
        }
    }

    /// Fake that always fails, for provider-error propagation.
    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(VidchatError::Embedding("provider down".to_string()))
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(VidchatError::Embedding("provider down".to_string()))
        }

        fn dimensions(&self) -> usize {
            26
        }
    }

    fn chunk(text: &str, order: usize) -> TextChunk {
        TextChunk {
            source_id: "abc123".to_string(),
            text: text.to_string(),
            order,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert!((cosine_similarity(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_build_is_rejected() {
        let err = VectorIndex::build(Vec::new(), Arc::new(FakeEmbedder))
            .await
            .unwrap_err();
        assert!(matches!(err, VidchatError::EmptyIndex));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_distinctly() {
        let err = VectorIndex::build(vec![chunk("hello", 0)], Arc::new(BrokenEmbedder))
            .await
            .unwrap_err();
        assert!(matches!(err, VidchatError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_retrieve_ranked_and_idempotent() {
        let chunks = vec![
            chunk("zebra zoo zzz", 0),
            chunk("hello hello hello", 1),
            chunk("hello world", 2),
        ];
        let index = VectorIndex::build(chunks, Arc::new(FakeEmbedder))
            .await
            .unwrap();
        assert_eq!(index.len(), 3);

        let results = index.retrieve("hello", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].chunk.order, 1);

        let again = index.retrieve("hello", 2).await.unwrap();
        let orders: Vec<usize> = results.iter().map(|r| r.chunk.order).collect();
        let orders_again: Vec<usize> = again.iter().map(|r| r.chunk.order).collect();
        assert_eq!(orders, orders_again);
    }

    #[tokio::test]
    async fn test_retrieve_clamps_k() {
        let index = VectorIndex::build(vec![chunk("only one", 0)], Arc::new(FakeEmbedder))
            .await
            .unwrap();
        let results = index.retrieve("one", 10).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        // Identical texts embed identically, so all scores tie
        let chunks = vec![chunk("same", 0), chunk("same", 1), chunk("same", 2)];
        let index = VectorIndex::build(chunks, Arc::new(FakeEmbedder))
            .await
            .unwrap();

        let results = index.retrieve("same", 3).await.unwrap();
        let orders: Vec<usize> = results.iter().map(|r| r.chunk.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
