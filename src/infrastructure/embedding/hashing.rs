use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::domain::embedding::{normalize, EmbeddingProvider};
use crate::domain::DomainError;

const DEFAULT_DIMENSIONS: usize = 384;

/// Deterministic local embedder using the hashing trick.
///
/// Tokens are feature-hashed into a fixed-size vector with a signed
/// contribution, then L2-normalized. No network calls and no model files,
/// which makes it the default for local runs and tests. Quality is
/// keyword-overlap level, not semantic.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let digest = hasher.finish();

            let slot = (digest % self.dimensions as u64) as usize;
            let sign = if digest & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        normalize(&mut vector);
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &'static str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embeddings_are_deterministic() {
        let embedder = HashingEmbedder::default();
        let texts = vec!["Goa has beautiful beaches".to_string()];

        let a = embedder.embed(&texts).await.unwrap();
        let b = embedder.embed(&texts).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_embeddings_are_normalized() {
        let embedder = HashingEmbedder::default();
        let texts = vec!["desert forts and palaces in rajasthan".to_string()];

        let vectors = embedder.embed(&texts).await.unwrap();
        let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_tokens_score_higher() {
        let embedder = HashingEmbedder::default();
        let texts = vec![
            "beaches nightlife seafood".to_string(),
            "desert forts palaces".to_string(),
            "sunny beaches".to_string(),
        ];

        let vectors = embedder.embed(&texts).await.unwrap();
        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };

        let beach_vs_beach = dot(&vectors[0], &vectors[2]);
        let desert_vs_beach = dot(&vectors[1], &vectors[2]);
        assert!(beach_vs_beach > desert_vs_beach);
    }

    #[tokio::test]
    async fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashingEmbedder::default();
        let vectors = embedder.embed(&["   ".to_string()]).await.unwrap();
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        let tokens: Vec<String> = tokenize("Goa, India: beaches!").collect();
        assert_eq!(tokens, vec!["goa", "india", "beaches"]);
    }
}
