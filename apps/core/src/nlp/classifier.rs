//! Embedding-based sentiment model with lexicon fallback.
//!
//! The external model is a multilingual sentence-embedding model served by
//! FastEmbed (ONNX). A text is scored by how much closer its embedding sits to
//! a positive anchor than to a negative one. Anchors are embedded once when the
//! model loads.

use super::engines::Availability;
use super::sentiment::{clamp_score, LexiconScorer, SentimentScorer, SentimentStrategy};
use crate::error::AppError;
use std::path::Path;
use tracing::{info, warn};

#[cfg(feature = "classifier")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

/// Inputs are truncated to this many model tokens
pub const MAX_SEQUENCE_TOKENS: usize = 512;

/// Linear rescaling applied to the similarity gap before clamping
pub const SIMILARITY_RESCALE: f64 = 10.0;

#[cfg_attr(not(feature = "classifier"), allow(dead_code))]
const POSITIVE_ANCHOR: &[&str] = &[
    "良い 好き 気に入った 満足 快適 心地よい 素晴らしい",
    "good pleasant comfortable satisfying wonderful",
];

#[cfg_attr(not(feature = "classifier"), allow(dead_code))]
const NEGATIVE_ANCHOR: &[&str] = &[
    "悪い 嫌い 不快 気に入らない 不満 うるさい うっとうしい",
    "bad unpleasant uncomfortable annoying noisy",
];

/// Calculate cosine similarity between two vectors
#[cfg_attr(not(feature = "classifier"), allow(dead_code))]
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Map a (positive, negative) similarity pair onto a sentiment score.
#[cfg_attr(not(feature = "classifier"), allow(dead_code))]
fn similarity_gap_score(positive: f32, negative: f32) -> Result<f64, AppError> {
    let raw = f64::from(positive - negative) * SIMILARITY_RESCALE;
    if !raw.is_finite() {
        return Err(AppError::Component(format!(
            "non-finite similarity gap ({} / {})",
            positive, negative
        )));
    }
    Ok(raw.clamp(-1.0, 1.0))
}

/// Sentiment model backed by FastEmbed.
///
/// `TextEmbedding::embed` takes `&self`; sharing one instance across threads
/// relies on the ONNX session being reentrant.
#[cfg(feature = "classifier")]
pub struct EmbeddingSentimentModel {
    model: TextEmbedding,
    positive: Vec<f32>,
    negative: Vec<f32>,
}

#[cfg(feature = "classifier")]
impl EmbeddingSentimentModel {
    /// Load the model from (or download it into) `models_dir`.
    pub fn new(models_dir: &Path) -> Result<Self, AppError> {
        crate::fs_manager::PortablePathManager::ensure_dir(models_dir)?;

        let mut options = InitOptions::new(EmbeddingModel::MultilingualE5Small);
        options.show_download_progress = false;
        options.cache_dir = models_dir.to_path_buf();
        options.max_length = MAX_SEQUENCE_TOKENS;

        let model = TextEmbedding::try_new(options).map_err(|e| {
            AppError::DependencyUnavailable(format!("embedding model: {}", e))
        })?;

        info!("Pre-computing sentiment anchor embeddings...");
        let positive = embed_one(&model, &POSITIVE_ANCHOR.join(" "))
            .map_err(|e| AppError::DependencyUnavailable(e.to_string()))?;
        let negative = embed_one(&model, &NEGATIVE_ANCHOR.join(" "))
            .map_err(|e| AppError::DependencyUnavailable(e.to_string()))?;

        Ok(Self {
            model,
            positive,
            negative,
        })
    }
}

#[cfg(feature = "classifier")]
fn embed_one(model: &TextEmbedding, text: &str) -> Result<Vec<f32>, AppError> {
    // E5 models expect a role prefix
    let input = format!("query: {}", text);
    match model.embed(vec![input], None) {
        Ok(mut embeddings) if !embeddings.is_empty() => Ok(embeddings.swap_remove(0)),
        Ok(_) => Err(AppError::Component("empty embedding output".to_string())),
        Err(e) => Err(AppError::Component(format!("embedding inference: {}", e))),
    }
}

#[cfg(feature = "classifier")]
impl SentimentScorer for EmbeddingSentimentModel {
    fn score(&self, text: &str) -> Result<f64, AppError> {
        let embedding = embed_one(&self.model, text)?;
        let positive = cosine_similarity(&embedding, &self.positive);
        let negative = cosine_similarity(&embedding, &self.negative);
        similarity_gap_score(positive, negative)
    }

    fn strategy(&self) -> SentimentStrategy {
        SentimentStrategy::ExternalModel
    }
}

/// Outcome of one scoring call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub score: f64,
    pub strategy: SentimentStrategy,
}

/// External model (if any) plus the always-available lexicon scorer.
pub struct SentimentChain {
    primary: Option<Box<dyn SentimentScorer>>,
    lexicon: LexiconScorer,
    availability: Availability,
}

impl SentimentChain {
    /// Lexicon scorer only.
    pub fn baseline() -> Self {
        Self::without_primary(Availability::Disabled)
    }

    fn without_primary(availability: Availability) -> Self {
        Self {
            primary: None,
            lexicon: LexiconScorer::new(),
            availability,
        }
    }

    /// Use `primary` first, falling back to the lexicon per call.
    pub fn with_primary(primary: Box<dyn SentimentScorer>) -> Self {
        Self {
            primary: Some(primary),
            lexicon: LexiconScorer::new(),
            availability: Availability::Ready,
        }
    }

    /// Try to bring up the embedding model once for the process.
    pub fn resolve(enabled: bool, models_dir: &Path) -> Self {
        if !enabled {
            info!("Sentiment model disabled by configuration");
            return Self::baseline();
        }

        match load_model(models_dir) {
            Ok(primary) => {
                info!("Sentiment model ready");
                Self::with_primary(primary)
            }
            Err(availability) => Self::without_primary(availability),
        }
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Score with the external model, or the lexicon if it is absent or fails.
    pub fn score(&self, text: &str) -> Scored {
        if let Some(primary) = &self.primary {
            match primary.score(text) {
                Ok(score) if score.is_finite() => {
                    return Scored {
                        score: clamp_score(score),
                        strategy: primary.strategy(),
                    }
                }
                Ok(score) => warn!("Sentiment model returned {}, using lexicon", score),
                Err(e) => warn!("Sentiment model failed, using lexicon for this text: {}", e),
            }
        }

        Scored {
            score: self.lexicon.score_text(text),
            strategy: SentimentStrategy::Lexicon,
        }
    }
}

#[cfg(feature = "classifier")]
fn load_model(models_dir: &Path) -> Result<Box<dyn SentimentScorer>, Availability> {
    match EmbeddingSentimentModel::new(models_dir) {
        Ok(model) => Ok(Box::new(model)),
        Err(e) => {
            warn!("Failed to load embedding model for sentiment scoring: {}", e);
            Err(Availability::Failed(e.to_string()))
        }
    }
}

#[cfg(not(feature = "classifier"))]
fn load_model(_models_dir: &Path) -> Result<Box<dyn SentimentScorer>, Availability> {
    info!("Sentiment model not compiled in (enable the `classifier` feature)");
    Err(Availability::NotCompiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c) - 0.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[test]
    fn test_similarity_gap_is_rescaled_and_clamped() {
        let score = similarity_gap_score(0.85, 0.80).unwrap();
        assert!((score - 0.5).abs() < 1e-4);

        assert_eq!(similarity_gap_score(0.9, 0.1).unwrap(), 1.0);
        assert_eq!(similarity_gap_score(0.1, 0.9).unwrap(), -1.0);
    }

    #[test]
    fn test_non_finite_gap_is_component_error() {
        let result = similarity_gap_score(f32::NAN, 0.5);
        assert!(matches!(result, Err(AppError::Component(_))));
    }

    #[test]
    fn test_baseline_chain_uses_lexicon() {
        let chain = SentimentChain::baseline();
        let scored = chain.score("快適です");
        assert_eq!(scored.strategy, SentimentStrategy::Lexicon);
        assert!((scored.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_resolution_does_not_touch_models_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let models_dir = tmp.path().join("models");

        let chain = SentimentChain::resolve(false, &models_dir);
        assert_eq!(chain.availability(), &Availability::Disabled);
        assert!(!models_dir.exists());
    }
}
