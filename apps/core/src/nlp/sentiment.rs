//! Lexicon sentiment scoring.
//!
//! Deterministic keyword-presence scorer. Always available, and the fallback
//! for the embedding classifier.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const POSITIVE_WORDS: &[&str] = &[
    "良い",
    "いい",
    "好き",
    "気に入った",
    "満足",
    "快適",
    "心地よい",
    "素晴らしい",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "悪い",
    "嫌い",
    "不快",
    "気に入らない",
    "不満",
    "うるさい",
    "うっとうしい",
];

/// Contribution of each matched word
const WORD_WEIGHT: f64 = 0.2;

pub const MIN_SCORE: f64 = -1.0;
pub const MAX_SCORE: f64 = 1.0;

/// Which strategy produced a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentStrategy {
    ExternalModel,
    Lexicon,
}

impl SentimentStrategy {
    pub fn is_enhanced(&self) -> bool {
        matches!(self, SentimentStrategy::ExternalModel)
    }
}

/// A text-to-score strategy. Scores are expected in `[MIN_SCORE, MAX_SCORE]`.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64, AppError>;

    fn strategy(&self) -> SentimentStrategy;
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Presence-based scorer: each listed word counts once, however often it occurs.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS,
            negative: NEGATIVE_WORDS,
        }
    }

    pub fn score_text(&self, text: &str) -> f64 {
        let mut score = 0.0;
        for word in self.positive {
            if text.contains(word) {
                score += WORD_WEIGHT;
            }
        }
        for word in self.negative {
            if text.contains(word) {
                score -= WORD_WEIGHT;
            }
        }
        clamp_score(score)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, AppError> {
        Ok(self.score_text(text))
    }

    fn strategy(&self) -> SentimentStrategy {
        SentimentStrategy::Lexicon
    }
}
