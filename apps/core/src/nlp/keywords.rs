//! Keyword ranking by raw token frequency.
//!
//! Each text contributes its own top candidates; the candidates are then
//! merged into one corpus-wide ranking. Ties always keep first-seen order.

use super::counter::OrderedCounter;
use serde::{Deserialize, Serialize};

/// A keyword and its (cumulative) frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub frequency: usize,
}

impl KeywordCount {
    pub fn new(word: impl Into<String>, frequency: usize) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

fn into_keywords(ranked: Vec<(String, usize)>) -> Vec<KeywordCount> {
    ranked
        .into_iter()
        .map(|(word, frequency)| KeywordCount::new(word, frequency))
        .collect()
}

/// Top `limit` tokens of a single text by frequency.
pub fn extract_keywords(tokens: &[String], limit: usize) -> Vec<KeywordCount> {
    let counter: OrderedCounter<String> = tokens.iter().cloned().collect();
    into_keywords(counter.ranked(limit))
}

/// Merge per-text keyword lists into a corpus ranking bounded to `limit`.
pub fn aggregate(per_text: &[Vec<KeywordCount>], limit: usize) -> Vec<KeywordCount> {
    let mut counter = OrderedCounter::new();
    for keywords in per_text {
        for keyword in keywords {
            counter.add(keyword.word.clone(), keyword.frequency);
        }
    }
    into_keywords(counter.ranked(limit))
}
