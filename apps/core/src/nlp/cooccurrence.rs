//! Windowed token co-occurrence counting.

use super::counter::OrderedCounter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An unordered token pair, stored with `word1 <= word2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrencePair {
    pub word1: String,
    pub word2: String,
    pub frequency: usize,
}

/// Sort two tokens so that (a, b) and (b, a) name the same pair.
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Counts token pairs that occur within `window` forward positions of each other.
#[derive(Debug, Clone)]
pub struct CooccurrenceBuilder {
    window: usize,
    limit: usize,
}

impl CooccurrenceBuilder {
    pub fn new(window: usize, limit: usize) -> Self {
        Self { window, limit }
    }

    /// Pair counts across all sequences, in first-seen order.
    pub fn count(&self, sequences: &[Vec<String>]) -> OrderedCounter<(String, String)> {
        let mut counter = OrderedCounter::new();
        for tokens in sequences {
            for (i, left) in tokens.iter().enumerate() {
                let end = i.saturating_add(1).saturating_add(self.window).min(tokens.len());
                for right in &tokens[i + 1..end] {
                    counter.add(canonical_pair(left, right), 1);
                }
            }
        }
        counter
    }

    /// Top pairs by frequency; ties keep first-seen order.
    pub fn build(&self, sequences: &[Vec<String>]) -> Vec<CooccurrencePair> {
        let counter = self.count(sequences);
        if counter.is_empty() {
            return Vec::new();
        }
        debug!("{} distinct token pairs", counter.len());

        counter
            .ranked(self.limit)
            .into_iter()
            .map(|((word1, word2), frequency)| CooccurrencePair {
                word1,
                word2,
                frequency,
            })
            .collect()
    }
}
