//! Insertion-ordered frequency counter.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts keys while remembering the order in which each key was first seen.
///
/// Ranking is a stable sort on descending count, so equal counts keep
/// first-seen order.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> OrderedCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`, registering it at the end if unseen.
    pub fn add(&mut self, key: K, amount: usize) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by descending count (stable), truncated to `limit`.
    pub fn ranked(self, limit: usize) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for OrderedCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key, 1);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let counter: OrderedCounter<&str> = ["a", "b", "a", "c", "a"].into_iter().collect();
        assert_eq!(counter.len(), 3);
        assert_eq!(counter.ranked(3), vec![("a", 3), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let counter: OrderedCounter<&str> =
            ["x", "y", "z", "y", "x", "w"].into_iter().collect();
        let ranked = counter.ranked(10);
        assert_eq!(ranked, vec![("x", 2), ("y", 2), ("z", 1), ("w", 1)]);
    }

    #[test]
    fn test_ranking_truncates() {
        let counter: OrderedCounter<&str> = ["a", "b", "c"].into_iter().collect();
        assert_eq!(counter.ranked(2).len(), 2);
    }

    #[test]
    fn test_empty_counter() {
        let counter: OrderedCounter<String> = OrderedCounter::new();
        assert!(counter.is_empty());
        assert!(counter.ranked(5).is_empty());
    }
}
