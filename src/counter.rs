//! Frequency counting and top-N ranking.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// Occurrence counts keyed by address, username or country label.
#[derive(Debug, Clone)]
pub struct FrequencyCounter<K> {
    counts: HashMap<K, u64>,
}

/// One row of a ranking produced by [`FrequencyCounter::top_n`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: u64,
    /// Share of the whole counter, not just of the ranked rows.
    pub percentage: f64,
}

impl<K> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FrequencyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, weight: u64) {
        *self.counts.entry(key).or_insert(0) += weight;
    }

    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }
}

impl<K: Eq + Hash + Ord + Clone> FrequencyCounter<K> {
    /// All entries, highest count first. Equal counts are ordered by key so
    /// the same input always ranks the same way.
    pub fn ranked(&self) -> Vec<(&K, u64)> {
        let mut rows: Vec<(&K, u64)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub fn top_n(&self, n: usize) -> Vec<RankedEntry<K>> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        self.ranked()
            .into_iter()
            .take(n)
            .map(|(key, count)| RankedEntry {
                key: key.clone(),
                count,
                percentage: 100.0 * count as f64 / total as f64,
            })
            .collect()
    }
}

impl<K: Eq + Hash> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.increment(key);
        }
        counter
    }
}
