use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry<K> {
    pub id: K,
    pub score: f64,
    /// Number of raw scores averaged into `score`.
    pub count: usize,
}

/// Identifier to score mapping that keeps first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable<K> {
    entries: Vec<TableEntry<K>>,
}

impl<K> ScoreTable<K> {
    pub(crate) fn from_entries(entries: Vec<TableEntry<K>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableEntry<K>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[TableEntry<K>] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.score).sum()
    }

    /// Unweighted mean over identifiers; `None` for an empty table.
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.total() / self.entries.len() as f64)
        }
    }
}

impl<K: Eq + Hash> ScoreTable<K> {
    pub fn get(&self, id: &K) -> Option<f64> {
        self.entries.iter().find(|e| &e.id == id).map(|e| e.score)
    }
}

/// Running sums per key, in first-seen order.
pub(crate) struct OrderedAccumulator<K> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl<K: Clone + Eq + Hash> OrderedAccumulator<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            sums: Vec::new(),
            counts: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K, value: f64) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.keys.len();
                self.index.insert(key.clone(), slot);
                self.keys.push(key);
                self.sums.push(0.0);
                self.counts.push(0);
                slot
            }
        };
        self.sums[slot] += value;
        self.counts[slot] += 1;
    }

    /// Yields `(key, sum, count)` in first-seen order.
    pub(crate) fn into_parts(self) -> impl Iterator<Item = (K, f64, usize)> {
        self.keys
            .into_iter()
            .zip(self.sums)
            .zip(self.counts)
            .map(|((k, s), c)| (k, s, c))
    }
}
