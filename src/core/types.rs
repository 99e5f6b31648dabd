// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A labeled text. The score is the ground truth for that exact text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub text: String,
    pub score: f64,
}

impl Example {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self { text: text.into(), score }
    }
}

/// A retrieved training example: its stored score and a non-negative
/// relevance weight with respect to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub score: f64,
    pub weight: f64,
}

impl Neighbor {
    pub fn new(score: f64, weight: f64) -> Self {
        Self { score, weight }
    }
}

/// Ordered mapping of text -> score.
///
/// Inserting a text that is already present overwrites its score but keeps
/// the position of the first insertion.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    entries: Vec<Example>,
    positions: HashMap<String, usize>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: impl Into<String>, score: f64) {
        let text = text.into();
        if let Some(&pos) = self.positions.get(&text) {
            self.entries[pos].score = score;
        } else {
            self.positions.insert(text.clone(), self.entries.len());
            self.entries.push(Example { text, score });
        }
    }

    pub fn get(&self, text: &str) -> Option<f64> {
        self.positions.get(text).map(|&pos| self.entries[pos].score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Example> + '_ {
        self.entries.iter()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.text.as_str())
    }

    pub fn examples(&self) -> &[Example] {
        &self.entries
    }

    /// Arithmetic mean of all scores, or 0 for an empty set.
    pub fn mean_score(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let mean = self.entries.iter().map(|e| e.score).sum::<f64>() / self.entries.len() as f64;
        if mean.is_nan() {
            0.0
        } else {
            mean
        }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut set = TrainingSet::new();
        for (text, score) in iter {
            set.insert(text, score);
        }
        set
    }
}

impl FromIterator<Example> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Self {
        iter.into_iter().map(|e| (e.text, e.score)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_text_keeps_last_score_and_first_position() {
        let set: TrainingSet = vec![("x", 1.0), ("y", 2.0), ("x", 3.0)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("x"), Some(3.0));
        let texts: Vec<&str> = set.texts().collect();
        assert_eq!(texts, vec!["x", "y"]);
    }

    #[test]
    fn mean_score_of_empty_set_is_zero() {
        assert_eq!(TrainingSet::new().mean_score(), 0.0);
    }

    #[test]
    fn mean_score_uses_deduplicated_values() {
        let set: TrainingSet = vec![("a", 1.0), ("b", 3.0), ("a", 5.0)].into_iter().collect();
        assert!((set.mean_score() - 4.0).abs() < 1e-12);
    }
}
