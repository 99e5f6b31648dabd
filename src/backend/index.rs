//! Inverted-index backend scored with BM25.
//!
//! Plays the role of an external "find similar documents" search service:
//! the query text is reduced to its most distinctive terms (by tf-idf, like
//! a more-like-this query) and matched against every indexed training text.
//! Neighbor weights are raw BM25 scores.
//!
//! The analyzer only lowercases and splits. There is no stop-word list and
//! no stemming; short function words ("de", "la", "el") are kept out of the
//! query by the minimum term length alone.

use crate::backend::exact::ExactMatcher;
use crate::backend::{Query, SimilarityBackend, TrainingBatch};
use crate::core::types::Neighbor;
use crate::error::Result;
use std::collections::HashMap;

const BM25_K1: f64 = 1.2;
const BM25_B: f64 = 0.75;

const MIN_TERM_LEN: usize = 3;
const MAX_TERM_LEN: usize = 50;
const MAX_QUERY_TERMS: usize = 15;

/// A term's occurrence count within one document.
#[derive(Debug, Clone, Copy)]
struct Posting {
    doc_id: usize,
    term_frequency: u32,
}

#[derive(Debug, Clone, Default)]
pub struct IndexBackend {
    exact: ExactMatcher,
    postings: HashMap<String, Vec<Posting>>,
    doc_lengths: Vec<u32>,
    doc_scores: Vec<f64>,
    total_doc_length: u64,
}

/// Lowercase and split on anything that is not alphanumeric.
fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, u32> {
    let mut tf: HashMap<&str, u32> = HashMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0) += 1;
    }
    tf
}

impl IndexBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }

    fn average_doc_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        self.total_doc_length as f64 / self.doc_lengths.len() as f64
    }

    fn add_document(&mut self, doc_id: usize, text: &str) {
        let tokens = analyze(text);
        self.doc_lengths.push(tokens.len() as u32);
        self.total_doc_length += tokens.len() as u64;

        for (term, tf) in term_frequencies(&tokens) {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting { doc_id, term_frequency: tf });
        }
    }

    /// BM25 idf: ln(1 + (N - df + 0.5) / (df + 0.5)).
    fn idf(&self, df: usize) -> f64 {
        let n = self.doc_count() as f64;
        let df = df as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Picks the query terms worth searching for: indexed, of a sensible
    /// length, highest tf-idf first (ties by term).
    fn select_query_terms<'q>(&self, tokens: &'q [String]) -> Vec<&'q str> {
        let mut candidates: Vec<(&str, f64)> = term_frequencies(tokens)
            .into_iter()
            .filter(|(term, _)| (MIN_TERM_LEN..=MAX_TERM_LEN).contains(&term.chars().count()))
            .filter_map(|(term, tf)| {
                let postings = self.postings.get(term)?;
                Some((term, f64::from(tf) * self.idf(postings.len())))
            })
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(MAX_QUERY_TERMS);
        candidates.into_iter().map(|(term, _)| term).collect()
    }
}

impl SimilarityBackend for IndexBackend {
    fn name(&self) -> &'static str {
        "index"
    }

    fn train(&mut self, batch: TrainingBatch<'_>) -> Result<()> {
        *self = Self::default();
        self.exact.train(batch.examples);
        for (doc_id, example) in batch.examples.iter().enumerate() {
            self.add_document(doc_id, &example.text);
            self.doc_scores.push(example.score);
        }
        tracing::debug!(
            docs = self.doc_count(),
            terms = self.postings.len(),
            "index backend trained"
        );
        Ok(())
    }

    fn find_exact(&self, text: &str) -> Result<Option<f64>> {
        Ok(self.exact.find(text))
    }

    fn find_neighbors(&self, query: Query<'_>, k: usize) -> Result<Vec<Neighbor>> {
        if self.doc_count() == 0 || k == 0 {
            return Ok(vec![]);
        }

        let tokens = analyze(query.text);
        let terms = self.select_query_terms(&tokens);
        if terms.is_empty() {
            return Ok(vec![]);
        }

        let avgdl = self.average_doc_length();
        let mut scores: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            let idf = self.idf(postings.len());
            for posting in postings {
                let dl = f64::from(self.doc_lengths[posting.doc_id]);
                let tf = f64::from(posting.term_frequency);
                let tf_norm = (tf * (BM25_K1 + 1.0))
                    / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * dl / avgdl));
                *scores.entry(posting.doc_id).or_insert(0.0) += idf * tf_norm;
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().filter(|&(_, s)| s > 0.0).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(doc_id, weight)| Neighbor::new(self.doc_scores[doc_id], weight))
            .collect())
    }
}
