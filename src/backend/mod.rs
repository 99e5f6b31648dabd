//! Similarity backends: exact stored-text lookup plus retrieval of the
//! training examples most similar to a query.
//!
//! A backend is chosen when the model is constructed ([`BackendKind`] or a
//! custom factory) and a fresh instance is trained for every training run,
//! so a trained backend is never mutated again.

pub mod exact;
pub mod index;
pub mod knn;

use crate::core::features::FeatureVector;
use crate::core::types::{Example, Neighbor};
use crate::error::{Result, ScorerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use index::IndexBackend;
pub use knn::KnnBackend;

/// Training input handed to a backend: normalized, deduplicated examples
/// and their feature vectors, row for row.
#[derive(Debug, Clone, Copy)]
pub struct TrainingBatch<'a> {
    pub examples: &'a [Example],
    pub features: &'a [FeatureVector],
}

/// A query in both representations; each backend reads the one it needs.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub text: &'a str,
    pub features: &'a FeatureVector,
}

pub trait SimilarityBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Replaces any previously trained state. Must accept an empty batch.
    fn train(&mut self, batch: TrainingBatch<'_>) -> Result<()>;

    /// Score stored for exactly this (normalized) text, if any.
    fn find_exact(&self, text: &str) -> Result<Option<f64>>;

    /// At most `k` neighbors ordered by descending weight.
    fn find_neighbors(&self, query: Query<'_>, k: usize) -> Result<Vec<Neighbor>>;
}

/// Built-in backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Cosine-similarity KNN over feature vectors.
    #[default]
    Knn,
    /// BM25 inverted index queried "more like this" style.
    Index,
}

impl BackendKind {
    pub fn create(self) -> Box<dyn SimilarityBackend> {
        match self {
            BackendKind::Knn => Box::new(KnnBackend::new()),
            BackendKind::Index => Box::new(IndexBackend::new()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Knn => write!(f, "knn"),
            BackendKind::Index => write!(f, "index"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ScorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knn" => Ok(BackendKind::Knn),
            "index" => Ok(BackendKind::Index),
            other => Err(ScorerError::InvalidConfig(format!(
                "unknown backend '{other}', expected 'knn' or 'index'"
            ))),
        }
    }
}
