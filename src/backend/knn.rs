// File: src/backend/knn.rs
use crate::backend::exact::ExactMatcher;
use crate::backend::{Query, SimilarityBackend, TrainingBatch};
use crate::core::features::FeatureVector;
use crate::core::types::Neighbor;
use crate::error::{Result, ScorerError};

/// Similarities at or below this are treated as "unrelated".
const MIN_SIMILARITY_EPS: f64 = 1e-12;

/// In-process KNN regressor over feature vectors with cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct KnnBackend {
    exact: ExactMatcher,
    features: Vec<FeatureVector>,
    targets: Vec<f64>,
}

impl KnnBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn dimension(&self) -> Option<usize> {
        self.features.first().map(FeatureVector::len)
    }

    /// Indices of stored vectors identical to `features`.
    fn identical_rows(&self, features: &FeatureVector) -> Vec<usize> {
        self.features
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| (row == features).then_some(idx))
            .collect()
    }

    /// Every stored row with positive similarity, most similar first.
    /// Equal similarities keep training order.
    fn ranked_similarities(&self, features: &FeatureVector) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .features
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx, features.cosine_similarity(row)))
            .filter(|&(_, sim)| sim > MIN_SIMILARITY_EPS)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl SimilarityBackend for KnnBackend {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn train(&mut self, batch: TrainingBatch<'_>) -> Result<()> {
        if batch.examples.len() != batch.features.len() {
            return Err(ScorerError::InvalidTrainingData(format!(
                "{} examples but {} feature rows",
                batch.examples.len(),
                batch.features.len()
            )));
        }
        if let Some(first) = batch.features.first() {
            let expected = first.len();
            if let Some(bad) = batch.features.iter().find(|row| row.len() != expected) {
                return Err(ScorerError::InvalidTrainingData(format!(
                    "all feature rows must have length {expected}, found {}",
                    bad.len()
                )));
            }
        }

        self.exact.train(batch.examples);
        self.features = batch.features.to_vec();
        self.targets = batch.examples.iter().map(|e| e.score).collect();
        tracing::debug!(rows = self.features.len(), dim = ?self.dimension(), "knn backend trained");
        Ok(())
    }

    fn find_exact(&self, text: &str) -> Result<Option<f64>> {
        Ok(self.exact.find(text))
    }

    /// A query whose vector equals one or more stored vectors short-circuits
    /// to a single neighbor carrying the mean of their scores. This includes
    /// the all-zero vector when some training texts have no vocabulary terms.
    fn find_neighbors(&self, query: Query<'_>, k: usize) -> Result<Vec<Neighbor>> {
        let Some(dimension) = self.dimension() else {
            return Ok(vec![]);
        };
        if query.features.len() != dimension {
            return Err(ScorerError::Backend(format!(
                "feature dimension mismatch: expected {dimension}, got {}",
                query.features.len()
            )));
        }

        let identical = self.identical_rows(query.features);
        if !identical.is_empty() {
            let mean = identical.iter().map(|&idx| self.targets[idx]).sum::<f64>()
                / identical.len() as f64;
            tracing::debug!(matches = identical.len(), mean, "identical feature vector");
            return Ok(vec![Neighbor::new(mean, 1.0)]);
        }

        let neighbors: Vec<Neighbor> = self
            .ranked_similarities(query.features)
            .into_iter()
            .take(k)
            .map(|(idx, sim)| Neighbor::new(self.targets[idx], sim))
            .collect();
        tracing::debug!(found = neighbors.len(), k, "knn neighbors");
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Example;

    fn fv(counts: &[u32]) -> FeatureVector {
        FeatureVector::from_counts(counts.to_vec())
    }

    fn trained(rows: &[(&str, &[u32], f64)]) -> KnnBackend {
        let examples: Vec<Example> = rows.iter().map(|(t, _, s)| Example::new(*t, *s)).collect();
        let features: Vec<FeatureVector> = rows.iter().map(|(_, f, _)| fv(f)).collect();
        let mut knn = KnnBackend::new();
        knn.train(TrainingBatch { examples: &examples, features: &features }).unwrap();
        knn
    }

    fn query<'a>(text: &'a str, features: &'a FeatureVector) -> Query<'a> {
        Query { text, features }
    }

    #[test]
    fn identical_vectors_average_all_their_scores() {
        // two distinct texts map onto the same vector
        let knn = trained(&[
            ("good product", &[1, 1, 0], 4.0),
            ("product good", &[1, 1, 0], 2.0),
            ("bad", &[0, 0, 1], 0.0),
        ]);
        let q = fv(&[1, 1, 0]);
        let neighbors = knn.find_neighbors(query("goood product", &q), 10).unwrap();
        assert_eq!(neighbors, vec![Neighbor::new(3.0, 1.0)]);
    }

    #[test]
    fn neighbors_sorted_by_similarity_and_capped_at_k() {
        let knn = trained(&[
            ("a", &[1, 0, 0], 1.0),
            ("ab", &[1, 1, 0], 2.0),
            ("abc", &[1, 1, 1], 3.0),
            ("c", &[0, 0, 1], 4.0),
        ]);
        let q = fv(&[2, 1, 0]);
        let neighbors = knn.find_neighbors(query("", &q), 2).unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].score, 2.0);
        assert_eq!(neighbors[1].score, 1.0);
        assert!(neighbors[0].weight >= neighbors[1].weight);
    }

    #[test]
    fn unrelated_rows_are_filtered_out() {
        let knn = trained(&[("a", &[1, 0], 1.0), ("b", &[0, 1], 2.0)]);
        let q = fv(&[3, 0]);
        let neighbors = knn.find_neighbors(query("", &q), 10).unwrap();
        assert_eq!(neighbors, vec![Neighbor::new(1.0, 1.0)]);
    }

    #[test]
    fn zero_query_matches_zero_rows() {
        let knn = trained(&[("a", &[1, 0], 1.0), ("oov", &[0, 0], 9.0)]);
        let q = fv(&[0, 0]);
        assert_eq!(knn.find_neighbors(query("", &q), 10).unwrap(), vec![Neighbor::new(9.0, 1.0)]);
    }

    #[test]
    fn zero_query_without_zero_rows_yields_no_neighbors() {
        let knn = trained(&[("a", &[1, 0], 1.0), ("b", &[0, 1], 2.0)]);
        let q = fv(&[0, 0]);
        assert!(knn.find_neighbors(query("", &q), 10).unwrap().is_empty());
    }

    #[test]
    fn exact_lookup_uses_text() {
        let knn = trained(&[("urgente", &[1], 5.0)]);
        assert_eq!(knn.find_exact("urgente").unwrap(), Some(5.0));
        assert_eq!(knn.find_exact("urgent").unwrap(), None);
    }

    #[test]
    fn empty_training_is_degenerate_not_an_error() {
        let mut knn = KnnBackend::new();
        knn.train(TrainingBatch { examples: &[], features: &[] }).unwrap();
        let q = fv(&[]);
        assert!(knn.find_neighbors(query("x", &q), 5).unwrap().is_empty());
        assert_eq!(knn.find_exact("x").unwrap(), None);
    }

    #[test]
    fn dimension_mismatch_is_a_backend_error() {
        let knn = trained(&[("a", &[1, 0], 1.0)]);
        let q = fv(&[1, 0, 0]);
        assert!(matches!(knn.find_neighbors(query("", &q), 3), Err(ScorerError::Backend(_))));
    }

    #[test]
    fn train_rejects_ragged_rows() {
        let examples = vec![Example::new("a", 1.0), Example::new("b", 2.0)];
        let features = vec![fv(&[1, 0]), fv(&[1])];
        let mut knn = KnnBackend::new();
        let result = knn.train(TrainingBatch { examples: &examples, features: &features });
        assert!(matches!(result, Err(ScorerError::InvalidTrainingData(_))));

        let result = knn.train(TrainingBatch { examples: &examples, features: &features[..1] });
        assert!(matches!(result, Err(ScorerError::InvalidTrainingData(_))));
    }
}
