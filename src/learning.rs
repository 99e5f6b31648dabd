// File: src/learning.rs
use crate::backend::{Query, SimilarityBackend, TrainingBatch};
use crate::config::ScoringConfig;
use crate::core::aggregator::ScoreAggregator;
use crate::core::features::FeatureExtractor;
use crate::core::normalizer::Normalizer;
use crate::core::types::{Example, TrainingSet};
use crate::core::vocabulary::Vocabulary;
use crate::error::{Result, ScorerError};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces a fresh, untrained backend for each training run.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn SimilarityBackend> + Send + Sync>;

/// Everything a trained model needs to answer queries. Never mutated after
/// construction; retraining builds a new one.
pub struct TrainedModel {
    normalizer: Normalizer,
    extractor: FeatureExtractor,
    backend: Box<dyn SimilarityBackend>,
    aggregator: ScoreAggregator,
    fallback: f64,
    k: usize,
    example_count: usize,
}

impl fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedModel")
            .field("backend", &self.backend.name())
            .field("vocabulary_size", &self.vocabulary().map_or(0, Vocabulary::len))
            .field("examples", &self.example_count)
            .field("fallback", &self.fallback)
            .field("k", &self.k)
            .finish()
    }
}

impl TrainedModel {
    /// Mean of the training scores.
    pub fn fallback_score(&self) -> f64 {
        self.fallback
    }

    /// Number of distinct training texts.
    pub fn example_count(&self) -> usize {
        self.example_count
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.extractor.vocabulary()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Exact text match first, then neighbor aggregation. Backend failures
    /// degrade to "no match" so any non-blank text gets a score.
    pub fn analyze(&self, text: &str) -> Result<f64> {
        let normalized = self.normalizer.normalize(text);
        if normalized.trim().is_empty() {
            return Err(ScorerError::BlankQuery);
        }

        match self.backend.find_exact(&normalized) {
            Ok(Some(score)) => {
                debug!(score, "exact match");
                return Ok(score);
            }
            Ok(None) => {}
            Err(e) => warn!(backend = self.backend.name(), error = %e, "exact lookup failed"),
        }

        let features = self.extractor.extract(&normalized)?;
        let query = Query { text: &normalized, features: &features };
        let neighbors = self.backend.find_neighbors(query, self.k).unwrap_or_else(|e| {
            warn!(backend = self.backend.name(), error = %e, "neighbor search failed");
            Vec::new()
        });

        let score = self.aggregator.aggregate(&neighbors, self.fallback);
        debug!(neighbors = neighbors.len(), score, "aggregated prediction");
        Ok(score)
    }
}

/// Turns a training set into a [`TrainedModel`].
pub struct LearningEngine {
    config: ScoringConfig,
    backend_factory: BackendFactory,
}

impl Default for LearningEngine {
    fn default() -> Self {
        let config = ScoringConfig::default();
        let backend = config.backend;
        Self {
            config,
            backend_factory: Arc::new(move || backend.create()),
        }
    }
}

impl LearningEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let backend = config.backend;
        Self::with_backend_factory(config, Arc::new(move || backend.create()))
    }

    pub fn with_backend_factory(config: ScoringConfig, backend_factory: BackendFactory) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend_factory })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Computes the fallback mean over the distinct texts, builds the
    /// vocabulary from their normalized forms and trains a new backend.
    ///
    /// Texts that differ only in case or spacing stay separate examples. They
    /// share one exact-lookup key, where the later one wins.
    pub fn learn(&self, training_set: &TrainingSet) -> Result<TrainedModel> {
        if training_set.is_empty() {
            return Err(ScorerError::EmptyTrainingSet);
        }

        let fallback = training_set.mean_score();
        let normalizer = self.config.normalizer;
        let examples: Vec<Example> = training_set
            .iter()
            .map(|e| Example::new(normalizer.normalize(&e.text), e.score))
            .collect();
        let texts = || examples.iter().map(|e| e.text.as_str());

        let mut extractor =
            FeatureExtractor::new(normalizer, self.config.spell, self.config.max_vocabulary);
        extractor.build(texts())?;
        let features = extractor.extract_matrix(texts())?;

        let mut backend = (self.backend_factory)();
        backend.train(TrainingBatch {
            examples: &examples,
            features: &features,
        })?;

        Ok(TrainedModel {
            normalizer,
            extractor,
            backend,
            aggregator: ScoreAggregator::new(self.config.weight_exponent)?,
            fallback,
            k: self.config.k,
            example_count: examples.len(),
        })
    }
}
