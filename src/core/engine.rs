use crate::config::ScoringConfig;
use crate::core::types::TrainingSet;
use crate::error::{Result, ScorerError};
use crate::learning::{BackendFactory, LearningEngine, TrainedModel};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// The scoring engine: learns from labeled texts and scores new ones by
/// analogy.
///
/// Training builds a complete [`TrainedModel`] off to the side and then
/// swaps it in, so concurrent `analyze` calls always see either the old or
/// the new snapshot, never a mix. `analyze` is read-only and can run from
/// any number of threads.
pub struct ScoringModel {
    learning_engine: LearningEngine,
    snapshot: RwLock<Option<Arc<TrainedModel>>>,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringModel {
    pub fn new() -> Self {
        Self::from_engine(LearningEngine::default())
    }

    pub fn with_config(config: ScoringConfig) -> Result<Self> {
        Ok(Self::from_engine(LearningEngine::new(config)?))
    }

    /// Uses a caller-supplied backend instead of `config.backend`.
    pub fn with_backend_factory(config: ScoringConfig, factory: BackendFactory) -> Result<Self> {
        Ok(Self::from_engine(LearningEngine::with_backend_factory(config, factory)?))
    }

    fn from_engine(learning_engine: LearningEngine) -> Self {
        Self {
            learning_engine,
            snapshot: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.learning_engine.config()
    }

    /// Replaces all learned state. On error the previous state is kept.
    pub fn train(&self, training_set: &TrainingSet) -> Result<()> {
        let model = self.learning_engine.learn(training_set)?;
        info!(
            examples = model.example_count(),
            backend = model.backend_name(),
            fallback = model.fallback_score(),
            "model trained"
        );
        *self.snapshot.write() = Some(Arc::new(model));
        Ok(())
    }

    /// Convenience over [`ScoringModel::train`] for `(text, score)` pairs.
    pub fn train_pairs<I, S>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.train(&pairs.into_iter().collect())
    }

    pub fn analyze(&self, text: &str) -> Result<f64> {
        let snapshot = self.snapshot().ok_or(ScorerError::ModelNotTrained)?;
        snapshot.analyze(text)
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// The current trained state, if any. Holding it keeps that state alive
    /// across later retrains.
    pub fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        self.snapshot.read().clone()
    }
}
