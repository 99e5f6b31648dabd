// File: src/error.rs
use thiserror::Error;

/// Every failure the scoring pipeline can report.
///
/// Numeric degeneracies (zero vectors, empty neighbor lists, zero weight
/// sums) are not errors: they resolve to the fallback score.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("training set cannot be empty")]
    EmptyTrainingSet,

    #[error("model must be trained before analysis")]
    ModelNotTrained,

    #[error("input text must not be blank")]
    BlankQuery,

    /// Feature extraction was invoked before a vocabulary was built.
    /// Not reachable through `ScoringModel`.
    #[error("vocabulary not built")]
    VocabularyNotBuilt,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    /// Raised by a similarity backend. The orchestrator downgrades it to
    /// "no match" so it never reaches `analyze` callers.
    #[error("similarity backend failure: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScorerError>;
