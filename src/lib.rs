// src/lib.rs

pub mod backend;
pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod fuzzy;
pub mod learning;

pub use crate::backend::{BackendKind, SimilarityBackend};
pub use crate::config::ScoringConfig;
pub use crate::core::engine::ScoringModel;
pub use crate::core::types::{Example, Neighbor, TrainingSet};
pub use crate::error::{Result, ScorerError};
