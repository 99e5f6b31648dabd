// File: src/config.rs
use crate::backend::BackendKind;
use crate::core::aggregator::{ScoreAggregator, DEFAULT_WEIGHT_EXPONENT};
use crate::core::normalizer::Normalizer;
use crate::core::vocabulary::DEFAULT_MAX_VOCABULARY;
use crate::error::{Result, ScorerError};
use crate::fuzzy::spell::SpellConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_K: usize = 10;

/// Knobs of the scoring pipeline. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Neighbors retrieved per query.
    pub k: usize,
    /// Power applied to max-normalized neighbor weights.
    pub weight_exponent: f64,
    pub max_vocabulary: usize,
    pub spell: SpellConfig,
    pub normalizer: Normalizer,
    pub backend: BackendKind,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            weight_exponent: DEFAULT_WEIGHT_EXPONENT,
            max_vocabulary: DEFAULT_MAX_VOCABULARY,
            spell: SpellConfig::default(),
            normalizer: Normalizer::default(),
            backend: BackendKind::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(ScorerError::InvalidConfig("k must be greater than 0".to_string()));
        }
        if self.max_vocabulary == 0 {
            return Err(ScorerError::InvalidConfig(
                "max_vocabulary must be greater than 0".to_string(),
            ));
        }
        self.spell.validate()?;
        ScoreAggregator::new(self.weight_exponent)?;
        Ok(())
    }

    /// Reads and validates a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: ScoringConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k, 10);
        assert_eq!(config.weight_exponent, 5.0);
        assert_eq!(config.max_vocabulary, 100);
        assert_eq!(config.backend, BackendKind::Knn);
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_k = ScoringConfig { k: 0, ..ScoringConfig::default() };
        assert!(matches!(zero_k.validate(), Err(ScorerError::InvalidConfig(_))));

        let zero_vocab = ScoringConfig { max_vocabulary: 0, ..ScoringConfig::default() };
        assert!(zero_vocab.validate().is_err());

        let mut bad_divisor = ScoringConfig::default();
        bad_divisor.spell.prop_dist_divisor = 0;
        assert!(bad_divisor.validate().is_err());

        let negative_exp = ScoringConfig { weight_exponent: -2.0, ..ScoringConfig::default() };
        assert!(negative_exp.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "k": 5, "backend": "index", "spell": { "max_dist_threshold": 1 } }"#)
                .unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.backend, BackendKind::Index);
        assert_eq!(config.spell.max_dist_threshold, 1);
        assert_eq!(config.spell.prop_dist_divisor, 2);
        assert_eq!(config.weight_exponent, 5.0);
        assert!(config.normalizer.lowercase);
    }

    #[test]
    fn loads_from_file_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "weight_exponent": 1.0 }}"#).unwrap();
        let config = ScoringConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.weight_exponent, 1.0);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{ "k": 0 }}"#).unwrap();
        assert!(matches!(
            ScoringConfig::from_json_file(bad.path()),
            Err(ScorerError::InvalidConfig(_))
        ));
    }
}
