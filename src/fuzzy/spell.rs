// File: src/fuzzy/spell.rs
use crate::core::vocabulary::Vocabulary;
use crate::error::{Result, ScorerError};
use crate::fuzzy::levenshtein::levenshtein_chars;
use serde::{Deserialize, Serialize};

/// Tunable correction policy. The proportional bound
/// `min(max_dist_threshold, token_len / prop_dist_divisor)` is a heuristic,
/// not a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    pub max_dist_threshold: usize,
    pub prop_dist_divisor: usize,
    pub length_diff_tolerance: usize,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            max_dist_threshold: 3,
            prop_dist_divisor: 2,
            length_diff_tolerance: 2,
        }
    }
}

impl SpellConfig {
    pub fn validate(&self) -> Result<()> {
        if self.prop_dist_divisor == 0 {
            return Err(ScorerError::InvalidConfig(
                "prop_dist_divisor must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Largest edit distance accepted for a token of `token_len` chars.
    pub fn max_allowed_distance(&self, token_len: usize) -> usize {
        self.max_dist_threshold.min(token_len / self.prop_dist_divisor)
    }
}

/// Maps tokens to the closest vocabulary term within a bounded edit distance.
///
/// Terms are pre-split into chars once so each lookup only pays for the
/// distance computations.
#[derive(Debug, Clone)]
pub struct SpellCorrector {
    vocabulary: Vocabulary,
    term_chars: Vec<Vec<char>>,
    config: SpellConfig,
}

impl SpellCorrector {
    pub fn new(vocabulary: Vocabulary, config: SpellConfig) -> Result<Self> {
        config.validate()?;
        let term_chars = vocabulary.terms().iter().map(|t| t.chars().collect()).collect();
        Ok(Self { vocabulary, term_chars, config })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Returns the corrected form of `token`.
    ///
    /// Blank tokens and tokens with no acceptable candidate come back
    /// unchanged; a token found verbatim (after lowercasing) comes back
    /// lowercased. Among equally close candidates the first term in
    /// vocabulary order wins.
    /// Complexity: O(V * k^2) for V vocabulary terms of length ~k.
    pub fn correct(&self, token: &str) -> String {
        if token.trim().is_empty() {
            return token.to_string();
        }

        let lowered = token.to_lowercase();
        if self.vocabulary.contains(&lowered) {
            return lowered;
        }

        let lowered_chars: Vec<char> = lowered.chars().collect();
        let max_allowed = self.config.max_allowed_distance(token.chars().count());

        let mut best: Option<(usize, usize)> = None;
        for (id, term) in self.term_chars.iter().enumerate() {
            if term.len().abs_diff(lowered_chars.len()) > self.config.length_diff_tolerance {
                continue;
            }
            let distance = levenshtein_chars(&lowered_chars, term);
            if distance > max_allowed {
                continue;
            }
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((id, distance)),
            }
        }

        match best {
            Some((id, _)) => self.vocabulary.terms()[id].clone(),
            None => token.to_string(),
        }
    }
}
