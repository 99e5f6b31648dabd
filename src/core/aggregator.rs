// File: src/core/aggregator.rs
use crate::core::types::Neighbor;
use crate::error::{Result, ScorerError};

pub const DEFAULT_WEIGHT_EXPONENT: f64 = 5.0;

/// Blends neighbor scores into one prediction.
///
/// Weights are normalized by the largest weight and raised to `exponent`,
/// so with the default exponent a single very close neighbor outweighs
/// several mediocre ones. An exponent of 1 gives a plain similarity-weighted
/// average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAggregator {
    exponent: f64,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self { exponent: DEFAULT_WEIGHT_EXPONENT }
    }
}

impl ScoreAggregator {
    pub fn new(exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(ScorerError::InvalidConfig(format!(
                "weight exponent must be a finite non-negative number, got {exponent}"
            )));
        }
        Ok(Self { exponent })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// `sum(score * w) / sum(w)` with `w = (weight / max_weight)^exponent`,
    /// falling back to `fallback` whenever no neighbor carries weight.
    pub fn aggregate(&self, neighbors: &[Neighbor], fallback: f64) -> f64 {
        if neighbors.is_empty() {
            return fallback;
        }

        let max_weight = neighbors
            .iter()
            .map(|n| n.weight)
            .filter(|w| w.is_finite())
            .fold(0.0_f64, f64::max);
        if max_weight <= 0.0 {
            return fallback;
        }

        let mut weighted_sum = 0.0;
        let mut total = 0.0;
        for neighbor in neighbors {
            if !neighbor.weight.is_finite() || neighbor.weight <= 0.0 {
                continue;
            }
            let effective = (neighbor.weight / max_weight).powf(self.exponent);
            if effective > 0.0 {
                weighted_sum += neighbor.score * effective;
                total += effective;
            }
        }

        if total > 0.0 {
            weighted_sum / total
        } else {
            fallback
        }
    }
}
