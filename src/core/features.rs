// File: src/core/features.rs
use crate::core::normalizer::Normalizer;
use crate::core::vocabulary::{bigram, Vocabulary, VocabularyBuilder};
use crate::error::{Result, ScorerError};
use crate::fuzzy::spell::{SpellConfig, SpellCorrector};

/// Dense term counts over a vocabulary. Position `i` counts vocabulary
/// term `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FeatureVector(Vec<u32>);

impl FeatureVector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    /// True when no vocabulary term was seen.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    fn increment(&mut self, idx: usize) {
        self.0[idx] += 1;
    }

    pub fn dot(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|&c| f64::from(c) * f64::from(c)).sum::<f64>().sqrt()
    }

    /// `dot(a, b) / (|a| * |b|)`; 0 when either side is all-zero or the
    /// dimensions disagree.
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f64 {
        if self.len() != other.len() {
            return 0.0;
        }
        let denom = self.norm() * other.norm();
        if denom > 0.0 {
            self.dot(other) / denom
        } else {
            0.0
        }
    }
}

/// Turns text into [`FeatureVector`]s over a vocabulary built from the
/// training corpus.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    normalizer: Normalizer,
    spell_config: SpellConfig,
    max_vocabulary: usize,
    corrector: Option<SpellCorrector>,
}

impl FeatureExtractor {
    pub fn new(normalizer: Normalizer, spell_config: SpellConfig, max_vocabulary: usize) -> Self {
        Self {
            normalizer,
            spell_config,
            max_vocabulary,
            corrector: None,
        }
    }

    /// Builds (or fully replaces) the vocabulary and its spelling corrector.
    pub fn build<'a, I>(&mut self, texts: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let vocabulary = VocabularyBuilder::new(self.normalizer, self.max_vocabulary).build(texts);
        self.corrector = Some(SpellCorrector::new(vocabulary, self.spell_config)?);
        Ok(())
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.corrector.as_ref().map(SpellCorrector::vocabulary)
    }

    /// Counts spell-corrected unigrams, then bigrams of the uncorrected
    /// tokens. Out-of-vocabulary terms contribute nothing.
    pub fn extract(&self, text: &str) -> Result<FeatureVector> {
        let corrector = self.corrector.as_ref().ok_or(ScorerError::VocabularyNotBuilt)?;
        let vocabulary = corrector.vocabulary();

        let tokens = self.normalizer.tokenize(text);
        let mut features = FeatureVector::zeros(vocabulary.len());

        for token in &tokens {
            let corrected = corrector.correct(token);
            if let Some(idx) = vocabulary.index_of(&corrected) {
                features.increment(idx);
            }
        }

        for pair in tokens.windows(2) {
            if let Some(idx) = vocabulary.index_of(&bigram(&pair[0], &pair[1])) {
                features.increment(idx);
            }
        }

        Ok(features)
    }

    pub fn extract_matrix<'a, I>(&self, texts: I) -> Result<Vec<FeatureVector>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|t| self.extract(t)).collect()
    }
}
