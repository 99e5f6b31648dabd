// File: src/core/vocabulary.rs
use crate::core::normalizer::Normalizer;
use std::cmp::Reverse;
use std::collections::HashMap;

pub const DEFAULT_MAX_VOCABULARY: usize = 100;

/// Index of a term inside a [`Vocabulary`].
pub type TermId = usize;

/// Lexicographically ordered, deduplicated unigram and bigram terms.
/// Index assignment is fixed for the lifetime of the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, TermId>,
}

impl Vocabulary {
    /// Builds a vocabulary from terms that are already sorted and unique.
    fn from_sorted(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<TermId> {
        self.index.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}

/// Joins two adjacent tokens into a bigram term.
pub fn bigram(first: &str, second: &str) -> String {
    let mut term = String::with_capacity(first.len() + second.len() + 1);
    term.push_str(first);
    term.push(' ');
    term.push_str(second);
    term
}

/// Selects the most frequent unigrams and bigrams of a corpus.
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    normalizer: Normalizer,
    max_size: usize,
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_MAX_VOCABULARY)
    }
}

impl VocabularyBuilder {
    pub fn new(normalizer: Normalizer, max_size: usize) -> Self {
        Self { normalizer, max_size }
    }

    /// Counts every unigram and adjacent-token bigram, keeps the `max_size`
    /// most frequent (ties by ascending term) and returns them sorted.
    /// O(T + V log V) for T corpus tokens and V distinct terms.
    pub fn build<'a, I>(&self, texts: I) -> Vocabulary
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut frequencies: HashMap<String, u64> = HashMap::new();

        for text in texts {
            let tokens = self.normalizer.tokenize(text);
            for token in &tokens {
                *frequencies.entry(token.clone()).or_insert(0) += 1;
            }
            for pair in tokens.windows(2) {
                *frequencies.entry(bigram(&pair[0], &pair[1])).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, u64)> = frequencies.into_iter().collect();
        ranked.sort_by(|(a_term, a_freq), (b_term, b_freq)| {
            Reverse(a_freq).cmp(&Reverse(b_freq)).then_with(|| a_term.cmp(b_term))
        });
        ranked.truncate(self.max_size);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        tracing::debug!(size = terms.len(), max = self.max_size, "vocabulary built");
        Vocabulary::from_sorted(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let vocab = VocabularyBuilder::default().build(Vec::<&str>::new());
        assert!(vocab.is_empty());
    }

    #[test]
    fn includes_unigrams_and_bigrams_sorted() {
        let vocab = VocabularyBuilder::default().build(vec!["the cat", "the dog"]);
        assert_eq!(vocab.terms(), &["cat", "dog", "the", "the cat", "the dog"]);
        assert_eq!(vocab.index_of("the"), Some(2));
        assert_eq!(vocab.index_of("cat the"), None);
    }

    #[test]
    fn keeps_most_frequent_with_lexicographic_tie_break() {
        // "b" x3, "a" x2, "c" x2, "d" x1 -> cap 2 keeps "b" then "a" (beats "c" on the tie)
        let builder = VocabularyBuilder::new(Normalizer::default(), 2);
        let vocab = builder.build(vec!["b", "b", "b", "c", "a", "c", "a", "d"]);
        assert_eq!(vocab.terms(), &["a", "b"]);
    }

    #[test]
    fn build_is_deterministic_regardless_of_input_order() {
        let builder = VocabularyBuilder::new(Normalizer::default(), 4);
        let first = builder.build(vec!["no es urgente", "es importante", "urgente ya"]);
        let second = builder.build(vec!["urgente ya", "es importante", "no es urgente"]);
        let again = builder.build(vec!["no es urgente", "es importante", "urgente ya"]);
        assert_eq!(first, second);
        assert_eq!(first, again);
    }

    #[test]
    fn single_token_texts_produce_no_bigrams() {
        let vocab = VocabularyBuilder::default().build(vec!["urgente", "prioridad"]);
        assert!(vocab.terms().iter().all(|t| !t.contains(' ')));
    }
}
