// File: src/core/normalizer.rs
use serde::{Deserialize, Serialize};

/// Text normalization applied to training texts, queries and tokens alike.
///
/// Steps run in a fixed order: lowercase, strip punctuation, collapse
/// whitespace, trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalizer {
    pub lowercase: bool,
    pub trim_whitespace: bool,
    pub collapse_whitespace: bool,
    /// Replace every ASCII punctuation character by a space.
    pub strip_punctuation: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            trim_whitespace: true,
            collapse_whitespace: true,
            strip_punctuation: false,
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last_was_space = false;

        for c in text.chars() {
            let c = if self.strip_punctuation && c.is_ascii_punctuation() { ' ' } else { c };

            if c.is_whitespace() {
                if self.collapse_whitespace {
                    if !last_was_space {
                        result.push(' ');
                    }
                } else {
                    result.push(c);
                }
                last_was_space = true;
                continue;
            }
            last_was_space = false;

            if self.lowercase {
                result.extend(c.to_lowercase());
            } else {
                result.push(c);
            }
        }

        if self.trim_whitespace {
            let trimmed = result.trim();
            if trimmed.len() != result.len() {
                return trimmed.to_string();
            }
        }
        result
    }

    /// Normalizes and splits on whitespace. Blank input yields no tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn is_blank(&self, text: &str) -> bool {
        self.normalize(text).trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("  Hello \t  WORLD\n"), "hello world");
    }

    #[test]
    fn keeps_punctuation_by_default() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("Hola: ¿todo bien?"), "hola: ¿todo bien?");
    }

    #[test]
    fn strips_ascii_punctuation_when_enabled() {
        let n = Normalizer { strip_punctuation: true, ..Normalizer::default() };
        assert_eq!(n.normalize("hello@world.com, test!"), "hello world com test");
    }

    #[test]
    fn lowercases_non_ascii() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("ATENCIÓN Máxima"), "atención máxima");
    }

    #[test]
    fn tokenize_splits_on_whitespace() {
        let n = Normalizer::new();
        assert_eq!(n.tokenize("No es   urgente"), vec!["no", "es", "urgente"]);
    }

    #[test]
    fn tokenize_blank_is_empty() {
        let n = Normalizer::new();
        assert!(n.tokenize("").is_empty());
        assert!(n.tokenize("   \n\t").is_empty());
        assert!(n.is_blank("  \n "));
        assert!(!n.is_blank(" a "));
    }

    #[test]
    fn without_collapse_inner_whitespace_is_preserved() {
        let n = Normalizer { collapse_whitespace: false, ..Normalizer::default() };
        assert_eq!(n.normalize(" a  b "), "a  b");
        assert_eq!(n.tokenize(" a  b "), vec!["a", "b"]);
    }
}
