// File: src/fuzzy/levenshtein.rs

/// Classic edit distance over Unicode scalar values: insertion, deletion
/// and substitution each cost 1.
/// Complexity: O(n * m) time, O(m) memory (two rolling rows).
pub fn levenshtein(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();
    levenshtein_chars(&source, &target)
}

pub(crate) fn levenshtein_chars(source: &[char], target: &[char]) -> usize {
    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];

    for (i, &s) in source.iter().enumerate() {
        current[0] = i + 1;
        for (j, &t) in target.iter().enumerate() {
            let cost = if s == t { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(levenshtein("urgente", "urgente"), 0);
    }

    #[test]
    fn empty_operands() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", ""), 0);
    }

    #[test]
    fn single_edits() {
        assert_eq!(levenshtein("helo", "hello"), 1);
        assert_eq!(levenshtein("tst", "test"), 1);
        assert_eq!(levenshtein("cat", "cut"), 1);
        assert_eq!(levenshtein("wrold", "world"), 2);
    }

    #[test]
    fn known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(levenshtein("atención", "atencion"), 1);
        assert_eq!(levenshtein("máxima", "maxima"), 1);
    }
}
