pub mod levenshtein;
pub mod spell;
