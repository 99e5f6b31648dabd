// File: src/dataset.rs
use crate::core::types::{Example, TrainingSet};
use crate::error::{Result, ScorerError};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The two accepted on-disk shapes of a training set.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrainingSet {
    /// `{"text": score, ...}`, document order preserved.
    Map(serde_json::Map<String, Value>),
    /// `[{"text": "...", "score": n}, ...]`
    List(Vec<Example>),
}

/// Loads a JSON training set from disk. Repeated texts keep their last score.
pub fn load_training_set(path: &Path) -> Result<TrainingSet> {
    let file = File::open(path)?;
    let set = read_training_set(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), examples = set.len(), "training set loaded");
    Ok(set)
}

pub fn read_training_set<R: Read>(reader: R) -> Result<TrainingSet> {
    match serde_json::from_reader(reader)? {
        RawTrainingSet::List(examples) => Ok(examples.into_iter().collect()),
        RawTrainingSet::Map(map) => {
            let mut set = TrainingSet::new();
            for (text, value) in map {
                let score = value.as_f64().ok_or_else(|| {
                    ScorerError::InvalidTrainingData(format!("score for '{text}' is not a number: {value}"))
                })?;
                set.insert(text, score);
            }
            Ok(set)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_object_form_in_document_order() {
        let json = r#"{ "sin urgencia": 0, "urgente": 5, "es importante": 3.5 }"#;
        let set = read_training_set(json.as_bytes()).unwrap();
        let texts: Vec<&str> = set.texts().collect();
        assert_eq!(texts, vec!["sin urgencia", "urgente", "es importante"]);
        assert_eq!(set.get("es importante"), Some(3.5));
    }

    #[test]
    fn reads_list_form_with_last_wins() {
        let json = r#"[
            {"text": "x", "score": 1},
            {"text": "y", "score": 2},
            {"text": "x", "score": 3}
        ]"#;
        let set = read_training_set(json.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("x"), Some(3.0));
    }

    #[test]
    fn rejects_non_numeric_scores() {
        let json = r#"{ "urgente": "high" }"#;
        assert!(matches!(
            read_training_set(json.as_bytes()),
            Err(ScorerError::InvalidTrainingData(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(read_training_set("[1, 2".as_bytes()), Err(ScorerError::Json(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"good": 1, "bad": 0}}"#).unwrap();
        let set = load_training_set(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(matches!(
            load_training_set(Path::new("/definitely/not/here.json")),
            Err(ScorerError::Io(_))
        ));
    }
}
