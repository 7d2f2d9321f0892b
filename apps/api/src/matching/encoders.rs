//! Encoder bank: the categorical vocabularies used at training time and the
//! target mapping from class index back to career name.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// On-disk layout shared by every encoder artifact: `{"classes": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderArtifact {
    pub classes: Vec<String>,
}

/// Lower-cases and trims a user-supplied skill or interest.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Multi-hot vocabulary (skills, interests). Each class becomes one indicator column.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    classes: Vec<String>,
    known: HashSet<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from raw class names. Classes are normalized; a class that
    /// normalizes to an already-seen one is dropped.
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut known = HashSet::new();
        for class in classes {
            let class = normalize(class.as_ref());
            if known.insert(class.clone()) {
                ordered.push(class);
            }
        }
        Self {
            classes: ordered,
            known,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// `value` must already be normalized.
    pub fn contains(&self, value: &str) -> bool {
        self.known.contains(value)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }
}

/// Label encoder for education: the code is the class position. Matching is exact
/// (case preserved); callers only trim.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            codes.entry(class.clone()).or_insert(code);
        }
        Self { classes, codes }
    }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.codes.get(value).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Maps predicted class indices to career names.
#[derive(Debug, Clone)]
pub struct TargetEncoder {
    classes: Vec<String>,
}

impl TargetEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn decode(&self, class_index: usize) -> Option<&str> {
        self.classes.get(class_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }
}

/// All encoders the feature assembler and the explanation step read from.
#[derive(Debug, Clone)]
pub struct EncoderBank {
    pub skills: Vocabulary,
    pub interests: Vocabulary,
    pub education: LabelEncoder,
    pub target: TargetEncoder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Python "), "python");
        assert_eq!(normalize("SQL"), "sql");
    }

    #[test]
    fn test_vocabulary_normalizes_and_dedupes() {
        let vocab = Vocabulary::new(["Python", "python ", "SQL"]);
        assert_eq!(vocab.classes(), &["python".to_string(), "sql".to_string()]);
        assert!(vocab.contains("sql"));
        assert!(!vocab.contains("SQL"));
    }

    #[test]
    fn test_label_encoder_is_case_sensitive() {
        let enc = LabelEncoder::new(["bachelor's", "master's", "phd"]);
        assert_eq!(enc.encode("master's"), Some(1));
        assert_eq!(enc.encode("Master's"), None);
        assert_eq!(enc.classes().len(), 3);
    }

    #[test]
    fn test_target_decode_out_of_range() {
        let target = TargetEncoder::new(["Accountant", "Data Scientist"]);
        assert_eq!(target.decode(1), Some("Data Scientist"));
        assert_eq!(target.decode(2), None);
    }

    #[test]
    fn test_encoder_artifact_parses() {
        let artifact: EncoderArtifact =
            serde_json::from_str(r#"{"classes": ["python", "sql"]}"#).unwrap();
        assert_eq!(artifact.classes.len(), 2);
    }
}
