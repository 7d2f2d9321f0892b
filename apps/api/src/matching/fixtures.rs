//! Shared test fixtures: a small encoder bank, forest and catalogue.

use std::fs;
use std::path::Path;

use crate::errors::AppError;
use crate::matching::artifacts::{
    ArtifactPaths, ModelBundle, EDUCATION_ENCODER_FILE, FEATURE_NAMES_FILE,
    INTERESTS_ENCODER_FILE, RF_MODEL_FILE, SKILLS_ENCODER_FILE, TARGET_ENCODER_FILE,
};
use crate::matching::catalog::CareerCatalog;
use crate::matching::encoders::{EncoderBank, LabelEncoder, TargetEncoder, Vocabulary};
use crate::matching::features::EDUCATION_COLUMN;
use crate::matching::forest::{Classifier, RandomForest};

pub const SKILLS: [&str; 4] = ["python", "sql", "excel", "statistics"];
pub const INTERESTS: [&str; 3] = ["data", "design", "finance"];
pub const EDUCATION: [&str; 4] = ["bachelor's", "high school", "master's", "phd"];
pub const CAREERS: [&str; 4] = [
    "Accountant",
    "Data Scientist",
    "Graphic Designer",
    "Software Engineer",
];

pub const SAMPLE_CATALOG_CSV: &str = "career_name,description,required_skills,industry_type\n\
Data Scientist,Builds models from data,\"[\"\"python\"\",\"\"sql\"\"]\",Technology\n\
accountant,Keeps the books,\"sql, excel\",Finance\n";

/// Forest over the sample schema. `python` pushes towards Data Scientist,
/// `design` towards Graphic Designer.
const SAMPLE_FOREST_JSON: &str = r#"{
    "n_features": 8,
    "n_classes": 4,
    "trees": [
        {
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[3, 9, 5, 3], [3, 1, 4, 2], [0, 8, 1, 1]]
        },
        {
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [5, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[2, 4, 10, 4], [2, 4, 0, 4], [0, 0, 10, 0]]
        }
    ]
}"#;

pub fn sample_encoders() -> EncoderBank {
    EncoderBank {
        skills: Vocabulary::new(SKILLS),
        interests: Vocabulary::new(INTERESTS),
        education: LabelEncoder::new(EDUCATION),
        target: TargetEncoder::new(CAREERS),
    }
}

/// Skills, then interests, then the education code.
pub fn sample_feature_names() -> Vec<String> {
    SKILLS
        .iter()
        .chain(INTERESTS.iter())
        .chain(std::iter::once(&EDUCATION_COLUMN))
        .map(|s| s.to_string())
        .collect()
}

pub fn sample_forest() -> RandomForest {
    RandomForest::from_json(SAMPLE_FOREST_JSON).unwrap()
}

pub fn sample_catalog() -> CareerCatalog {
    CareerCatalog::from_reader(SAMPLE_CATALOG_CSV.as_bytes()).unwrap()
}

pub fn sample_bundle() -> ModelBundle {
    ModelBundle::new(
        Box::new(sample_forest()),
        sample_encoders(),
        sample_feature_names(),
        sample_catalog(),
    )
    .unwrap()
}

/// Writes the sample artifacts under `dir` and returns their paths.
pub fn write_artifacts(dir: &Path) -> ArtifactPaths {
    let classes = |items: &[&str]| serde_json::json!({ "classes": items }).to_string();

    fs::write(dir.join(RF_MODEL_FILE), SAMPLE_FOREST_JSON).unwrap();
    fs::write(dir.join(SKILLS_ENCODER_FILE), classes(&SKILLS)).unwrap();
    fs::write(dir.join(INTERESTS_ENCODER_FILE), classes(&INTERESTS)).unwrap();
    fs::write(dir.join(EDUCATION_ENCODER_FILE), classes(&EDUCATION)).unwrap();
    fs::write(dir.join(TARGET_ENCODER_FILE), classes(&CAREERS)).unwrap();
    fs::write(
        dir.join(FEATURE_NAMES_FILE),
        serde_json::to_string(&sample_feature_names()).unwrap(),
    )
    .unwrap();

    let catalog = dir.join("career_data.csv");
    fs::write(&catalog, SAMPLE_CATALOG_CSV).unwrap();

    ArtifactPaths::new(dir, catalog)
}

/// Returns the same probabilities for every row.
pub struct FixedClassifier {
    probabilities: Vec<f64>,
    n_features: usize,
}

impl FixedClassifier {
    pub fn new(probabilities: Vec<f64>, n_features: usize) -> Self {
        Self {
            probabilities,
            n_features,
        }
    }
}

impl Classifier for FixedClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.probabilities.len()
    }

    fn predict_proba(&self, _row: &[f64]) -> Result<Vec<f64>, AppError> {
        Ok(self.probabilities.clone())
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}
