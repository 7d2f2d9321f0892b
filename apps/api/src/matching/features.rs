//! Feature assembly: turns a `UserInput` into the single-row feature vector the
//! classifier was trained on.
//!
//! Column groups, in order: one indicator per skill class, one indicator per interest
//! class, then `education_encoded`. Duplicate column names keep their first
//! occurrence. The row is finally reindexed onto `feature_names`: absent columns are
//! zero-filled and columns the model never saw are dropped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::matching::encoders::{normalize, EncoderBank};

pub const EDUCATION_COLUMN: &str = "education_encoded";

const DEFAULT_AGE: u32 = 25;
const DEFAULT_EDUCATION: &str = "bachelor's";

fn default_age() -> Value {
    Value::from(DEFAULT_AGE)
}

fn default_education() -> String {
    DEFAULT_EDUCATION.to_string()
}

/// Prediction request body. Omitted fields take the defaults the web client relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    /// Accepted for compatibility and never validated: the trained model has no
    /// age column, so any JSON value (including `null`) is kept as sent.
    #[serde(default = "default_age")]
    pub age: Value,
    #[serde(default = "default_education")]
    pub education: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// A single assembled row, aligned with the training-time column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Fails unless the columns are exactly `feature_names`, in order.
    pub fn ensure_schema(&self, feature_names: &[String]) -> Result<(), AppError> {
        if self.columns != feature_names || self.values.len() != feature_names.len() {
            return Err(AppError::FeatureSchemaMismatch(format!(
                "assembled {} columns, model expects {}",
                self.columns.len(),
                feature_names.len()
            )));
        }
        Ok(())
    }
}

/// Builds the feature vector for `input`.
///
/// Unknown skills and interests are logged and ignored. An education value that is not
/// in the education vocabulary (after trimming) is an error.
pub fn assemble_features(
    input: &UserInput,
    encoders: &EncoderBank,
    feature_names: &[String],
) -> Result<FeatureVector, AppError> {
    let skills = normalized_set(&input.skills);
    let interests = normalized_set(&input.interests);

    for skill in &input.skills {
        let skill = normalize(skill);
        if !encoders.skills.contains(&skill) {
            warn!(skill = %skill, "Unknown skill ignored");
        }
    }
    for interest in &input.interests {
        let interest = normalize(interest);
        if !encoders.interests.contains(&interest) {
            warn!(interest = %interest, "Unknown interest ignored");
        }
    }

    let education = input.education.trim();
    let education_code = encoders
        .education
        .encode(education)
        .ok_or_else(|| AppError::UnknownEducation(education.to_string()))?;

    let indicator = |present: bool| if present { 1.0 } else { 0.0 };

    let assembled = encoders
        .skills
        .classes()
        .iter()
        .map(|class| (class.as_str(), indicator(skills.contains(class))))
        .chain(
            encoders
                .interests
                .classes()
                .iter()
                .map(|class| (class.as_str(), indicator(interests.contains(class)))),
        )
        .chain(std::iter::once((EDUCATION_COLUMN, education_code as f64)));

    // First occurrence wins on duplicate column names.
    let mut row: HashMap<&str, f64> = HashMap::new();
    let mut assembled_order: Vec<&str> = Vec::new();
    for (column, value) in assembled {
        if !row.contains_key(column) {
            row.insert(column, value);
            assembled_order.push(column);
        }
    }

    let expected: HashSet<&str> = feature_names.iter().map(String::as_str).collect();
    let missing = feature_names
        .iter()
        .filter(|name| !row.contains_key(name.as_str()))
        .count();
    let extra: Vec<&str> = assembled_order
        .iter()
        .copied()
        .filter(|column| !expected.contains(column))
        .collect();
    if missing > 0 {
        debug!(missing, "Zero-filling columns absent from the assembled row");
    }
    if !extra.is_empty() {
        debug!(extra = ?extra, "Dropping columns unknown to the model");
    }

    let vector = FeatureVector {
        columns: feature_names.to_vec(),
        values: feature_names
            .iter()
            .map(|name| row.get(name.as_str()).copied().unwrap_or(0.0))
            .collect(),
    };
    vector.ensure_schema(feature_names)?;

    Ok(vector)
}

fn normalized_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| normalize(v)).collect()
}

#[cfg(test)]
impl FeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}
