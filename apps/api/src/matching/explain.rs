//! Explanation & enrichment of ranked careers.

use serde::Serialize;

use crate::matching::catalog::CareerCatalog;
use crate::matching::encoders::{normalize, EncoderBank, Vocabulary};
use crate::matching::features::UserInput;
use crate::matching::predictor::RankedCareer;

/// How many matched skills / interests an explanation lists.
const EXPLANATION_CAP: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    /// Always true: education is not compared against careers yet.
    /// Serialized as `education_match`, unlike the camelCase prediction fields,
    /// because existing web clients read that exact key.
    pub education_match: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPrediction {
    pub title: String,
    pub match_score: u32,
    pub description: String,
    pub required_skills: Vec<String>,
    pub industry_type: String,
    pub explanation: Explanation,
}

/// Inputs the model recognised, in the order and spelling the user gave them.
/// The cap is illustrative, not a relevance ranking.
pub fn explain(input: &UserInput, encoders: &EncoderBank) -> Explanation {
    Explanation {
        skills: recognised(&input.skills, &encoders.skills),
        interests: recognised(&input.interests, &encoders.interests),
        education_match: true,
    }
}

fn recognised(values: &[String], vocabulary: &Vocabulary) -> Vec<String> {
    values
        .iter()
        .filter(|v| vocabulary.contains(&normalize(v)))
        .take(EXPLANATION_CAP)
        .cloned()
        .collect()
}

/// Joins catalogue metadata onto a ranked career.
pub fn enrich(
    career: RankedCareer,
    explanation: &Explanation,
    catalog: &CareerCatalog,
) -> CareerPrediction {
    let details = catalog.lookup(&career.title);
    CareerPrediction {
        match_score: career.match_score(),
        title: career.title,
        description: details.description,
        required_skills: details.required_skills,
        industry_type: details.industry_type,
        explanation: explanation.clone(),
    }
}
