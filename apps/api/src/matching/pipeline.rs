//! Full prediction pipeline: assemble → classify → rank → explain → enrich.

use tracing::debug;

use crate::errors::AppError;
use crate::matching::artifacts::ModelBundle;
use crate::matching::explain::{enrich, explain, CareerPrediction};
use crate::matching::features::{assemble_features, UserInput};
use crate::matching::predictor::{top_careers, TOP_K};

pub fn predict_careers(
    bundle: &ModelBundle,
    input: &UserInput,
) -> Result<Vec<CareerPrediction>, AppError> {
    let features = assemble_features(input, &bundle.encoders, &bundle.feature_names)?;
    let probabilities = bundle.classifier.predict_proba(features.values())?;
    let ranked = top_careers(&probabilities, &bundle.encoders.target, TOP_K)?;
    for career in &ranked {
        debug!(
            class = career.class_index,
            probability = career.probability,
            "Ranked {}",
            career.title
        );
    }

    let explanation = explain(input, &bundle.encoders);
    Ok(ranked
        .into_iter()
        .map(|career| enrich(career, &explanation, &bundle.catalog))
        .collect())
}
