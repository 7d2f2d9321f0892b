//! Ranks classes by probability and decodes the top ones to career names.

use anyhow::anyhow;

use crate::errors::AppError;
use crate::matching::encoders::TargetEncoder;

/// Number of careers returned per prediction. Fixed, not configurable.
pub const TOP_K: usize = 3;

/// Upper bound of `match_score`; scores are probabilities scaled by this, not percentages.
pub const MATCH_SCORE_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCareer {
    pub class_index: usize,
    pub title: String,
    pub probability: f64,
}

impl RankedCareer {
    /// `round(probability * 1000)`, ties to even, clamped to `0..=1000`.
    pub fn match_score(&self) -> u32 {
        (self.probability * MATCH_SCORE_SCALE)
            .round_ties_even()
            .clamp(0.0, MATCH_SCORE_SCALE) as u32
    }
}

/// Returns the `k` most probable classes, highest first.
///
/// Sorting is stable, so equal probabilities keep ascending class order.
pub fn top_careers(
    probabilities: &[f64],
    target: &TargetEncoder,
    k: usize,
) -> Result<Vec<RankedCareer>, AppError> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

    order
        .into_iter()
        .take(k)
        .map(|class_index| {
            let title = target.decode(class_index).ok_or_else(|| {
                AppError::Internal(anyhow!(
                    "class index {class_index} has no career name ({} known)",
                    target.len()
                ))
            })?;
            Ok(RankedCareer {
                class_index,
                title: title.to_string(),
                probability: probabilities[class_index],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetEncoder {
        TargetEncoder::new(["Accountant", "Data Scientist", "Graphic Designer", "Nurse"])
    }

    #[test]
    fn test_returns_top_three_descending() {
        let ranked = top_careers(&[0.1, 0.5, 0.15, 0.25], &target(), TOP_K).unwrap();
        let titles: Vec<_> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Data Scientist", "Nurse", "Graphic Designer"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_fewer_classes_than_k() {
        let target = TargetEncoder::new(["A", "B"]);
        let ranked = top_careers(&[0.3, 0.7], &target, TOP_K).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "B");
    }

    #[test]
    fn test_ties_keep_class_order() {
        let ranked = top_careers(&[0.25, 0.25, 0.25, 0.25], &target(), TOP_K).unwrap();
        let indices: Vec<_> = ranked.iter().map(|r| r.class_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_target_name_is_internal_error() {
        let target = TargetEncoder::new(["A"]);
        let err = top_careers(&[0.2, 0.8], &target, TOP_K).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_match_score_scales_by_thousand() {
        let career = |p: f64| RankedCareer {
            class_index: 0,
            title: "x".to_string(),
            probability: p,
        };
        assert_eq!(career(0.6).match_score(), 600);
        assert_eq!(career(0.12345).match_score(), 123);
        assert_eq!(career(1.0).match_score(), 1000);
        assert_eq!(career(0.0).match_score(), 0);
    }
}
