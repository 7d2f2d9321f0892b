//! Random-forest classifier inference.
//!
//! Trees use the flat node layout exported by scikit-learn (`tree_.children_left`,
//! `children_right`, `feature`, `threshold`, `value`). A node is a leaf when its left
//! child is `-1`; otherwise the row goes left when `x[feature] <= threshold`. A tree's
//! class distribution is its leaf value row normalised to sum 1, and the forest
//! averages the distributions of all trees.

use serde::Deserialize;
use thiserror::Error;

use crate::errors::AppError;

const LEAF: i64 = -1;

/// Probability source for the predictor. Carried in `ModelBundle` as `Box<dyn Classifier>`.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;
    fn n_classes(&self) -> usize;
    /// Per-class probabilities for a single row of `n_features()` values.
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, AppError>;
    /// Short label for diagnostics, e.g. `"random_forest"`.
    fn kind(&self) -> &'static str;
    /// Number of fitted estimators; 1 for single models.
    fn estimators(&self) -> usize {
        1
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("forest has no trees")]
    Empty,

    #[error("forest declares {0} classes; at least one is required")]
    NoClasses(usize),

    #[error("tree {tree}: '{field}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        tree: usize,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tree {tree} node {node}: child index {child} is invalid")]
    BadChild { tree: usize, node: usize, child: i64 },

    #[error("tree {tree} node {node}: feature {feature} is outside 0..{n_features}")]
    BadFeature {
        tree: usize,
        node: usize,
        feature: i64,
        n_features: usize,
    },

    #[error("tree {tree} node {node}: value row has {actual} classes, expected {expected}")]
    BadValueRow {
        tree: usize,
        node: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Structural checks. Children must point strictly forward, which also rules out
    /// cycles, so traversal always terminates.
    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ForestError> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err(ForestError::LengthMismatch {
                tree,
                field: "children_left",
                expected: 1,
                actual: 0,
            });
        }
        for (field, actual) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if actual != nodes {
                return Err(ForestError::LengthMismatch {
                    tree,
                    field,
                    expected: nodes,
                    actual,
                });
            }
        }

        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if self.value[node].len() != n_classes {
                return Err(ForestError::BadValueRow {
                    tree,
                    node,
                    expected: n_classes,
                    actual: self.value[node].len(),
                });
            }
            if left == LEAF {
                if right != LEAF {
                    return Err(ForestError::BadChild {
                        tree,
                        node,
                        child: right,
                    });
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(ForestError::BadChild { tree, node, child });
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= n_features as i64 {
                return Err(ForestError::BadFeature {
                    tree,
                    node,
                    feature,
                    n_features,
                });
            }
        }
        Ok(())
    }

    /// Leaf value row reached by `row`. Requires a validated tree.
    fn leaf_value(&self, row: &[f64]) -> &[f64] {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return &self.value[node];
            }
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(
        n_features: usize,
        n_classes: usize,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ForestError> {
        let forest = Self {
            n_features,
            n_classes,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parses and validates a forest artifact.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let RandomForest {
            n_features,
            n_classes,
            trees,
        } = serde_json::from_str(raw)?;
        Ok(Self::new(n_features, n_classes, trees)?)
    }

    fn validate(&self) -> Result<(), ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::Empty);
        }
        if self.n_classes == 0 {
            return Err(ForestError::NoClasses(self.n_classes));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, self.n_classes)?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, AppError> {
        if row.len() != self.n_features {
            return Err(AppError::FeatureSchemaMismatch(format!(
                "row has {} features, forest expects {}",
                row.len(),
                self.n_features
            )));
        }

        let mut probabilities = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_value(row);
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (p, v) in probabilities.iter_mut().zip(leaf) {
                *p += v / total;
            }
        }

        let trees = self.trees.len() as f64;
        for p in &mut probabilities {
            *p /= trees;
        }
        Ok(probabilities)
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn estimators(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fixtures::sample_forest;

    fn stump(feature: i64, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left, right],
        }
    }

    #[test]
    fn test_stump_goes_left_on_equal_threshold() {
        let forest =
            RandomForest::new(1, 2, vec![stump(0, 0.5, vec![3.0, 1.0], vec![0.0, 4.0])]).unwrap();
        assert_eq!(forest.predict_proba(&[0.5]).unwrap(), vec![0.75, 0.25]);
        assert_eq!(forest.predict_proba(&[0.6]).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_forest_averages_tree_distributions() {
        let forest = RandomForest::new(
            2,
            2,
            vec![
                stump(0, 0.5, vec![1.0, 0.0], vec![0.0, 1.0]),
                stump(1, 0.5, vec![1.0, 1.0], vec![0.0, 2.0]),
            ],
        )
        .unwrap();
        let p = forest.predict_proba(&[1.0, 0.0]).unwrap();
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let forest = sample_forest();
        let row = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 2.0];
        let p = forest.predict_proba(&row).unwrap();
        assert_eq!(p.len(), 4);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_row_width_is_schema_mismatch() {
        let forest = sample_forest();
        assert!(matches!(
            forest.predict_proba(&[1.0]),
            Err(AppError::FeatureSchemaMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut tree = stump(0, 0.5, vec![1.0, 0.0], vec![0.0, 1.0]);
        tree.children_left[0] = 0;
        assert_eq!(
            RandomForest::new(1, 2, vec![tree]).unwrap_err(),
            ForestError::BadChild {
                tree: 0,
                node: 0,
                child: 0
            }
        );
    }

    #[test]
    fn test_rejects_feature_out_of_range() {
        let tree = stump(3, 0.5, vec![1.0, 0.0], vec![0.0, 1.0]);
        assert!(matches!(
            RandomForest::new(2, 2, vec![tree]),
            Err(ForestError::BadFeature { feature: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_short_value_row() {
        let tree = stump(0, 0.5, vec![1.0], vec![0.0, 1.0]);
        assert!(matches!(
            RandomForest::new(1, 2, vec![tree]),
            Err(ForestError::BadValueRow { node: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_forest() {
        assert_eq!(RandomForest::new(1, 2, vec![]).unwrap_err(), ForestError::Empty);
    }

    #[test]
    fn test_from_json() {
        let raw = r#"{
            "n_features": 1,
            "n_classes": 2,
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [[5, 5], [4, 1], [1, 4]]
            }]
        }"#;
        let forest = RandomForest::from_json(raw).unwrap();
        assert_eq!(forest.estimators(), 1);
        assert_eq!(forest.predict_proba(&[0.0]).unwrap(), vec![0.8, 0.2]);
    }

    #[test]
    fn test_from_json_rejects_mismatched_lengths() {
        let raw = r#"{
            "n_features": 1,
            "n_classes": 2,
            "trees": [{
                "children_left": [-1],
                "children_right": [-1, -1],
                "feature": [-2],
                "threshold": [-2.0],
                "value": [[1, 1]]
            }]
        }"#;
        assert!(RandomForest::from_json(raw).is_err());
    }
}
