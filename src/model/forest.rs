//! Random Forest Classifier
//!
//! Inference over a random forest exported to JSON from the training notebook.
//!
//! # Artifact Format
//!
//! ```json
//! {
//!   "classes": ["apple", "banana", ...],
//!   "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
//!   "feature_importances": [0.10, 0.14, 0.17, 0.07, 0.22, 0.05, 0.25],
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"feature": 6, "threshold": 120.5, "left": 1, "right": 2},
//!         {"value": [0.0, 3.0, ...]},
//!         {"value": [5.0, 0.0, ...]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Traversal starts at node 0 and goes left when `x[feature] <= threshold`.
//! Leaf `value`s are per-class sample weights; each tree's vote is its leaf
//! normalized to sum 1, and the forest probability is the mean vote.

use crate::catalog::{self, N_CLASSES};
use crate::features::{FeatureVector, FEATURE_NAMES, N_FEATURES};
use crate::model::{CropClassifier, ModelError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tree node: internal split or leaf
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// A single decision tree, root at index 0
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// Forest artifact as stored on disk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RandomForest {
    classes: Vec<String>,
    #[serde(default)]
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
    trees: Vec<Tree>,
}

impl RandomForest {
    /// Load and validate a forest artifact from disk
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let forest = Self::from_json_str(&contents)?;

        tracing::info!(
            "Loaded random forest from {:?} ({} trees, {} nodes)",
            path,
            forest.n_trees(),
            forest.n_nodes()
        );

        Ok(forest)
    }

    /// Parse and validate a forest artifact
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let forest: RandomForest = serde_json::from_str(json)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(|t| t.nodes.len()).sum()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check the artifact against the fixed 7-feature, 22-class schema.
    ///
    /// Child indices must point strictly forward, so every traversal terminates.
    fn validate(&self) -> Result<(), ModelError> {
        let expected: Vec<&str> = catalog::crops().iter().map(|c| c.id).collect();
        if self.classes.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(ModelError::Invalid(format!(
                "classes {:?} do not match the {} catalog crops",
                self.classes, N_CLASSES
            )));
        }

        if !self.feature_names.is_empty() && self.feature_names.len() != N_FEATURES {
            return Err(ModelError::Invalid(format!(
                "expected {} feature names, found {}",
                N_FEATURES,
                self.feature_names.len()
            )));
        }

        if !self.feature_names.is_empty() {
            for (found, expected) in self.feature_names.iter().zip(FEATURE_NAMES) {
                if !found.eq_ignore_ascii_case(expected) {
                    tracing::warn!("Model feature '{}' where '{}' was expected", found, expected);
                }
            }
        }

        if self.feature_importances.len() != N_FEATURES {
            return Err(ModelError::Invalid(format!(
                "expected {} feature importances, found {}",
                N_FEATURES,
                self.feature_importances.len()
            )));
        }

        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {} has no nodes", t)));
            }

            let n = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split { feature, threshold, left, right } => {
                        if *feature >= N_FEATURES {
                            return Err(ModelError::Invalid(format!(
                                "tree {} node {}: feature index {} out of range",
                                t, i, feature
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ModelError::Invalid(format!(
                                "tree {} node {}: non-finite threshold",
                                t, i
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= n {
                                return Err(ModelError::Invalid(format!(
                                    "tree {} node {}: child index {} out of range",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != N_CLASSES {
                            return Err(ModelError::Invalid(format!(
                                "tree {} node {}: leaf has {} class weights, expected {}",
                                t, i, value.len(), N_CLASSES
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Tree {
    /// Leaf reached by a feature vector
    fn leaf(&self, x: &[f64; N_FEATURES]) -> Result<&[f64], ModelError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Split { feature, threshold, left, right }) => {
                    let v = x.get(*feature).ok_or_else(|| {
                        ModelError::Inference(format!("feature index {} out of range", feature))
                    })?;
                    if *left <= idx || *right <= idx {
                        return Err(ModelError::Inference(format!(
                            "node {} does not point forward",
                            idx
                        )));
                    }
                    idx = if *v <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { value }) => return Ok(value.as_slice()),
                None => {
                    return Err(ModelError::Inference(format!(
                        "node index {} out of range",
                        idx
                    )))
                }
            }
        }
    }
}

impl CropClassifier for RandomForest {
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let x = features.values();
        let mut proba = vec![0.0; N_CLASSES];

        for tree in &self.trees {
            let value = tree.leaf(x)?;
            let total: f64 = value.iter().sum();

            if total > 0.0 {
                for (p, v) in proba.iter_mut().zip(value) {
                    *p += v / total;
                }
            } else {
                for p in proba.iter_mut() {
                    *p += 1.0 / N_CLASSES as f64;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in proba.iter_mut() {
            *p /= n_trees;
        }

        Ok(proba)
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn one_hot(class: &str, weight: f64) -> Vec<f64> {
        let mut value = vec![0.0; N_CLASSES];
        value[catalog::class_index(class).unwrap()] = weight;
        value
    }

    fn class_names() -> Vec<&'static str> {
        catalog::crops().iter().map(|c| c.id).collect()
    }

    /// Two trees splitting on rainfall and temperature
    fn sample_forest_json() -> serde_json::Value {
        json!({
            "classes": class_names(),
            "feature_names": FEATURE_NAMES,
            "feature_importances": [0.10, 0.12, 0.15, 0.08, 0.22, 0.05, 0.28],
            "trees": [
                {
                    "nodes": [
                        {"feature": 6, "threshold": 150.0, "left": 1, "right": 2},
                        {"value": one_hot("chickpea", 4.0)},
                        {"value": one_hot("rice", 6.0)}
                    ]
                },
                {
                    "nodes": [
                        {"feature": 3, "threshold": 25.0, "left": 1, "right": 2},
                        {"value": one_hot("rice", 2.0)},
                        {"value": one_hot("mango", 2.0)}
                    ]
                }
            ]
        })
    }

    fn load(value: serde_json::Value) -> Result<RandomForest, ModelError> {
        RandomForest::from_json_str(&value.to_string())
    }

    #[test]
    fn test_forest_averages_tree_votes() {
        let forest = load(sample_forest_json()).unwrap();
        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.n_nodes(), 6);

        // Wet and cool: both trees vote rice
        let x = FeatureVector::new([90.0, 42.0, 43.0, 20.0, 82.0, 6.5, 200.0]);
        let proba = forest.predict_proba(&x).unwrap();
        assert_relative_eq!(proba[catalog::class_index("rice").unwrap()], 1.0);

        // Wet and hot: split between rice and mango
        let x = FeatureVector::new([90.0, 42.0, 43.0, 30.0, 82.0, 6.5, 200.0]);
        let proba = forest.predict_proba(&x).unwrap();
        assert_relative_eq!(proba[catalog::class_index("rice").unwrap()], 0.5);
        assert_relative_eq!(proba[catalog::class_index("mango").unwrap()], 0.5);
        assert_relative_eq!(proba.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        let forest = load(sample_forest_json()).unwrap();
        let x = FeatureVector::new([0.0, 0.0, 0.0, 25.0, 0.0, 0.0, 150.0]);
        let proba = forest.predict_proba(&x).unwrap();

        assert_relative_eq!(proba[catalog::class_index("chickpea").unwrap()], 0.5);
        assert_relative_eq!(proba[catalog::class_index("rice").unwrap()], 0.5);
    }

    #[test]
    fn test_mixed_leaf_is_normalized() {
        let mut value = one_hot("maize", 3.0);
        value[catalog::class_index("cotton").unwrap()] = 1.0;

        let mut artifact = sample_forest_json();
        artifact["trees"] = json!([{ "nodes": [{ "value": value }] }]);

        let forest = load(artifact).unwrap();
        let proba = forest
            .predict_proba(&FeatureVector::new([0.0; N_FEATURES]))
            .unwrap();
        assert_relative_eq!(proba[catalog::class_index("maize").unwrap()], 0.75);
        assert_relative_eq!(proba[catalog::class_index("cotton").unwrap()], 0.25);
    }

    #[test]
    fn test_empty_leaf_votes_uniform() {
        let mut artifact = sample_forest_json();
        artifact["trees"] = json!([{ "nodes": [{ "value": vec![0.0; N_CLASSES] }] }]);

        let forest = load(artifact).unwrap();
        let proba = forest
            .predict_proba(&FeatureVector::new([0.0; N_FEATURES]))
            .unwrap();
        for p in proba {
            assert_relative_eq!(p, 1.0 / N_CLASSES as f64);
        }
    }

    #[test]
    fn test_importances_exposed() {
        let forest = load(sample_forest_json()).unwrap();
        assert_eq!(forest.feature_importances().len(), N_FEATURES);
        assert_relative_eq!(forest.feature_importances()[6], 0.28);
    }

    #[test]
    fn test_rejects_wrong_classes() {
        let mut artifact = sample_forest_json();
        artifact["classes"] = json!(["rice", "maize"]);
        assert!(matches!(load(artifact), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_wrong_importance_length() {
        let mut artifact = sample_forest_json();
        artifact["feature_importances"] = json!([0.5, 0.5]);
        assert!(matches!(load(artifact), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut artifact = sample_forest_json();
        artifact["trees"][0]["nodes"][0]["left"] = json!(0);
        let err = load(artifact).unwrap_err();
        assert!(err.to_string().contains("child index"));
    }

    #[test]
    fn test_rejects_out_of_range_feature() {
        let mut artifact = sample_forest_json();
        artifact["trees"][1]["nodes"][0]["feature"] = json!(7);
        assert!(matches!(load(artifact), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_short_leaf() {
        let mut artifact = sample_forest_json();
        artifact["trees"][0]["nodes"][1]["value"] = json!([1.0, 2.0]);
        assert!(matches!(load(artifact), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_forest() {
        let mut artifact = sample_forest_json();
        artifact["trees"] = json!([]);
        assert!(matches!(load(artifact), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RandomForest::from_json_str("{not json"),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RandomForest::load(Path::new("/nonexistent/RandomForest.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
