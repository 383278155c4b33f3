//! Crop classifier capability
//!
//! The recommender only needs two things from a trained model:
//! - a probability for each of the 22 crop classes given a feature vector
//! - the model's static per-feature importance scores
//!
//! `forest` provides the production implementation backed by an exported
//! random-forest artifact. Tests substitute their own implementations.

pub mod forest;

pub use forest::RandomForest;

use crate::features::FeatureVector;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or evaluating a classifier
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A trained crop classifier
pub trait CropClassifier: Send + Sync {
    /// Probability per crop class, in catalog class order
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;

    /// Static importance per input feature, in model column order
    fn feature_importances(&self) -> &[f64];
}
