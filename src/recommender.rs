//! Crop Recommender
//!
//! Turns a classifier's probability distribution into the payload shown on the
//! result page:
//! 1. Predicted crop = highest probability (lowest class index wins ties)
//! 2. Alternatives = the next three crops by probability
//! 3. Key factors = the model's feature importances, ranked, top 5

use crate::catalog::{self, N_CLASSES};
use crate::features::{FeatureVector, InputError, FEATURE_NAMES, N_FEATURES};
use crate::model::CropClassifier;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Number of runner-up crops reported
pub const N_ALTERNATIVES: usize = 3;

/// Number of key factors reported
pub const N_KEY_FACTORS: usize = 5;

/// Why a recommendation could not be produced
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("{0}")]
    Unexpected(String),
}

/// A runner-up crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub crop_id: String,
    pub name: String,
    /// Probability as a percentage (0-100)
    pub confidence: f64,
    pub confidence_label: String,
    pub emoji: String,
}

/// One feature's contribution to the model, paired with the submitted value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFactor {
    pub name: String,
    /// Model importance, rounded to 3 decimals
    pub importance: f64,
    pub input_value: f64,
}

/// The parsed inputs, echoed back on the result page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputSummary {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl From<&FeatureVector> for InputSummary {
    fn from(f: &FeatureVector) -> Self {
        Self {
            nitrogen: f.nitrogen(),
            phosphorus: f.phosphorus(),
            potassium: f.potassium(),
            temperature: f.temperature(),
            humidity: f.humidity(),
            ph: f.ph(),
            rainfall: f.rainfall(),
        }
    }
}

/// Everything the result page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub crop_id: String,
    pub crop_name: String,
    pub emoji: String,
    /// Probability of the predicted crop as a percentage (0-100)
    pub confidence: f64,
    pub confidence_label: String,
    pub description: String,
    pub season: String,
    pub harvest_time: String,
    pub alternatives: Vec<Alternative>,
    pub key_factors: Vec<KeyFactor>,
    /// Largest key-factor importance, used to scale the importance bars
    pub max_importance: f64,
    pub inputs: InputSummary,
}

/// Holds the loaded classifier, if any, for the lifetime of the process
#[derive(Clone)]
pub struct Recommender {
    classifier: Option<Arc<dyn CropClassifier>>,
}

impl Recommender {
    pub fn new(classifier: Arc<dyn CropClassifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    /// A recommender whose model failed to load; every prediction fails
    pub fn unavailable() -> Self {
        Self { classifier: None }
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Recommend from submitted form fields.
    ///
    /// Model availability is checked before the input is parsed.
    pub fn recommend_form(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<Recommendation, PredictError> {
        let classifier = self
            .classifier
            .as_deref()
            .ok_or(PredictError::ModelUnavailable)?;
        let features = FeatureVector::from_form(form)?;
        recommend(classifier, &features)
    }

    pub fn recommend(&self, features: &FeatureVector) -> Result<Recommendation, PredictError> {
        let classifier = self
            .classifier
            .as_deref()
            .ok_or(PredictError::ModelUnavailable)?;
        recommend(classifier, features)
    }
}

/// Run the classifier and derive the full recommendation
pub fn recommend(
    classifier: &dyn CropClassifier,
    features: &FeatureVector,
) -> Result<Recommendation, PredictError> {
    let proba = classifier
        .predict_proba(features)
        .map_err(|e| PredictError::Unexpected(e.to_string()))?;

    if proba.len() != N_CLASSES {
        return Err(PredictError::Unexpected(format!(
            "classifier returned {} probabilities, expected {}",
            proba.len(),
            N_CLASSES
        )));
    }
    if proba.iter().any(|p| !p.is_finite()) {
        return Err(PredictError::Unexpected(
            "classifier returned a non-finite probability".to_string(),
        ));
    }

    let ranked = rank_classes(&proba);
    let top = ranked[0];
    let crop_id = class_id(top)?;
    let info = catalog::lookup(crop_id);
    let confidence = proba[top] * 100.0;

    let alternatives = ranked
        .iter()
        .skip(1)
        .take(N_ALTERNATIVES)
        .map(|&i| -> Result<Alternative, PredictError> {
            let id = class_id(i)?;
            let pct = proba[i] * 100.0;
            Ok(Alternative {
                crop_id: id.to_string(),
                name: catalog::title_case(id),
                confidence: pct,
                confidence_label: format_percent(pct),
                emoji: catalog::lookup(id).emoji.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let key_factors = key_factors(classifier.feature_importances(), features)?;
    let max_importance = key_factors.first().map(|f| f.importance).unwrap_or(1.0);

    tracing::info!(
        "Predicted {} ({:.1}%), runners-up: {:?}",
        crop_id,
        confidence,
        alternatives.iter().map(|a| a.crop_id.as_str()).collect::<Vec<_>>()
    );

    Ok(Recommendation {
        crop_id: crop_id.to_string(),
        crop_name: catalog::title_case(crop_id),
        emoji: info.emoji.to_string(),
        confidence,
        confidence_label: format_percent(confidence),
        description: info.description.to_string(),
        season: info.season.to_string(),
        harvest_time: info.harvest_time.to_string(),
        alternatives,
        key_factors,
        max_importance,
        inputs: InputSummary::from(features),
    })
}

/// Class indices ordered by descending probability; ties keep class order
fn rank_classes(proba: &[f64]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..proba.len()).collect();
    ranked.sort_by(|&a, &b| proba[b].total_cmp(&proba[a]));
    ranked
}

fn class_id(index: usize) -> Result<&'static str, PredictError> {
    catalog::class_id(index)
        .ok_or_else(|| PredictError::Unexpected(format!("class index {} out of range", index)))
}

/// Importances paired with feature names and inputs, top 5 by importance.
///
/// Importances are rounded to 3 decimals before ranking; ties keep column order.
fn key_factors(
    importances: &[f64],
    features: &FeatureVector,
) -> Result<Vec<KeyFactor>, PredictError> {
    if importances.len() != N_FEATURES {
        return Err(PredictError::Unexpected(format!(
            "classifier reported {} feature importances, expected {}",
            importances.len(),
            N_FEATURES
        )));
    }

    let mut factors: Vec<KeyFactor> = FEATURE_NAMES
        .iter()
        .zip(importances)
        .zip(features.values())
        .map(|((name, &importance), &input_value)| KeyFactor {
            name: name.to_uppercase(),
            importance: round3(importance),
            input_value,
        })
        .collect();

    factors.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    factors.truncate(N_KEY_FACTORS);
    Ok(factors)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// "87.0%"
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}
