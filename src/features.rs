//! Feature Vector
//!
//! The seven agronomic measurements submitted with every prediction request,
//! in the column order the classifier was trained on.
//!
//! Two naming schemes exist for the same columns:
//! - Form field names (`Nitrogen`, `Soil_pH`, ...) as posted by the HTML form
//! - Model feature names (`N`, `ph`, ...) as recorded in the training data

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Number of input features
pub const N_FEATURES: usize = 7;

/// Form field names, in model column order
pub const FORM_FIELDS: [&str; N_FEATURES] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "Soil_pH",
    "Rainfall",
];

/// Model feature names, in model column order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}': could not convert '{value}' to float: {reason}")]
    NotNumeric {
        field: String,
        value: String,
        reason: String,
    },

    #[error("field '{field}': value '{value}' is not a finite number")]
    NotFinite { field: String, value: String },
}

impl InputError {
    /// Form field the error refers to
    pub fn field(&self) -> &str {
        match self {
            InputError::MissingField(field) => field,
            InputError::NotNumeric { field, .. } => field,
            InputError::NotFinite { field, .. } => field,
        }
    }
}

/// Seven measurements in model column order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }

    /// Parse the seven form fields.
    ///
    /// Fields are checked in column order, so the first missing or malformed
    /// field is the one reported. Surrounding whitespace is ignored.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, InputError> {
        let mut values = [0.0; N_FEATURES];

        for (slot, field) in values.iter_mut().zip(FORM_FIELDS) {
            let raw = form
                .get(field)
                .ok_or_else(|| InputError::MissingField(field.to_string()))?;
            *slot = parse_value(field, raw)?;
        }

        Ok(Self(values))
    }

    /// Parse positional string arguments (command line order = column order)
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, InputError> {
        let mut values = [0.0; N_FEATURES];

        for (i, field) in FORM_FIELDS.iter().enumerate() {
            let raw = args
                .get(i)
                .ok_or_else(|| InputError::MissingField(field.to_string()))?;
            values[i] = parse_value(field, raw.as_ref())?;
        }

        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn nitrogen(&self) -> f64 {
        self.0[0]
    }

    pub fn phosphorus(&self) -> f64 {
        self.0[1]
    }

    pub fn potassium(&self) -> f64 {
        self.0[2]
    }

    pub fn temperature(&self) -> f64 {
        self.0[3]
    }

    pub fn humidity(&self) -> f64 {
        self.0[4]
    }

    pub fn ph(&self) -> f64 {
        self.0[5]
    }

    pub fn rainfall(&self) -> f64 {
        self.0[6]
    }
}

fn parse_value(field: &str, raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().map_err(|e: std::num::ParseFloatError| {
        InputError::NotNumeric {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;

    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }

    Ok(value)
}
