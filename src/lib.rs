//! Crop Advisor
//!
//! Recommends a crop from seven soil and climate measurements using a
//! pre-trained random-forest classifier.
//!
//! - `features/`: Form parsing into the 7-column feature vector
//! - `catalog/`: The 22 crop classes and their descriptive metadata
//! - `model/`: Classifier capability and the JSON random-forest artifact
//! - `recommender/`: Top crop, alternatives and key factors
//! - `api_server/` + `web/`: Axum server with Askama pages (feature `api`)

pub mod catalog;
pub mod config;
pub mod features;
pub mod model;
pub mod recommender;

#[cfg(feature = "api")]
pub mod api_server;

#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use catalog::{CropInfo, N_CLASSES};
pub use config::ServerConfig;
pub use features::{FeatureVector, InputError, FEATURE_NAMES, FORM_FIELDS, N_FEATURES};
pub use model::{CropClassifier, ModelError, RandomForest};
pub use recommender::{recommend, PredictError, Recommendation, Recommender};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
