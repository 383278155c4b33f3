// Axum Server Module
//
// Purpose: HTTP front end for the crop recommender. HTML form + result pages
// (see web::handlers::pages) plus a small JSON API for scripted clients.

#[cfg(feature = "api")]
use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use std::collections::HashMap;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use crate::config::ServerConfig;

#[cfg(feature = "api")]
use crate::model::{CropClassifier, RandomForest};

#[cfg(feature = "api")]
use crate::recommender::{PredictError, Recommendation, Recommender};

#[cfg(feature = "api")]
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

#[cfg(feature = "api")]
impl AppState {
    /// Load the classifier named in the config.
    ///
    /// A load failure is logged and leaves the server running with predictions
    /// disabled; the form page keeps working.
    pub fn load(config: &ServerConfig) -> Self {
        tracing::info!("Loading model from {:?}...", config.model_path);

        match RandomForest::load(&config.model_path) {
            Ok(forest) => {
                tracing::info!("Model loaded successfully");
                Self::with_classifier(Arc::new(forest))
            }
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                Self::without_model()
            }
        }
    }

    pub fn with_classifier(classifier: Arc<dyn CropClassifier>) -> Self {
        Self {
            recommender: Recommender::new(classifier),
        }
    }

    pub fn without_model() -> Self {
        Self {
            recommender: Recommender::unavailable(),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(pages::home_page))
        .route("/predict", post(pages::predict_page))

        // Health check
        .route("/health", get(health_check))

        // JSON API
        .route("/api/predict", post(predict_json))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let model_loaded = state.recommender.is_ready();
    let status = if model_loaded { "healthy" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "model_loaded": model_loaded,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn predict_json(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<Recommendation>, JsonError> {
    let fields = read_form(&state, form)?;
    let recommendation = state.recommender.recommend_form(&fields)?;
    Ok(Json(recommendation))
}

/// Unwrap the submitted form, checking model availability first
#[cfg(feature = "api")]
pub(crate) fn read_form(
    state: &AppState,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<HashMap<String, String>, AppError> {
    if !state.recommender.is_ready() {
        return Err(AppError::ModelUnavailable);
    }

    let Form(fields) = form.map_err(|rejection| {
        tracing::warn!("Rejected form body: {}", rejection.body_text());
        AppError::BadInput(rejection.body_text())
    })?;

    Ok(fields)
}

// ============================================================================
// Error Handling
// ============================================================================

/// Failure modes of a prediction request, rendered as plain text
#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    ModelUnavailable,
    BadInput(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::ModelUnavailable => {
                "Error: Model not loaded. Please check the model file.".to_string()
            }
            AppError::BadInput(detail) => format!(
                "Invalid input. Please ensure all fields are filled with numeric values. Error: {}",
                detail
            ),
            AppError::Internal(detail) => format!("An unexpected error occurred: {}", detail),
        }
    }
}

#[cfg(feature = "api")]
impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::ModelUnavailable => AppError::ModelUnavailable,
            PredictError::InvalidInput(e) => {
                tracing::warn!("Input error: {}", e);
                AppError::BadInput(e.to_string())
            }
            PredictError::Unexpected(msg) => {
                tracing::error!("Unexpected error: {}", msg);
                AppError::Internal(msg)
            }
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.message()).into_response()
    }
}

/// Same failure modes as [`AppError`], rendered as `{"error": message}`
#[cfg(feature = "api")]
#[derive(Debug)]
pub struct JsonError(pub AppError);

#[cfg(feature = "api")]
impl From<AppError> for JsonError {
    fn from(err: AppError) -> Self {
        JsonError(err)
    }
}

#[cfg(feature = "api")]
impl From<PredictError> for JsonError {
    fn from(err: PredictError) -> Self {
        JsonError(AppError::from(err))
    }
}

#[cfg(feature = "api")]
impl IntoResponse for JsonError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(serde_json::json!({
            "error": self.0.message()
        }));

        (self.0.status(), body).into_response()
    }
}
