// Page handlers for HTML rendering with Askama

use axum::extract::{rejection::FormRejection, Form, State};
use axum::response::{Html, IntoResponse};
use askama::Template;
use std::collections::HashMap;

use crate::api_server::{read_form, AppError, AppState};
use crate::features::FORM_FIELDS;
use crate::recommender::{Alternative, InputSummary, Recommendation};

// ============================================================================
// Home Page
// ============================================================================

/// One numeric input on the form
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub placeholder: &'static str,
    pub step: &'static str,
}

/// Labels and hints for the seven inputs, in model column order
fn form_fields() -> Vec<FormField> {
    const DETAILS: [(&str, &str, &str, &str); 7] = [
        ("Nitrogen", "kg/ha", "e.g. 90", "1"),
        ("Phosphorus", "kg/ha", "e.g. 42", "1"),
        ("Potassium", "kg/ha", "e.g. 43", "1"),
        ("Temperature", "°C", "e.g. 20.9", "0.01"),
        ("Humidity", "%", "e.g. 82.0", "0.01"),
        ("Soil pH", "pH", "e.g. 6.5", "0.01"),
        ("Rainfall", "mm", "e.g. 202.9", "0.01"),
    ];

    FORM_FIELDS
        .iter()
        .zip(DETAILS)
        .map(|(&name, (label, unit, placeholder, step))| FormField {
            name,
            label,
            unit,
            placeholder,
            step,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub fields: Vec<FormField>,
}

pub async fn home_page() -> impl IntoResponse {
    let template = HomeTemplate {
        title: "Crop Recommendation".to_string(),
        fields: form_fields(),
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// Result Page
// ============================================================================

/// Key factor formatted for display
pub struct KeyFactorView {
    pub name: String,
    pub importance: String,
    pub input_value: String,
    /// Bar width relative to the strongest factor (0-100)
    pub bar_percent: String,
}

#[derive(Template)]
#[template(path = "pages/result.html")]
pub struct ResultTemplate {
    pub title: String,
    pub crop_name: String,
    pub crop_emoji: String,
    pub confidence: String,
    pub crop_description: String,
    pub season: String,
    pub harvest_time: String,
    pub key_factors: Vec<KeyFactorView>,
    pub max_importance: f64,
    pub alternatives: Vec<Alternative>,
    pub input_data: InputSummary,
}

impl From<Recommendation> for ResultTemplate {
    fn from(rec: Recommendation) -> Self {
        let max = rec.max_importance;
        let key_factors = rec
            .key_factors
            .iter()
            .map(|f| KeyFactorView {
                name: f.name.clone(),
                importance: format!("{:.3}", f.importance),
                input_value: f.input_value.to_string(),
                bar_percent: if max > 0.0 {
                    format!("{:.0}", f.importance / max * 100.0)
                } else {
                    "0".to_string()
                },
            })
            .collect();

        Self {
            title: format!("Recommended crop: {}", rec.crop_name),
            crop_name: rec.crop_name,
            crop_emoji: rec.emoji,
            confidence: rec.confidence_label,
            crop_description: rec.description,
            season: rec.season,
            harvest_time: rec.harvest_time,
            key_factors,
            max_importance: rec.max_importance,
            alternatives: rec.alternatives,
            input_data: rec.inputs,
        }
    }
}

pub async fn predict_page(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let fields = read_form(&state, form)?;
    let recommendation = state.recommender.recommend_form(&fields)?;

    let template = ResultTemplate::from(recommendation);
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))?;

    Ok(Html(html))
}
