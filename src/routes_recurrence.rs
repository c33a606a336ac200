// --------------------------------------------------
// Handles API endpoints for recurrence rules.
//
// Responsibilities:
// - List preset rules for the task creation form
// - Validate a rule at configuration time
// - Preview the occurrence sequence for a rule
// --------------------------------------------------

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{PatternConfig, RecurringInstance};
use crate::validate::ValidationReport;
use crate::{format, presets, recurrence, validate};

// UI-chosen default when the request does not cap the preview itself.
const DEFAULT_PREVIEW_INSTANCES: u32 = 20;

fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub start_date: String, // "YYYY-MM-DD"
    pub config: PatternConfig,
    pub max_instances: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub start_date: String,
    pub pattern_label: String,
    pub end_label: String,
    pub instances: Vec<InstanceResponse>,
}

#[derive(Debug, Serialize)]
pub struct InstanceResponse {
    pub id: String,
    pub date: String,
    pub is_generated: bool,
    pub occurrence_number: u32,
}

#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub id: &'static str,
    pub name: &'static str,
    pub label: String,
    pub config: PatternConfig,
}

fn to_instance_response(instance: RecurringInstance) -> InstanceResponse {
    InstanceResponse {
        id: instance.id,
        date: instance.date.format("%Y-%m-%d").to_string(),
        is_generated: instance.is_generated,
        occurrence_number: instance.occurrence_number,
    }
}

// -----------------------------
// GET /api/recurrence/presets
// Returns the fixed preset catalog with display labels
// -----------------------------
pub async fn get_presets() -> impl IntoResponse {
    let list: Vec<PresetResponse> = presets::presets()
        .into_iter()
        .map(|p| PresetResponse {
            id: p.id,
            name: p.name,
            label: format::format_pattern(&p.config),
            config: p.config,
        })
        .collect();

    Json(list)
}

// -----------------------------
// POST /api/recurrence/validate
// Checks a rule and reports every violation at once
// -----------------------------
pub async fn validate_config(Json(config): Json<PatternConfig>) -> impl IntoResponse {
    Json(validate::validate(&config, today_local()))
}

// -----------------------------
// POST /api/recurrence/preview
// Expands a rule into its occurrence sequence
// -----------------------------
pub async fn preview(Json(req): Json<PreviewRequest>) -> impl IntoResponse {
    let start = match NaiveDate::parse_from_str(&req.start_date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid start_date").into_response(),
    };

    let today = today_local();

    // Invalid rules are caught here, before any task is created; they
    // never reach the generator.
    let report: ValidationReport = validate::validate(&req.config, today);
    if !report.valid {
        return (StatusCode::BAD_REQUEST, Json(report)).into_response();
    }

    let cap = req.max_instances.unwrap_or(DEFAULT_PREVIEW_INSTANCES);
    let instances = recurrence::generate(start, &req.config, cap, today);
    tracing::debug!(
        count = instances.len(),
        cap,
        "generated recurrence preview"
    );

    Json(PreviewResponse {
        start_date: req.start_date,
        pattern_label: format::format_pattern(&req.config),
        end_label: format::format_end_condition(&req.config),
        instances: instances.into_iter().map(to_instance_response).collect(),
    })
    .into_response()
}
