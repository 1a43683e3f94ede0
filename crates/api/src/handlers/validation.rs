//! Handlers for the `/validator-test` resource.
//!
//! Decodes the request body into an input record, evaluates it against the
//! rule set of the requested shape and renders the result.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use rulecheck_core::record::InputRecord;
use rulecheck_core::shapes::MEASUREMENT_SHAPE;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::record::RecordPayload;
use crate::response::{DataResponse, ResponseFormat, ValidationResponse};
use crate::state::AppState;

/// Summary of one accepted input shape.
#[derive(Debug, Serialize)]
pub struct ShapeSummary {
    pub name: String,
    pub fields: Vec<String>,
    pub rule_count: usize,
}

/// GET /api/v1/validator-test
///
/// List every input shape with the fields its rule set declares.
pub async fn list_shapes(State(state): State<AppState>) -> Json<DataResponse<Vec<ShapeSummary>>> {
    let shapes: Vec<ShapeSummary> = state
        .catalog
        .iter()
        .map(|rule_set| ShapeSummary {
            name: rule_set.name().to_string(),
            fields: rule_set.fields().into_iter().map(str::to_string).collect(),
            rule_count: rule_set.len(),
        })
        .collect();
    Json(DataResponse { data: shapes })
}

/// POST /api/v1/validator-test
///
/// Validate the body against the default `measurement` shape.
pub async fn validate_default(
    State(state): State<AppState>,
    headers: HeaderMap,
    RecordPayload(record): RecordPayload,
) -> AppResult<ValidationResponse> {
    evaluate_shape(&state, MEASUREMENT_SHAPE, &headers, &record)
}

/// POST /api/v1/validator-test/{shape}
///
/// Validate the body against a named shape. Returns 404 for unknown shapes.
pub async fn validate_shape(
    State(state): State<AppState>,
    Path(shape): Path<String>,
    headers: HeaderMap,
    RecordPayload(record): RecordPayload,
) -> AppResult<ValidationResponse> {
    evaluate_shape(&state, &shape, &headers, &record)
}

fn evaluate_shape(
    state: &AppState,
    shape: &str,
    headers: &HeaderMap,
    record: &InputRecord,
) -> AppResult<ValidationResponse> {
    let rule_set = state.catalog.get(shape)?;
    let violations = rule_set.evaluate(record);

    if violations.is_empty() {
        tracing::debug!(shape, fields = record.len(), "Input record accepted");
    } else {
        tracing::info!(
            shape,
            fields = record.len(),
            violations = violations.len(),
            "Input record rejected"
        );
    }

    Ok(ValidationResponse {
        violations,
        format: ResponseFormat::negotiate(headers),
    })
}
