//! HTTP request handlers for the resolution API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{ExistingAssignment, LedgerBook, ShiftSlot};
use crate::resolution::{InMemorySlotSource, ResolutionEngine};

use super::request::ResolutionRequest;
use super::response::{ApiError, ApiErrorResponse, ResolutionResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/resolve", post(resolve_handler))
        .with_state(state)
}

/// Handler for POST /resolve endpoint.
///
/// Runs one resolution pass over the posted slots with a fresh ledger book.
async fn resolve_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResolutionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing resolution request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    if let Err(error) = validate_request(&request) {
        warn!(
            correlation_id = %correlation_id,
            error = %error.message,
            "Request validation failed"
        );
        return (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
            Json(error),
        )
            .into_response();
    }

    let slot_count = request.slots.len();
    match resolve_request(state.engine(), request) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                pass_id = %response.summary.pass_id,
                slots = slot_count,
                assigned = response.summary.assigned,
                failed = response.summary.failures.len(),
                duration_us = response.summary.duration_us,
                "Resolution completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Resolution failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Runs a full pass for one request: seed, resolve, collect.
///
/// Exposed so the CLI and tests can drive the same path as the endpoint.
pub fn resolve_request(
    engine: &ResolutionEngine,
    request: ResolutionRequest,
) -> EngineResult<ResolutionResponse> {
    let existing: Vec<ExistingAssignment> = request
        .existing_assignments
        .into_iter()
        .map(Into::into)
        .collect();
    let slots: Vec<ShiftSlot> = request.slots.into_iter().map(Into::into).collect();

    let mut ledgers = LedgerBook::new();
    engine.seed(&mut ledgers, &existing)?;

    let mut source = InMemorySlotSource::new(slots);
    let mut decisions = Vec::new();
    let summary = engine.run(&mut source, &mut decisions, &mut ledgers)?;

    Ok(ResolutionResponse {
        summary,
        decisions,
        ledgers,
    })
}

fn validate_request(request: &ResolutionRequest) -> Result<(), ApiError> {
    for (index, slot) in request.slots.iter().enumerate() {
        if slot.area.trim().is_empty() {
            return Err(ApiError::validation_error(format!(
                "slots[{}].area must not be empty",
                index
            )));
        }
        if slot.date_key.trim().is_empty() {
            return Err(ApiError::validation_error(format!(
                "slots[{}].date_key must not be empty",
                index
            )));
        }
    }

    for (index, existing) in request.existing_assignments.iter().enumerate() {
        if existing.name.trim().is_empty() {
            return Err(ApiError::validation_error(format!(
                "existing_assignments[{}].name must not be empty",
                index
            )));
        }
    }

    Ok(())
}
