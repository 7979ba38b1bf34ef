//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling opinion-processing requests.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lesson_core::{OpinionError, OpinionSubmission};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::{
    models::{ErrorResponse, OpinionResult, ProcessOpinionPayload},
    state::AppState,
};

/// The only message callers see for processing failures, whatever the cause.
pub const PROCESSING_FAILED: &str = "Failed to process opinion";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// A body the JSON extractor refused, answered with the extractor's own
    /// status (400 for malformed JSON, 415 for a missing content type).
    Rejected { status: StatusCode, message: String },
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Rejected { status, message } => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: PROCESSING_FAILED.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<OpinionError> for ApiError {
    fn from(err: OpinionError) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::InternalServerError(err.into())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Process a learner's opinion.
///
/// English opinions receive feedback; other languages are translated to English.
/// Both also return the key expressions found in the English text.
#[utoipa::path(
    post,
    path = "/api/process-opinion",
    request_body = ProcessOpinionPayload,
    responses(
        (status = 200, description = "Opinion processed", body = OpinionResult),
        (status = 400, description = "Missing text, unsupported language, or malformed JSON", body = ErrorResponse),
        (status = 415, description = "Request is not `application/json`", body = ErrorResponse),
        (status = 500, description = "Completion or parsing failure", body = ErrorResponse)
    )
)]
pub async fn process_opinion(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProcessOpinionPayload>, JsonRejection>,
) -> Result<Json<OpinionResult>, ApiError> {
    let Json(payload) = payload?;
    let submission_id = Uuid::new_v4();

    async move {
        let submission = OpinionSubmission::new(
            payload.text.unwrap_or_default(),
            payload.language.as_deref().unwrap_or_default(),
        )?;
        info!(
            language = %submission.language,
            chars = submission.text.chars().count(),
            "Processing opinion"
        );

        let envelope = state.opinion_service.process_submission(&submission).await?;
        Ok::<_, ApiError>(Json(OpinionResult::from(envelope)))
    }
    .instrument(info_span!("submission", %submission_id))
    .await
}
