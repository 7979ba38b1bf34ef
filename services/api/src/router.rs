//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, KeyExpressionBody, OpinionResult, ProcessOpinionPayload},
    state::AppState,
};

use axum::{Router, routing::post};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::process_opinion),
    components(
        schemas(ProcessOpinionPayload, OpinionResult, KeyExpressionBody, ErrorResponse)
    ),
    tags(
        (name = "Lesson API", description = "Opinion feedback and translation for lesson learners")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/process-opinion", post(handlers::process_opinion))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
