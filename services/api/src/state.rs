//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! immutable services handed to every request handler.

use lesson_core::OpinionProcessingService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub opinion_service: Arc<OpinionProcessingService>,
}

impl AppState {
    pub fn new(opinion_service: OpinionProcessingService) -> Self {
        Self {
            opinion_service: Arc::new(opinion_service),
        }
    }
}
