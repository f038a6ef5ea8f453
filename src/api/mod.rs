pub mod error;
pub mod health;
pub mod predict;

pub use error::ErrorResponse;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::fare::model::FarePredictor;
use crate::services::maps::MapsClient;
use crate::zones::ZoneStore;

/// Read-only shared state: built once at startup, never mutated.
#[derive(Clone)]
pub struct AppState {
    pub zones: Arc<ZoneStore>,
    pub model: Arc<dyn FarePredictor>,
    pub maps: MapsClient,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict::predict_fare))
        .route("/health", get(health::health_check))
        .with_state(state)
}
