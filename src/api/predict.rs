use axum::{extract::State, http::StatusCode, Json};
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use super::{AppState, ErrorResponse};
use crate::fare::{compose_fare, PaymentType};
use crate::resolve::{resolve_address, Resolution};
use crate::zones::ZoneId;

const OUT_OF_AREA_MESSAGE: &str = "Currently, only NYC areas are supported.";
const NO_ROUTE_MESSAGE: &str = "Could not find a driving route between these locations.";
const INTERNAL_MESSAGE: &str = "Unexpected error occurred.";

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    pub pickup_address: String,
    pub dropoff_address: String,
    /// "Credit Card" (default) or "Cash"
    #[serde(default)]
    pub payment_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub total_amount: f64,
    pub base_fare: f64,
    pub extra: f64,
    pub congestion: f64,
    pub tolls: f64,
    pub mta: f64,
    pub improvement: f64,
    pub details: TripDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TripDetails {
    pub distance_miles: f64,
    pub duration_minutes: f64,
    pub pickup_zone_id: ZoneId,
    pub dropoff_zone_id: ZoneId,
    /// Monday = 0 .. Sunday = 6
    pub pickup_dayofweek: u32,
    pub pickup_hour: u32,
    /// YYYY-MM-DD
    pub pickup_date: String,
    /// "Standard Rate" or "JFK Flat Rate"
    pub rate_code: String,
}

/// Monetary rounding, applied once at the response boundary.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate an itemized taxi fare between two addresses
#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Itemized fare estimate", body = PredictResponse),
        (status = 400, description = "Address outside the service area or no driving route", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "fares"
)]
pub async fn predict_fare(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let payment_type =
        PaymentType::from_label(request.payment_type.as_deref().unwrap_or("Credit Card"));

    let pickup = resolve_address(&request.pickup_address, &state.zones, &state.maps).await;
    let dropoff = resolve_address(&request.dropoff_address, &state.zones, &state.maps).await;

    let (Resolution::Zone(pickup_zone), Resolution::Zone(dropoff_zone)) = (pickup, dropoff) else {
        return Err(ErrorResponse::bad_request(OUT_OF_AREA_MESSAGE));
    };

    let route = state
        .maps
        .directions(&request.pickup_address, &request.dropoff_address)
        .await
        .map_err(|err| {
            error!(%err, "Directions request failed");
            ErrorResponse::internal(INTERNAL_MESSAGE, err.to_string())
        })?;
    let Some(route) = route else {
        return Err(ErrorResponse::bad_request(NO_ROUTE_MESSAGE));
    };

    let now = Local::now().naive_local();
    let (breakdown, rate_code) = compose_fare(
        &state.zones,
        state.model.as_ref(),
        pickup_zone,
        dropoff_zone,
        route,
        now,
        payment_type,
    );

    info!(
        pickup_zone,
        dropoff_zone,
        rate_code = rate_code.label(),
        total = breakdown.total,
        "Fare estimated"
    );

    Ok(Json(PredictResponse {
        total_amount: round2(breakdown.total),
        base_fare: round2(breakdown.base_fare),
        extra: round2(breakdown.extra),
        congestion: round2(breakdown.congestion),
        tolls: round2(breakdown.tolls),
        mta: round2(breakdown.mta_tax),
        improvement: round2(breakdown.improvement_surcharge),
        details: TripDetails {
            distance_miles: round2(route.distance_miles),
            duration_minutes: round2(route.duration_minutes),
            pickup_zone_id: pickup_zone,
            dropoff_zone_id: dropoff_zone,
            pickup_dayofweek: now.weekday().num_days_from_monday(),
            pickup_hour: now.hour(),
            pickup_date: now.format("%Y-%m-%d").to_string(),
            rate_code: rate_code.label().to_string(),
        },
    }))
}
