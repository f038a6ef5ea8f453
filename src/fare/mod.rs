pub mod model;
pub mod rules;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::warn;

use crate::services::maps::RouteInfo;
use crate::zones::{Borough, ZoneId, ZoneStore, JFK_ZONE};
use model::FarePredictor;

pub const JFK_FLAT_FARE: f64 = 52.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    CreditCard,
    Cash,
}

impl PaymentType {
    /// Anything other than "Cash" falls back to credit card.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Cash" => PaymentType::Cash,
            _ => PaymentType::CreditCard,
        }
    }

    /// Categorical token as the model was trained on it.
    pub fn token(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "1.0",
            PaymentType::Cash => "2.0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateCode {
    Standard,
    JfkFlat,
}

impl RateCode {
    pub fn token(&self) -> &'static str {
        match self {
            RateCode::Standard => "1.0",
            RateCode::JfkFlat => "2.0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateCode::Standard => "Standard Rate",
            RateCode::JfkFlat => "JFK Flat Rate",
        }
    }
}

/// Feature vector consumed by the fare model.
///
/// Rate code, payment type and zone ids are categorical; they reach the
/// model as string tokens via the `token()`/`to_string()` encodings.
#[derive(Debug, Clone)]
pub struct TripFeatures {
    pub trip_distance: f64,
    pub trip_duration: f64,
    pub pickup_hour: u32,
    /// Monday = 0 .. Sunday = 6
    pub pickup_dayofweek: u32,
    pub pickup_month: u32,
    pub is_weekend: bool,
    pub rate_code_id: RateCode,
    pub payment_type: PaymentType,
    pub pickup_zone: ZoneId,
    pub dropoff_zone: ZoneId,
}

/// Itemized fare. Unrounded; rounding happens once at the response boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FareBreakdown {
    pub base_fare: f64,
    pub extra: f64,
    pub congestion: f64,
    pub tolls: f64,
    pub mta_tax: f64,
    pub improvement_surcharge: f64,
    pub total: f64,
}

impl FareBreakdown {
    /// Degraded breakdown used when pricing fails.
    pub fn zeroed() -> Self {
        Self::default()
    }

    fn jfk_flat() -> Self {
        Self {
            base_fare: JFK_FLAT_FARE,
            total: JFK_FLAT_FARE,
            ..Self::default()
        }
    }
}

/// Trips between JFK and Manhattan ride at the flat rate, in either
/// direction.
pub fn is_jfk_flat_rate(store: &ZoneStore, pickup_zone: ZoneId, dropoff_zone: ZoneId) -> bool {
    let manhattan = store.zones_in_borough(Borough::Manhattan);
    (pickup_zone == JFK_ZONE && manhattan.contains(&dropoff_zone))
        || (dropoff_zone == JFK_ZONE && manhattan.contains(&pickup_zone))
}

/// Compose an itemized fare for a resolved trip.
///
/// JFK flat-rate trips bypass the model and every surcharge. For standard
/// trips the base fare comes from the model and the surcharges from the rule
/// estimators; if prediction fails the whole breakdown degrades to zeros
/// rather than failing the request.
pub fn compose_fare(
    store: &ZoneStore,
    predictor: &dyn FarePredictor,
    pickup_zone: ZoneId,
    dropoff_zone: ZoneId,
    route: RouteInfo,
    pickup_time: NaiveDateTime,
    payment_type: PaymentType,
) -> (FareBreakdown, RateCode) {
    if is_jfk_flat_rate(store, pickup_zone, dropoff_zone) {
        return (FareBreakdown::jfk_flat(), RateCode::JfkFlat);
    }

    let pickup_hour = pickup_time.hour();
    let pickup_dayofweek = pickup_time.weekday().num_days_from_monday();

    let features = TripFeatures {
        trip_distance: route.distance_miles,
        trip_duration: route.duration_minutes,
        pickup_hour,
        pickup_dayofweek,
        pickup_month: pickup_time.month(),
        is_weekend: pickup_dayofweek >= 5,
        rate_code_id: RateCode::Standard,
        payment_type,
        pickup_zone,
        dropoff_zone,
    };

    let breakdown = match predictor.predict(&features) {
        Ok(base_fare) => {
            let extra = rules::estimate_extra(pickup_hour, pickup_dayofweek);
            let congestion = rules::CONGESTION_SURCHARGE;
            let tolls = rules::TOLLS_AMOUNT;
            let mta_tax = rules::MTA_TAX;
            let improvement_surcharge = rules::IMPROVEMENT_SURCHARGE;
            FareBreakdown {
                base_fare,
                extra,
                congestion,
                tolls,
                mta_tax,
                improvement_surcharge,
                total: base_fare + extra + congestion + tolls + mta_tax + improvement_surcharge,
            }
        }
        Err(err) => {
            warn!(%err, "Fare prediction failed, returning zeroed breakdown");
            FareBreakdown::zeroed()
        }
    };

    (breakdown, RateCode::Standard)
}
