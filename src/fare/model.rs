use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::TripFeatures;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model evaluation failed: {0}")]
    Evaluation(String),
}

/// Base-fare prediction capability. The concrete model is loaded once at
/// startup and treated as a black box; tests inject stubs.
pub trait FarePredictor: Send + Sync {
    fn predict(&self, features: &TripFeatures) -> Result<f64, PredictError>;
}

/// Regression model persisted as a JSON artifact: an intercept, numeric
/// coefficients keyed by feature name, and categorical weights keyed by
/// `"<feature>=<token>"`. A categorical token absent from the artifact
/// contributes nothing, like an unseen one-hot column.
#[derive(Debug, Deserialize)]
pub struct CoefficientModel {
    intercept: f64,
    #[serde(default)]
    numeric: HashMap<String, f64>,
    #[serde(default)]
    categorical: HashMap<String, f64>,
}

impl CoefficientModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    fn numeric_term(&self, name: &str, value: f64) -> f64 {
        self.numeric.get(name).copied().unwrap_or(0.0) * value
    }

    fn categorical_term(&self, name: &str, token: &str) -> f64 {
        self.categorical
            .get(&format!("{name}={token}"))
            .copied()
            .unwrap_or(0.0)
    }
}

impl FarePredictor for CoefficientModel {
    fn predict(&self, features: &TripFeatures) -> Result<f64, PredictError> {
        let mut fare = self.intercept;

        fare += self.numeric_term("trip_distance", features.trip_distance);
        fare += self.numeric_term("trip_duration", features.trip_duration);
        fare += self.numeric_term("pickup_hour", features.pickup_hour as f64);
        fare += self.numeric_term("pickup_dayofweek", features.pickup_dayofweek as f64);
        fare += self.numeric_term("pickup_month", features.pickup_month as f64);
        fare += self.numeric_term("is_weekend", if features.is_weekend { 1.0 } else { 0.0 });

        // Categorical features enter as string tokens, never as magnitudes.
        fare += self.categorical_term("rate_code_id", features.rate_code_id.token());
        fare += self.categorical_term("payment_type", features.payment_type.token());
        fare += self.categorical_term("pickup_zone", &features.pickup_zone.to_string());
        fare += self.categorical_term("dropoff_zone", &features.dropoff_zone.to_string());

        Ok(fare.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::{PaymentType, RateCode};

    fn features() -> TripFeatures {
        TripFeatures {
            trip_distance: 10.0,
            trip_duration: 30.0,
            pickup_hour: 14,
            pickup_dayofweek: 2,
            pickup_month: 6,
            is_weekend: false,
            rate_code_id: RateCode::Standard,
            payment_type: PaymentType::CreditCard,
            pickup_zone: 90,
            dropoff_zone: 132,
        }
    }

    fn model() -> CoefficientModel {
        serde_json::from_str(
            r#"{
                "intercept": 3.0,
                "numeric": {"trip_distance": 2.0, "trip_duration": 0.5},
                "categorical": {
                    "payment_type=2.0": -0.25,
                    "dropoff_zone=132": 4.0
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn sums_intercept_numeric_and_categorical_terms() {
        let fare = model().predict(&features()).unwrap();
        // 3.0 + 2.0*10 + 0.5*30 + 4.0 (dropoff_zone=132)
        assert!((fare - 42.0).abs() < 1e-9);
    }

    #[test]
    fn categorical_tokens_are_strings_not_magnitudes() {
        let mut f = features();
        f.payment_type = PaymentType::Cash;
        let fare = model().predict(&f).unwrap();
        assert!((fare - 41.75).abs() < 1e-9);
    }

    #[test]
    fn unseen_category_contributes_nothing() {
        let mut f = features();
        f.dropoff_zone = 7;
        let fare = model().predict(&f).unwrap();
        assert!((fare - 38.0).abs() < 1e-9);
    }

    #[test]
    fn negative_raw_output_clamps_to_zero() {
        let model: CoefficientModel =
            serde_json::from_str(r#"{"intercept": -5.0}"#).unwrap();
        assert_eq!(model.predict(&features()).unwrap(), 0.0);
    }

    #[test]
    fn rejects_malformed_artifact() {
        let result: Result<CoefficientModel, _> = serde_json::from_str("{\"intercept\": \"x\"}");
        assert!(result.is_err());
    }
}
