use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::zones::GeoPoint;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

const METERS_PER_MILE: f64 = 1609.34;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Maps API error: {0}")]
    Api(String),
}

/// Driving route summary for a pickup/dropoff pair.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteInfo {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for GeoPoint {
    fn from(value: LatLng) -> Self {
        GeoPoint {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: ValueField,
    duration: ValueField,
}

/// Google reports distances in meters and durations in seconds under a
/// nested `value` field.
#[derive(Debug, Deserialize)]
struct ValueField {
    value: f64,
}

/// Client for the Google Maps Geocoding and Directions web APIs.
#[derive(Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    api_key: String,
}

impl MapsClient {
    pub fn new(api_key: String) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, api_key })
    }

    /// Geocode a free-text address. An empty vec means the address did not
    /// match anything (ZERO_RESULTS), which is not an error.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, MapsError> {
        let response = self
            .http
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;
        let body: GeocodeResponse = response.json().await?;
        debug!(status = %body.status, results = body.results.len(), "Geocode response");
        geocode_results(body)
    }

    /// Driving route between two addresses. `None` means no route exists.
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<RouteInfo>, MapsError> {
        let response = self
            .http
            .get(DIRECTIONS_URL)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body: DirectionsResponse = response.json().await?;
        debug!(status = %body.status, routes = body.routes.len(), "Directions response");
        route_from(body)
    }
}

fn geocode_results(body: GeocodeResponse) -> Result<Vec<GeocodeResult>, MapsError> {
    match body.status.as_str() {
        "OK" => Ok(body.results),
        "ZERO_RESULTS" => Ok(Vec::new()),
        other => Err(MapsError::Api(format!("geocode returned status {other}"))),
    }
}

fn route_from(body: DirectionsResponse) -> Result<Option<RouteInfo>, MapsError> {
    match body.status.as_str() {
        "OK" => {
            let leg = body
                .routes
                .first()
                .and_then(|route| route.legs.first());
            Ok(leg.map(|leg| RouteInfo {
                distance_miles: leg.distance.value / METERS_PER_MILE,
                duration_minutes: leg.duration.value / 60.0,
            }))
        }
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
        other => Err(MapsError::Api(format!(
            "directions returned status {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_geocode_response() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "geometry": {"location": {"lat": 40.7484, "lng": -73.9857}},
                "address_components": [
                    {"long_name": "Manhattan", "short_name": "Manhattan",
                     "types": ["political", "sublocality", "sublocality_level_1"]},
                    {"long_name": "New York", "short_name": "NY",
                     "types": ["locality", "political"]}
                ]
            }]
        }"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let results = geocode_results(body).unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].geometry.location.lat - 40.7484).abs() < 1e-9);
        assert_eq!(results[0].address_components[0].long_name, "Manhattan");
    }

    #[test]
    fn geocode_zero_results_is_empty_not_error() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert!(geocode_results(body).unwrap().is_empty());
    }

    #[test]
    fn geocode_denied_status_is_an_error() {
        let json = r#"{"status": "REQUEST_DENIED", "results": []}"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let err = geocode_results(body).unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[test]
    fn parses_directions_leg_into_route_info() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "legs": [{
                    "distance": {"text": "10 mi", "value": 16093.4},
                    "duration": {"text": "30 mins", "value": 1800}
                }]
            }]
        }"#;
        let body: DirectionsResponse = serde_json::from_str(json).unwrap();
        let route = route_from(body).unwrap().unwrap();
        assert!((route.distance_miles - 10.0).abs() < 1e-6);
        assert!((route.duration_minutes - 30.0).abs() < 1e-9);
    }

    #[test]
    fn no_route_is_none_not_error() {
        let json = r#"{"status": "ZERO_RESULTS", "routes": []}"#;
        let body: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(route_from(body).unwrap().is_none());

        // OK with no routes also counts as no route.
        let json = r#"{"status": "OK", "routes": []}"#;
        let body: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(route_from(body).unwrap().is_none());
    }
}
