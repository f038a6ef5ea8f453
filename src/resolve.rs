use tracing::warn;

use crate::services::maps::{AddressComponent, GeocodeResult, MapsClient};
use crate::zones::nearest::nearest_zone;
use crate::zones::{
    Borough, GeoPoint, ZoneId, ZoneStore, JFK_ZONE, LAGUARDIA_ZONE, NEWARK_ZONE, UNKNOWN_ZONE,
};

// Service-area bounding box around the five boroughs, inclusive on the edges.
const NYC_MIN_LAT: f64 = 40.4774;
const NYC_MAX_LAT: f64 = 40.9176;
const NYC_MIN_LNG: f64 = -74.2591;
const NYC_MAX_LNG: f64 = -73.7004;

/// Outcome of resolving a free-text address to a taxi zone.
///
/// Resolution never fails: geocoding errors and ambiguous addresses collapse
/// to the unknown zone, and only a coordinate outside the service area is
/// surfaced as a distinct outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Zone(ZoneId),
    OutOfArea,
}

/// Airport matches on the raw address, checked before any network call.
pub fn airport_shortcut(address: &str) -> Option<ZoneId> {
    let lower = address.to_lowercase();
    if lower.contains("jfk") || lower.contains("john f kennedy") {
        return Some(JFK_ZONE);
    }
    if lower.contains("laguardia") || lower.contains("la guardia") {
        return Some(LAGUARDIA_ZONE);
    }
    if lower.contains("newark") && lower.contains("airport") {
        return Some(NEWARK_ZONE);
    }
    None
}

pub fn in_nyc_bounds(point: GeoPoint) -> bool {
    (NYC_MIN_LAT..=NYC_MAX_LAT).contains(&point.lat)
        && (NYC_MIN_LNG..=NYC_MAX_LNG).contains(&point.lng)
}

fn has_types(component: &AddressComponent, a: &str, b: &str) -> bool {
    component.types.iter().any(|t| t == a) && component.types.iter().any(|t| t == b)
}

/// Borough from a geocode result's address components.
///
/// A component tagged `sublocality_level_1` + `political` names the borough
/// directly and is preferred wherever it appears in the list, since the
/// provider's component ordering is not stable. Failing that, the first
/// `administrative_area_level_2` + `political` component whose name contains
/// a recognized borough name decides.
pub fn borough_of(components: &[AddressComponent]) -> Option<Borough> {
    if let Some(component) = components
        .iter()
        .find(|c| has_types(c, "sublocality_level_1", "political"))
    {
        return Borough::from_name(&component.long_name);
    }

    components
        .iter()
        .filter(|c| has_types(c, "administrative_area_level_2", "political"))
        .find_map(|c| {
            Borough::ALL
                .iter()
                .copied()
                .find(|b| c.long_name.contains(b.as_str()))
        })
}

/// Nearest zone to `point`, restricted to the borough's zones when the
/// borough is known.
pub fn zone_for_point(store: &ZoneStore, point: GeoPoint, borough: Option<Borough>) -> ZoneId {
    match borough {
        Some(borough) => nearest_zone(store, point, store.zones_in_borough(borough)),
        None => nearest_zone(store, point, store.all_zone_ids()),
    }
}

/// Resolve a free-text address to a taxi zone.
///
/// Policy, first match wins: airport short-circuit, geocode (no result means
/// unknown zone), service-area bounding box, borough-restricted nearest-zone
/// search. Geocoding failures are absorbed into the unknown zone.
pub async fn resolve_address(address: &str, store: &ZoneStore, maps: &MapsClient) -> Resolution {
    if let Some(zone) = airport_shortcut(address) {
        return Resolution::Zone(zone);
    }

    let results = match maps.geocode(address).await {
        Ok(results) => results,
        Err(err) => {
            warn!(%err, address, "Geocoding failed, falling back to unknown zone");
            return Resolution::Zone(UNKNOWN_ZONE);
        }
    };

    resolve_geocoded(store, &results)
}

/// Resolution policy over an already-fetched geocode result list.
pub fn resolve_geocoded(store: &ZoneStore, results: &[GeocodeResult]) -> Resolution {
    let Some(result) = results.first() else {
        return Resolution::Zone(UNKNOWN_ZONE);
    };

    let point = GeoPoint::from(result.geometry.location);
    if !in_nyc_bounds(point) {
        return Resolution::OutOfArea;
    }

    let borough = borough_of(&result.address_components);
    Resolution::Zone(zone_for_point(store, point, borough))
}
