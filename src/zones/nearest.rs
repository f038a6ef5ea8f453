use super::{GeoPoint, ZoneId, ZoneStore, UNKNOWN_ZONE};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Zone with the closest centroid to `point` among `candidates`.
///
/// Iteration follows the candidate slice order, so the first minimum wins.
/// Candidates without a centroid in the store (or with a centroid that
/// produces a NaN distance) are skipped. If nothing remains, the unknown
/// zone is returned.
pub fn nearest_zone(store: &ZoneStore, point: GeoPoint, candidates: &[ZoneId]) -> ZoneId {
    let mut nearest = UNKNOWN_ZONE;
    let mut min_distance = f64::INFINITY;

    for &id in candidates {
        let Some(centroid) = store.centroid_of(id) else {
            continue;
        };
        let distance = haversine_km(point, centroid);
        if distance < min_distance {
            min_distance = distance;
            nearest = id;
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::{fixture_store, JFK_ZONE, LAGUARDIA_ZONE};

    const JFK: GeoPoint = GeoPoint {
        lat: 40.6413,
        lng: -73.7781,
    };
    const LAGUARDIA: GeoPoint = GeoPoint {
        lat: 40.7769,
        lng: -73.8740,
    };

    #[test]
    fn haversine_matches_known_distance() {
        // JFK to LaGuardia is roughly 17 km as the crow flies.
        let d = haversine_km(JFK, LAGUARDIA);
        assert!(d > 15.0 && d < 19.0, "got {d} km");
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert!(haversine_km(JFK, JFK).abs() < 1e-9);
    }

    #[test]
    fn returns_member_of_candidate_set() {
        let store = fixture_store();
        let candidates = [JFK_ZONE, LAGUARDIA_ZONE, 61];
        let id = nearest_zone(&store, JFK, &candidates);
        assert!(candidates.contains(&id));
        assert_eq!(id, JFK_ZONE);
    }

    #[test]
    fn restricted_search_stays_in_candidate_set() {
        let store = fixture_store();
        // A point near JFK resolved against Brooklyn only must still pick
        // a Brooklyn zone.
        let id = nearest_zone(&store, JFK, &[61]);
        assert_eq!(id, 61);
    }

    #[test]
    fn empty_candidate_set_returns_unknown_zone() {
        let store = fixture_store();
        assert_eq!(nearest_zone(&store, JFK, &[]), UNKNOWN_ZONE);
    }

    #[test]
    fn candidates_without_centroids_are_skipped() {
        let store = fixture_store();
        assert_eq!(nearest_zone(&store, JFK, &[5000, 5001]), UNKNOWN_ZONE);
        assert_eq!(nearest_zone(&store, JFK, &[5000, JFK_ZONE]), JFK_ZONE);
    }
}
