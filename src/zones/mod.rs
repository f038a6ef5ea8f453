pub mod nearest;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub type ZoneId = u16;

/// Fallback zone for addresses that are plausibly in the service area but
/// cannot be narrowed to a real zone.
pub const UNKNOWN_ZONE: ZoneId = 161;

/// TLC zone ids for the three airports handled by address short-circuits.
pub const JFK_ZONE: ZoneId = 132;
pub const LAGUARDIA_ZONE: ZoneId = 138;
pub const NEWARK_ZONE: ZoneId = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    StatenIsland,
    Ewr,
}

impl Borough {
    pub const ALL: [Borough; 6] = [
        Borough::Manhattan,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
        Borough::Ewr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
            Borough::Ewr => "EWR",
        }
    }

    /// Exact name match against the recognized borough set.
    pub fn from_name(name: &str) -> Option<Borough> {
        Borough::ALL.iter().copied().find(|b| b.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub borough: String,
    pub centroid: GeoPoint,
}

/// CSV row shape of the TLC zone table.
#[derive(Debug, Deserialize)]
struct ZoneRecord {
    #[serde(rename = "LocationID")]
    location_id: ZoneId,
    borough: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Failed to read zone table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse zone table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Zone table is empty")]
    Empty,
}

/// Immutable lookup tables over the TLC taxi zones, built once at startup.
///
/// Zone ids are sparse and preserved exactly as given. Zones whose borough
/// is not one of the six recognized names stay in the full table but are
/// excluded from the borough index.
#[derive(Debug)]
pub struct ZoneStore {
    ids: Vec<ZoneId>,
    centroids: HashMap<ZoneId, GeoPoint>,
    borough_index: HashMap<Borough, Vec<ZoneId>>,
}

impl ZoneStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ZoneError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ZoneError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut zones = Vec::new();
        for record in csv_reader.deserialize::<ZoneRecord>() {
            let record = record?;
            zones.push(Zone {
                id: record.location_id,
                borough: record.borough,
                centroid: GeoPoint {
                    lat: record.latitude,
                    lng: record.longitude,
                },
            });
        }
        Self::from_zones(zones)
    }

    pub fn from_zones(zones: Vec<Zone>) -> Result<Self, ZoneError> {
        if zones.is_empty() {
            return Err(ZoneError::Empty);
        }

        let mut ids = Vec::with_capacity(zones.len());
        let mut centroids = HashMap::with_capacity(zones.len());
        let mut borough_index: HashMap<Borough, Vec<ZoneId>> = HashMap::new();

        for zone in zones {
            ids.push(zone.id);
            centroids.insert(zone.id, zone.centroid);
            if let Some(borough) = Borough::from_name(&zone.borough) {
                borough_index.entry(borough).or_default().push(zone.id);
            }
        }

        Ok(Self {
            ids,
            centroids,
            borough_index,
        })
    }

    pub fn centroid_of(&self, id: ZoneId) -> Option<GeoPoint> {
        self.centroids.get(&id).copied()
    }

    /// Zone ids within a borough, in table order. Empty if the borough has
    /// no zones in the table.
    pub fn zones_in_borough(&self, borough: Borough) -> &[ZoneId] {
        self.borough_index
            .get(&borough)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All zone ids in table order.
    pub fn all_zone_ids(&self) -> &[ZoneId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn fixture_store() -> ZoneStore {
    // Small table covering all boroughs plus one unrecognized borough name.
    let zones = vec![
        Zone {
            id: NEWARK_ZONE,
            borough: "EWR".into(),
            centroid: GeoPoint {
                lat: 40.6895,
                lng: -74.1745,
            },
        },
        Zone {
            id: 4,
            borough: "Manhattan".into(),
            centroid: GeoPoint {
                lat: 40.7243,
                lng: -73.9753,
            },
        },
        Zone {
            id: 90,
            borough: "Manhattan".into(),
            centroid: GeoPoint {
                lat: 40.7429,
                lng: -73.9897,
            },
        },
        Zone {
            id: UNKNOWN_ZONE,
            borough: "Manhattan".into(),
            centroid: GeoPoint {
                lat: 40.7586,
                lng: -73.9747,
            },
        },
        Zone {
            id: JFK_ZONE,
            borough: "Queens".into(),
            centroid: GeoPoint {
                lat: 40.6437,
                lng: -73.7846,
            },
        },
        Zone {
            id: LAGUARDIA_ZONE,
            borough: "Queens".into(),
            centroid: GeoPoint {
                lat: 40.7746,
                lng: -73.8731,
            },
        },
        Zone {
            id: 61,
            borough: "Brooklyn".into(),
            centroid: GeoPoint {
                lat: 40.6674,
                lng: -73.9576,
            },
        },
        Zone {
            id: 18,
            borough: "Bronx".into(),
            centroid: GeoPoint {
                lat: 40.8656,
                lng: -73.8478,
            },
        },
        Zone {
            id: 23,
            borough: "Staten Island".into(),
            centroid: GeoPoint {
                lat: 40.5795,
                lng: -74.1502,
            },
        },
        Zone {
            id: 999,
            borough: "Jersey City".into(),
            centroid: GeoPoint {
                lat: 40.7178,
                lng: -74.0431,
            },
        },
    ];
    ZoneStore::from_zones(zones).expect("fixture zone table must build")
}
