//! Persisted payload format.
//!
//! Current layout is `{"schema_version": 1, "cities": [...]}`. Version 0 is the
//! legacy bare array, with `visitedDate` as epoch milliseconds (or
//! occasionally an ISO string) and free-form `importance` text.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::error::StorageError;
use crate::model::{City, Coordinates, Importance};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCollection {
    schema_version: u32,
    cities: Vec<City>,
}

#[derive(Debug, Serialize)]
struct PersistedCollectionRef<'a> {
    schema_version: u32,
    cities: &'a [City],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub cities: Vec<City>,
    /// Version the payload was written with; below current means the caller
    /// should write the collection back.
    pub from_version: u32,
    /// Records dropped or corrected while enforcing collection invariants.
    pub repaired: usize,
}

impl Decoded {
    pub fn was_migrated(&self) -> bool {
        self.from_version < CURRENT_SCHEMA_VERSION
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("persisted collection is not valid json")]
    Parse(#[source] serde_json::Error),
    #[error("persisted collection has unexpected shape")]
    Shape,
    #[error("schema version {0} is newer than supported {max}", max = CURRENT_SCHEMA_VERSION)]
    UnsupportedVersion(u32),
}

pub fn encode(cities: &[City]) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(&PersistedCollectionRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        cities,
    })
    .map_err(StorageError::Serialize)
}

pub fn decode(bytes: &[u8], now: DateTime<Utc>) -> Result<Decoded, SchemaError> {
    let value: Value = serde_json::from_slice(bytes).map_err(SchemaError::Parse)?;

    let (from_version, cities) = match &value {
        Value::Array(_) => {
            let legacy: Vec<LegacyCity> =
                serde_json::from_slice(bytes).map_err(SchemaError::Parse)?;
            (0, legacy.into_iter().map(LegacyCity::into_city).collect())
        }
        Value::Object(map) => {
            let version = map
                .get("schema_version")
                .and_then(Value::as_u64)
                .ok_or(SchemaError::Shape)?;
            let version = u32::try_from(version).map_err(|_| SchemaError::Shape)?;
            if version > CURRENT_SCHEMA_VERSION {
                return Err(SchemaError::UnsupportedVersion(version));
            }
            let persisted: PersistedCollection =
                serde_json::from_slice(bytes).map_err(SchemaError::Parse)?;
            (version, persisted.cities)
        }
        _ => return Err(SchemaError::Shape),
    };

    let (cities, repaired) = enforce_invariants(cities, now);
    Ok(Decoded {
        cities,
        from_version,
        repaired,
    })
}

/// Keeps the first record per id, drops records with out-of-range
/// coordinates, and pairs `visited_date` with `visited`.
fn enforce_invariants(cities: Vec<City>, now: DateTime<Utc>) -> (Vec<City>, usize) {
    let mut seen = HashSet::new();
    let mut repaired = 0;
    let mut kept = Vec::with_capacity(cities.len());

    for mut city in cities {
        if !seen.insert(city.id.clone()) {
            repaired += 1;
            continue;
        }
        if let Err(error) = city.coordinates.validate() {
            warn!(
                city_id = %city.id,
                error = %error,
                "dropping persisted city with invalid coordinates"
            );
            repaired += 1;
            continue;
        }
        match (city.visited, city.visited_date) {
            (true, None) => {
                city.visited_date = Some(now);
                repaired += 1;
            }
            (false, Some(_)) => {
                city.visited_date = None;
                repaired += 1;
            }
            _ => {}
        }
        kept.push(city);
    }

    (kept, repaired)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCity {
    id: String,
    name: String,
    country: String,
    coordinates: [f64; 2],
    #[serde(default)]
    visited: bool,
    #[serde(default)]
    visited_date: Option<LegacyTimestamp>,
    #[serde(default)]
    emoji: String,
    #[serde(default)]
    is_custom: Option<bool>,
    #[serde(default)]
    importance: Option<String>,
    #[serde(default)]
    population: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyTimestamp {
    Millis(i64),
    Text(String),
}

impl LegacyTimestamp {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|value| value.with_timezone(&Utc)),
        }
    }
}

impl LegacyCity {
    fn into_city(self) -> City {
        City {
            visited_date: self
                .visited_date
                .as_ref()
                .and_then(LegacyTimestamp::to_datetime),
            id: self.id,
            name: self.name,
            country: self.country,
            coordinates: Coordinates::from(self.coordinates),
            visited: self.visited,
            emoji: self.emoji,
            is_custom: self.is_custom.unwrap_or(false),
            importance: self
                .importance
                .as_deref()
                .and_then(Importance::parse)
                .unwrap_or(Importance::Medium),
            population: self
                .population
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| value.round() as u64),
        }
    }
}
