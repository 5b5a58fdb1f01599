use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::MirrorError;
use crate::model::City;

/// Remote copy of a user's collection. Implementations replace everything
/// stored for `user_id` with `rows`.
pub trait RemoteMirror {
    fn replace_all(&self, user_id: &str, rows: &[MirrorRow]) -> Result<(), MirrorError>;
}

/// One city in the hosted `user_cities` table shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorRow {
    pub user_id: String,
    pub city_id: String,
    pub city_name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub emoji: String,
    pub visited: bool,
    pub is_custom: bool,
    pub importance: &'static str,
    pub population: Option<u64>,
    pub updated_at: String,
}

impl MirrorRow {
    pub fn from_city(user_id: &str, city: &City, updated_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            city_id: city.id.clone(),
            city_name: city.name.clone(),
            country: city.country.clone(),
            latitude: city.coordinates.latitude,
            longitude: city.coordinates.longitude,
            emoji: city.emoji.clone(),
            visited: city.visited,
            is_custom: city.is_custom,
            importance: city.importance.as_str(),
            population: city.population,
            updated_at: updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub rows: usize,
    pub error: Option<String>,
}

/// Pushes the full collection to the mirror. Failures are logged and
/// returned in the outcome; local state is never touched.
pub fn sync_collection<M: RemoteMirror + ?Sized>(
    mirror: &M,
    user_id: &str,
    cities: &[City],
    now: DateTime<Utc>,
) -> SyncOutcome {
    let rows: Vec<MirrorRow> = cities
        .iter()
        .map(|city| MirrorRow::from_city(user_id, city, now))
        .collect();

    match mirror.replace_all(user_id, &rows) {
        Ok(()) => SyncOutcome {
            rows: rows.len(),
            error: None,
        },
        Err(error) => {
            let message = describe(&error);
            warn!(user_id, rows = rows.len(), error = %message, "remote mirror sync failed");
            SyncOutcome {
                rows: 0,
                error: Some(message),
            }
        }
    }
}

fn describe(error: &MirrorError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
