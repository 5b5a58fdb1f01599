use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Major,
    Medium,
    Small,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Medium => "medium",
            Self::Small => "small",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "major" => Some(Self::Major),
            "medium" => Some(Self::Medium),
            "small" => Some(Self::Small),
            _ => None,
        }
    }
}

/// Map detail level derived from a zoom value; decides which importance
/// tiers are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapView {
    World,
    Regional,
    Detailed,
}

impl MapView {
    pub fn from_zoom(zoom: u8) -> Self {
        match zoom {
            0..=4 => Self::World,
            5..=7 => Self::Regional,
            _ => Self::Detailed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::World => "World View",
            Self::Regional => "Regional View",
            Self::Detailed => "Detailed View",
        }
    }

    pub fn shows(self, importance: Importance) -> bool {
        match self {
            Self::World => importance == Importance::Major,
            Self::Regional => importance != Importance::Small,
            Self::Detailed => true,
        }
    }
}

/// Latitude/longitude pair, persisted as a `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !((-90.0)..=90.0).contains(&self.latitude) {
            return Err(ValidationError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !((-180.0)..=180.0).contains(&self.longitude) {
            return Err(ValidationError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.latitude, value.longitude]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub visited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub emoji: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_custom: bool,
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

impl City {
    pub fn continent(&self) -> Option<crate::Continent> {
        crate::continent_for(&self.country)
    }

    pub(crate) fn set_visited(&mut self, visited: bool, now: DateTime<Utc>) {
        self.visited = visited;
        self.visited_date = visited.then_some(now);
    }

    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.country.to_lowercase().contains(needle)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Payload for a user-added city; the store assigns id and visit state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub emoji: Option<String>,
    pub importance: Importance,
    pub population: Option<u64>,
}

impl NewCity {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            coordinates,
            emoji: None,
            importance: Importance::Small,
            population: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(&self.name)?;
        self.coordinates.validate()
    }
}

pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("city name must not be empty")]
    EmptyName,
    #[error("latitude must be a finite value in [-90, 90], got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be a finite value in [-180, 180], got {0}")]
    InvalidLongitude(f64),
}
