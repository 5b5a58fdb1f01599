use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::PersistWarning;
use crate::ids;
use crate::model::{City, MapView, NewCity, normalize_name};
use crate::schema;
use crate::stats::{self, TravelStats};
use crate::storage::KeyValueStorage;

/// Where the in-memory collection came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    Migrated { from_version: u32 },
    Catalog,
}

/// Result of a mutation. `applied == false` means the command was a no-op
/// (unknown id, rejected input); `warning` is set when the change is only in
/// memory because the write failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mutation {
    pub applied: bool,
    pub city_id: Option<String>,
    pub warning: Option<PersistWarning>,
}

impl Mutation {
    fn skipped() -> Self {
        Self::default()
    }

    pub fn is_durable(&self) -> bool {
        self.warning.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    pub query: String,
    pub only_visited: bool,
    pub only_custom: bool,
    pub zoom: Option<u8>,
}

impl CityFilter {
    fn matches(&self, needle: &str, city: &City) -> bool {
        (!self.only_visited || city.visited)
            && (!self.only_custom || city.is_custom)
            && self
                .zoom
                .is_none_or(|zoom| MapView::from_zoom(zoom).shows(city.importance))
            && city.matches_query(needle)
    }
}

/// Owns the city collection and writes it through to `storage` after every
/// applied mutation.
#[derive(Debug)]
pub struct CityStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    cities: Vec<City>,
    source: LoadSource,
}

impl<S: KeyValueStorage> CityStore<S> {
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        Self::load_at(storage, key, Utc::now())
    }

    /// Never fails: unreadable or unparsable payloads fall back to the
    /// catalog.
    pub fn load_at(storage: S, key: impl Into<String>, now: DateTime<Utc>) -> Self {
        let key = key.into();

        let bytes = match storage.read(&key) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(key = %key, error = %error, "failed to read persisted cities, using catalog");
                None
            }
        };

        let Some(bytes) = bytes else {
            info!(key = %key, "no persisted cities, seeding from catalog");
            return Self::from_catalog(storage, key);
        };

        let decoded = match schema::decode(&bytes, now) {
            Ok(decoded) => decoded,
            Err(error) => {
                warn!(key = %key, error = %error, "persisted cities unusable, using catalog");
                return Self::from_catalog(storage, key);
            }
        };

        let rewrite = decoded.was_migrated() || decoded.repaired > 0;
        let source = if decoded.was_migrated() {
            LoadSource::Migrated {
                from_version: decoded.from_version,
            }
        } else {
            LoadSource::Persisted
        };
        let schema::Decoded {
            cities,
            from_version,
            repaired,
        } = decoded;
        let mut store = Self {
            storage,
            key,
            cities,
            source,
        };

        if rewrite {
            info!(
                key = %store.key,
                from_version,
                repaired,
                "rewriting persisted cities in current schema"
            );
            if let Some(warning) = store.persist() {
                warn!(key = %store.key, warning = %warning, "migration write-back failed");
            }
        }

        store
    }

    fn from_catalog(storage: S, key: String) -> Self {
        Self {
            storage,
            key,
            cities: catalog::seed_collection(),
            source: LoadSource::Catalog,
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn get(&self, city_id: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.id == city_id)
    }

    pub fn visited_cities(&self) -> Vec<&City> {
        self.cities.iter().filter(|city| city.visited).collect()
    }

    pub fn visited_countries(&self) -> Vec<String> {
        stats::visited_countries(&self.cities)
    }

    pub fn custom_cities(&self) -> Vec<&City> {
        self.cities.iter().filter(|city| city.is_custom).collect()
    }

    pub fn search(&self, filter: &CityFilter) -> Vec<&City> {
        let needle = filter.query.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|city| filter.matches(&needle, city))
            .collect()
    }

    pub fn stats(&self) -> TravelStats {
        stats::compute(&self.cities)
    }

    pub fn toggle_visited(&mut self, city_id: &str) -> Mutation {
        self.toggle_visited_at(city_id, Utc::now())
    }

    pub fn toggle_visited_at(&mut self, city_id: &str, now: DateTime<Utc>) -> Mutation {
        let Some(city) = self.cities.iter_mut().find(|city| city.id == city_id) else {
            debug!(city_id, "toggle ignored: unknown city");
            return Mutation::skipped();
        };

        let visited = !city.visited;
        city.set_visited(visited, now);
        debug!(city_id, visited, "toggled city");
        self.commit(city_id)
    }

    pub fn rename_city(&mut self, city_id: &str, new_name: &str) -> Mutation {
        let Ok(name) = normalize_name(new_name) else {
            debug!(city_id, "rename ignored: empty name");
            return Mutation::skipped();
        };
        let Some(city) = self.cities.iter_mut().find(|city| city.id == city_id) else {
            debug!(city_id, "rename ignored: unknown city");
            return Mutation::skipped();
        };

        city.name = name;
        debug!(city_id, "renamed city");
        self.commit(city_id)
    }

    pub fn add_custom_city(&mut self, new_city: NewCity) -> Mutation {
        self.add_custom_city_with(new_city, Utc::now(), &mut rand::rng())
    }

    pub fn add_custom_city_with<R: Rng + ?Sized>(
        &mut self,
        new_city: NewCity,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Mutation {
        if let Err(error) = new_city.validate() {
            debug!(error = %error, "add ignored: invalid city payload");
            return Mutation::skipped();
        }

        let id = {
            let taken: HashSet<&str> = self.cities.iter().map(|city| city.id.as_str()).collect();
            ids::generate_custom_id(now, &taken, rng)
        };
        let emoji = match new_city.emoji.as_deref().map(str::trim) {
            Some(emoji) if !emoji.is_empty() => emoji.to_string(),
            _ => ids::random_place_emoji(rng).to_string(),
        };

        self.cities.push(City {
            id: id.clone(),
            name: new_city.name.trim().to_string(),
            country: new_city.country.trim().to_string(),
            coordinates: new_city.coordinates,
            visited: false,
            visited_date: None,
            emoji,
            is_custom: true,
            importance: new_city.importance,
            population: new_city.population,
        });
        debug!(city_id = %id, "added custom city");
        self.commit(&id)
    }

    pub fn remove_custom_city(&mut self, city_id: &str) -> Mutation {
        let Some(index) = self
            .cities
            .iter()
            .position(|city| city.id == city_id && city.is_custom)
        else {
            debug!(city_id, "remove ignored: not a custom city");
            return Mutation::skipped();
        };

        self.cities.remove(index);
        debug!(city_id, "removed custom city");
        self.commit(city_id)
    }

    fn commit(&mut self, city_id: &str) -> Mutation {
        Mutation {
            applied: true,
            city_id: Some(city_id.to_string()),
            warning: self.persist(),
        }
    }

    fn persist(&mut self) -> Option<PersistWarning> {
        let result =
            schema::encode(&self.cities).and_then(|bytes| self.storage.write(&self.key, &bytes));
        match result {
            Ok(()) => None,
            Err(error) => {
                let warning = PersistWarning::from_error(&self.key, &error);
                warn!(key = %self.key, warning = %warning, "failed to persist cities");
                Some(warning)
            }
        }
    }
}
