//! Travel map domain modules.
//!
//! - `model`: city records, coordinates, and new-city payload validation.
//! - `catalog`: built-in world city list used to seed a fresh collection.
//! - `continents`: fixed country to continent lookup.
//! - `stats`: derived travel statistics and per-country/continent breakdowns.
//! - `storage`: key-value persistence backends (file and in-memory).
//! - `schema`: versioned persisted payload and legacy migration.
//! - `ids`: collision-free custom city ids.
//! - `mirror`: remote mirror contract and row mapping.
//! - `store`: the owned city store tying it all together.

pub mod catalog;
pub mod continents;
pub mod error;
pub mod ids;
pub mod mirror;
pub mod model;
pub mod schema;
pub mod stats;
pub mod storage;
pub mod store;

pub use continents::{Continent, continent_for};
pub use error::{MirrorError, PersistWarning, StorageError};
pub use mirror::{MirrorRow, RemoteMirror, SyncOutcome, sync_collection};
pub use model::{City, Coordinates, Importance, NewCity};
pub use stats::TravelStats;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{CityFilter, CityStore, LoadSource, Mutation};

/// Storage key holding the whole collection.
pub const DEFAULT_STORAGE_KEY: &str = "travelMapCities";
