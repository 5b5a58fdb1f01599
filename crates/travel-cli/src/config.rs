use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use travel_core::DEFAULT_STORAGE_KEY;
use travel_core::storage::validate_key;

const DATA_DIR_ENV: &str = "TRAVEL_DATA_DIR";
const STORAGE_KEY_ENV: &str = "TRAVEL_STORAGE_KEY";
const MIRROR_URL_ENV: &str = "TRAVEL_MIRROR_URL";
const MIRROR_API_KEY_ENV: &str = "TRAVEL_MIRROR_API_KEY";
const USER_ID_ENV: &str = "TRAVEL_USER_ID";
const MIRROR_TIMEOUT_ENV: &str = "TRAVEL_MIRROR_TIMEOUT_SECS";

const TIMEOUT_MIN: i64 = 1;
const TIMEOUT_MAX: i64 = 60;

pub const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub mirror: Option<MirrorConfig>,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        Ok(Self {
            data_dir: parse_data_dir(&env_map),
            storage_key: parse_storage_key(&env_map)?,
            mirror: parse_mirror(&env_map)?,
        })
    }

    pub fn storage_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }
}

fn non_empty<'a>(env_map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env_map
        .get(key)
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_data_dir(env_map: &HashMap<String, String>) -> PathBuf {
    non_empty(env_map, DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("travel-map"))
}

fn parse_storage_key(env_map: &HashMap<String, String>) -> Result<String, ConfigError> {
    let Some(value) = non_empty(env_map, STORAGE_KEY_ENV) else {
        return Ok(DEFAULT_STORAGE_KEY.to_string());
    };
    validate_key(value).map_err(|_| ConfigError::InvalidStorageKey(value.to_string()))?;
    Ok(value.to_string())
}

fn parse_mirror(env_map: &HashMap<String, String>) -> Result<Option<MirrorConfig>, ConfigError> {
    let timeout_secs = parse_timeout(non_empty(env_map, MIRROR_TIMEOUT_ENV))?;

    let (Some(base_url), Some(api_key), Some(user_id)) = (
        non_empty(env_map, MIRROR_URL_ENV),
        non_empty(env_map, MIRROR_API_KEY_ENV),
        non_empty(env_map, USER_ID_ENV),
    ) else {
        return Ok(None);
    };

    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::InvalidMirrorUrl(base_url.to_string()));
    }

    Ok(Some(MirrorConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key: api_key.to_string(),
        user_id: user_id.to_string(),
        timeout_secs,
    }))
}

fn parse_timeout(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_MIRROR_TIMEOUT_SECS);
    };

    let parsed = value
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidTimeout(value.to_string()))?;

    Ok(parsed.clamp(TIMEOUT_MIN, TIMEOUT_MAX) as u64)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid TRAVEL_STORAGE_KEY: {0} (expected [A-Za-z0-9_-]+)")]
    InvalidStorageKey(String),
    #[error("invalid TRAVEL_MIRROR_URL: {0} (expected http(s) URL)")]
    InvalidMirrorUrl(String),
    #[error("invalid TRAVEL_MIRROR_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            (MIRROR_URL_ENV, "https://example.supabase.co/"),
            (MIRROR_API_KEY_ENV, "anon-key"),
            (USER_ID_ENV, "user-1"),
        ]
    }

    #[test]
    fn config_defaults_apply_when_values_missing() {
        let config = RuntimeConfig::from_pairs(Vec::<(String, String)>::new())
            .expect("defaults should parse");

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.mirror, None);
        assert!(
            config.data_dir.ends_with("travel-map"),
            "default data dir should fall back to temp location"
        );
    }

    #[test]
    fn config_uses_explicit_data_dir_and_key() {
        let config = RuntimeConfig::from_pairs(vec![
            (DATA_DIR_ENV, "/tmp/custom-travel"),
            (STORAGE_KEY_ENV, "trip_2026"),
        ])
        .expect("explicit values should parse");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/custom-travel"));
        assert_eq!(
            config.storage_file(),
            PathBuf::from("/tmp/custom-travel/trip_2026.json")
        );
    }

    #[test]
    fn config_rejects_path_like_storage_key() {
        let err = RuntimeConfig::from_pairs(vec![(STORAGE_KEY_ENV, "../etc/passwd")])
            .expect_err("path-like key should fail");

        assert_eq!(
            err,
            ConfigError::InvalidStorageKey("../etc/passwd".to_string())
        );
    }

    #[test]
    fn config_mirror_requires_url_key_and_user() {
        let partial = RuntimeConfig::from_pairs(vec![(MIRROR_URL_ENV, "https://example.test")])
            .expect("partial mirror config should parse");
        assert_eq!(partial.mirror, None);

        let full = RuntimeConfig::from_pairs(mirror_pairs()).expect("mirror config should parse");
        let mirror = full.mirror.expect("mirror configured");
        assert_eq!(mirror.base_url, "https://example.supabase.co");
        assert_eq!(mirror.user_id, "user-1");
        assert_eq!(mirror.timeout_secs, DEFAULT_MIRROR_TIMEOUT_SECS);
    }

    #[test]
    fn config_mirror_rejects_non_http_url() {
        let mut pairs = mirror_pairs();
        pairs[0] = (MIRROR_URL_ENV, "ftp://example.test");

        let err = RuntimeConfig::from_pairs(pairs).expect_err("ftp url should fail");
        assert_eq!(
            err,
            ConfigError::InvalidMirrorUrl("ftp://example.test".to_string())
        );
    }

    #[test]
    fn config_clamps_timeout_and_rejects_garbage() {
        let mut pairs = mirror_pairs();
        pairs.push((MIRROR_TIMEOUT_ENV, "999"));
        let config = RuntimeConfig::from_pairs(pairs).expect("timeout should clamp");
        assert_eq!(
            config.mirror.map(|mirror| mirror.timeout_secs),
            Some(TIMEOUT_MAX as u64)
        );

        let err = RuntimeConfig::from_pairs(vec![(MIRROR_TIMEOUT_ENV, "soon")])
            .expect_err("non-numeric timeout should fail");
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = RuntimeConfig::from_pairs(mirror_pairs()).expect("mirror config");

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("anon-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
