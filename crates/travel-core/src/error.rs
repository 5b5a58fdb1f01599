use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize city collection")]
    Serialize(#[source] serde_json::Error),
    #[error("storage backend rejected write for key {0}")]
    Rejected(String),
}

/// Non-fatal outcome of a mutation whose in-memory change succeeded but could
/// not be written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistWarning {
    pub key: String,
    pub message: String,
}

impl PersistWarning {
    pub fn from_error(key: &str, error: &StorageError) -> Self {
        let mut message = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            key: key.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for PersistWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "changes kept in memory but not saved ({}): {}",
            self.key, self.message
        )
    }
}

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to build mirror client")]
    BuildClient(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("mirror request failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("mirror api error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("failed to encode mirror rows")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_warning_includes_source_chain() {
        let error = StorageError::Write {
            path: PathBuf::from("/data/travelMapCities.json"),
            source: std::io::Error::other("disk is read-only"),
        };

        let warning = PersistWarning::from_error("travelMapCities", &error);

        assert_eq!(warning.key, "travelMapCities");
        assert!(warning.message.contains("/data/travelMapCities.json"));
        assert!(warning.message.contains("disk is read-only"));
        assert!(warning.to_string().contains("not saved"));
    }
}
