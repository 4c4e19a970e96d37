use std::fmt;

use thiserror::Error;

/// Failure of the device-local key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A storage failure seen by one of the recency caches, tagged with the slot it hit.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read '{key}'")]
    Read {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("failed to write '{key}'")]
    Write {
        key: &'static str,
        #[source]
        source: StorageError,
    },
}

impl CacheError {
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } => key,
        }
    }
}

/// A user-visible, non-fatal report of a failed cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&CacheError> for Notice {
    fn from(err: &CacheError) -> Self {
        let what = match err.key() {
            crate::recent::STORAGE_KEY => "recent searches",
            crate::favorites::STORAGE_KEY => "favorites",
            other => other,
        };
        let message = match err {
            CacheError::Read { .. } => format!("Could not load {what}"),
            CacheError::Write { .. } => format!("Could not save {what}"),
        };
        Self::new("Error", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_from_cache_error() {
        let err = CacheError::Write {
            key: crate::recent::STORAGE_KEY,
            source: StorageError::Unavailable("disk full".to_string()),
        };
        let notice = Notice::from(&err);
        assert_eq!(notice.message, "Could not save recent searches");
        assert_eq!(notice.to_string(), "Error: Could not save recent searches");

        let err = CacheError::Read {
            key: crate::favorites::STORAGE_KEY,
            source: StorageError::Unavailable("locked".to_string()),
        };
        assert_eq!(Notice::from(&err).message, "Could not load favorites");
    }

    #[test]
    fn test_cache_error_keeps_source() {
        use std::error::Error as _;

        let err = CacheError::Read {
            key: "favorites",
            source: StorageError::Unavailable("locked".to_string()),
        };
        assert_eq!(err.to_string(), "failed to read 'favorites'");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("storage unavailable: locked")
        );
    }
}
