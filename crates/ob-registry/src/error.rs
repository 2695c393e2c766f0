//! Error types for the registry
//!
//! Most registry operations follow the silent no-op convention: invalid
//! arguments leave the registry untouched and queries answer `None` or an
//! empty `Vec`. [`RegistryError`] covers the surfaces that do report:
//! - strict insertion ([`Registry::try_insert`](crate::Registry::try_insert))
//! - configuration loading
//! - snapshot (de)serialization

/// Main registry error type
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Key argument was empty
    #[error("key must not be empty")]
    EmptyKey,

    /// Key is already bound to an entry
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The offending key
        key: String,
    },

    /// Item is already present in the registry
    #[error("item already registered under key {key}")]
    DuplicateItem {
        /// Key the item is currently registered under
        key: String,
    },

    /// Item handle no longer refers to a live host entity
    #[error("item is no longer live")]
    DeadItem,

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    /// Snapshot could not be encoded or decoded
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl RegistryError {
    /// Check if error was caused by an argument the caller can fix
    #[inline]
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyKey | Self::DuplicateKey { .. } | Self::DuplicateItem { .. } | Self::DeadItem
        )
    }
}

/// Result alias with [`RegistryError`] as the default error
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_classified() {
        assert!(RegistryError::EmptyKey.is_argument_error());
        assert!(RegistryError::DuplicateKey { key: "a".into() }.is_argument_error());
        assert!(RegistryError::DeadItem.is_argument_error());

        let bad = toml::from_str::<toml::Value>("= nope").unwrap_err();
        assert!(!RegistryError::InvalidConfig(bad).is_argument_error());
    }

    #[test]
    fn display_includes_key() {
        let err = RegistryError::DuplicateKey { key: "enemy0".into() };
        assert_eq!(err.to_string(), "duplicate key: enemy0");
    }
}
