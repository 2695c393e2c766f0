//! Raw registry state for import and export
//!
//! [`RegistryParts`] exposes the three containers directly. It is how state
//! crosses a process or persistence boundary, and it can hold anything: the
//! sequences may differ in length, keys may be empty or repeated, and the map
//! may disagree with the sequences. [`Registry::from_parts`] repairs such
//! state on the way in unless the configuration says otherwise.

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::handle::Handle;
use crate::registry::Registry;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The registry's containers, unvalidated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryParts<T> {
    /// Item sequence
    pub items: Vec<T>,

    /// Key sequence, meant to be index-aligned with `items`
    pub keys: Vec<String>,

    /// Key → item map, meant to be derived from the sequences
    pub pairs: IndexMap<String, T>,
}

impl<T> Default for RegistryParts<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
            pairs: IndexMap::new(),
        }
    }
}

impl<T: Serialize> RegistryParts<T> {
    /// Encode as JSON
    ///
    /// # Errors
    /// Returns [`RegistryError::Snapshot`](crate::RegistryError::Snapshot) if
    /// an item fails to serialize.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> RegistryParts<T> {
    /// Decode from JSON
    ///
    /// # Errors
    /// Returns [`RegistryError::Snapshot`](crate::RegistryError::Snapshot) on
    /// malformed input.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

impl<T: Handle> Registry<T> {
    /// Build a registry from raw parts
    ///
    /// Runs [`Registry::repair`] when `config.repair_on_import` is set.
    #[must_use]
    pub fn from_parts(parts: RegistryParts<T>, config: RegistryConfig) -> Self {
        let mut registry = Self::from_parts_unchecked(parts);
        registry.config = config;

        if config.repair_on_import {
            let report = registry.repair();
            if !report.is_clean() {
                warn!(removed = report.removed(), "imported bundle needed repair");
            }
        }
        registry
    }

    /// Build a registry from raw parts as-is, with default configuration
    #[must_use]
    pub fn from_parts_unchecked(parts: RegistryParts<T>) -> Self {
        let RegistryParts { items, keys, pairs } = parts;
        Self {
            items,
            keys,
            index: pairs,
            config: RegistryConfig::default(),
        }
    }

    /// Take the registry apart
    #[must_use]
    pub fn into_parts(self) -> RegistryParts<T> {
        RegistryParts {
            items: self.items,
            keys: self.keys,
            pairs: self.index,
        }
    }

    /// Copy of the registry's containers
    #[must_use]
    pub fn to_parts(&self) -> RegistryParts<T> {
        self.clone().into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parts_round_trip_through_registry() {
        let registry = Registry::from_items(["a".to_string(), "b".to_string()]);
        let parts = registry.to_parts();

        assert_eq!(parts.keys, vec!["0", "1"]);
        assert_eq!(parts.pairs.get("1"), Some(&"b".to_string()));

        let rebuilt = Registry::from_parts(parts, RegistryConfig::default());
        assert_eq!(rebuilt.items(), registry.items());
        assert!(rebuilt.is_consistent());
    }

    #[test]
    fn json_snapshot_preserves_pair_order() {
        let registry = Registry::from_items(["a".to_string(), "b".to_string()]);
        let json = registry.to_parts().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"items":["a","b"],"keys":["0","1"],"pairs":{"0":"a","1":"b"}}"#
        );
    }

    #[test]
    fn import_repairs_by_default() {
        let json = r#"{"items":["a","b","a"],"keys":["k","k","z"],"pairs":{"k":"a"}}"#;
        let parts: RegistryParts<String> = RegistryParts::from_json(json).unwrap();

        let registry = Registry::from_parts(parts, RegistryConfig::default());
        assert_eq!(registry.keys(), &["k", "z"]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn import_without_repair_keeps_state() {
        let json = r#"{"items":["a","b"],"keys":["k","k"],"pairs":{"k":"a"}}"#;
        let parts: RegistryParts<String> = RegistryParts::from_json(json).unwrap();
        let config = RegistryConfig::new().with_repair_on_import(false);

        let registry = Registry::from_parts(parts, config);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_consistent());
        assert!(!registry.config().repair_on_import);
    }

    #[test]
    fn malformed_json_is_snapshot_error() {
        let err = RegistryParts::<String>::from_json("{").unwrap_err();
        assert!(matches!(err, crate::RegistryError::Snapshot(_)));
    }
}
