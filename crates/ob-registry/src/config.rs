//! Registry configuration
//!
//! [`RegistryConfig`] is plain data: build it with the `with_*` methods or
//! load it from TOML.
//!
//! ```toml
//! key_policy = "reject-duplicates"
//! repair_on_import = false
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How `add` treats a key that is already bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Accept the duplicate; uniqueness is restored by repair
    #[default]
    Permissive,

    /// Skip the insertion
    RejectDuplicates,
}

/// Registry behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Duplicate-key handling for `add`
    pub key_policy: KeyPolicy,

    /// Run repair when building from foreign parts
    pub repair_on_import: bool,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With key policy
    #[inline]
    #[must_use]
    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    /// With repair-on-import switch
    #[inline]
    #[must_use]
    pub fn with_repair_on_import(mut self, repair: bool) -> Self {
        self.repair_on_import = repair;
        self
    }

    /// Parse configuration from TOML
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidConfig`](crate::RegistryError::InvalidConfig)
    /// on malformed input or unknown enum values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::Permissive,
            repair_on_import: true,
        }
    }
}
