//! Object Bundle Registry
//!
//! Keyed bundles of host-owned object handles.
//!
//! # Overview
//!
//! A [`Registry`] keeps three containers in step:
//! - **items**: ordered, non-owning [`Handle`]s into a host environment
//! - **keys**: one string key per item, index-aligned
//! - **index**: key → item map derived from the two sequences
//!
//! On top of that it offers substring lookups by key or host name
//! ([`Needle`]), capability queries through caller-supplied predicates,
//! bulk rekeying ([`PartitionRule`], [`divide_keys`]), draining and
//! cascading clears, and a repair routine that restores the invariants after
//! foreign state is imported ([`RegistryParts`]).
//!
//! # Example
//!
//! ```rust
//! use ob_registry::{Needle, PartitionRule, Registry};
//!
//! let mut bundle = Registry::from_items(["Tree", "Rock", "Tree2", "Bush"]);
//! bundle.rekey_by_partition("even", PartitionRule::Even);
//!
//! assert_eq!(bundle.keys(), &["even0", "1", "even2", "3"]);
//! assert_eq!(bundle.get_many("even", usize::MAX), vec![&"Tree", &"Tree2"]);
//! assert_eq!(bundle.key_of_name("Bush"), Some("3"));
//!
//! let mut destroyed = Vec::new();
//! bundle.clear(Some("even"), |item| destroyed.push(item));
//! assert_eq!(destroyed, vec!["Bush", "Rock"]);
//! assert!(bundle.get(Needle::Name("Rock")).is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod handle;
mod partition;
mod query;
mod registry;
mod repair;
mod snapshot;

// Re-exports
pub use config::{KeyPolicy, RegistryConfig};
pub use error::{RegistryError, Result};
pub use handle::{Handle, Needle};
pub use partition::{divide_keys, PartitionRule};
pub use registry::Registry;
pub use repair::RepairReport;
pub use snapshot::RegistryParts;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for bundle operations
    pub use crate::{Handle, Needle, PartitionRule, Registry, RegistryConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
