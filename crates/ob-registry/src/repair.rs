//! Consistency check and repair
//!
//! The repair routine restores the registry invariants:
//! 1. `items`, `keys` and the map have the same length
//! 2. `index[keys[i]] == items[i]` for every position
//! 3. keys are unique
//! 4. no empty key and no dead handle remains
//!
//! It runs five steps in a fixed order; every step that changes anything
//! rebuilds the map before the next one looks at it. The sequences are
//! authoritative, the map is derived.

use crate::handle::Handle;
use crate::registry::Registry;
use std::collections::HashSet;
use tracing::{info, warn};

/// What a repair pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Sequence tail elements dropped to equalize lengths
    pub truncated: usize,

    /// Entries dropped for an empty key or a dead handle
    pub absent_removed: usize,

    /// Entries dropped because the map disagreed with them
    pub diverged_removed: usize,

    /// Later entries dropped for reusing a key
    pub duplicates_removed: usize,

    /// Map was rebuilt because its size disagreed with the sequences
    pub index_rebuilt: bool,
}

impl RepairReport {
    /// Nothing needed fixing
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Total entries removed or truncated
    #[inline]
    #[must_use]
    pub fn removed(&self) -> usize {
        self.truncated + self.absent_removed + self.diverged_removed + self.duplicates_removed
    }
}

impl<T: Handle> Registry<T> {
    /// Repair the registry; `true` if anything was inconsistent
    ///
    /// A second call right after always returns `false`.
    pub fn check_and_repair(&mut self) -> bool {
        !self.repair().is_clean()
    }

    /// Repair the registry and report per-step changes
    pub fn repair(&mut self) -> RepairReport {
        let mut report = RepairReport::default();

        // 1. lengths
        let (n_items, n_keys) = (self.items.len(), self.keys.len());
        let len = n_items.min(n_keys);
        if n_items != n_keys {
            report.truncated = (n_items - len) + (n_keys - len);
            self.items.truncate(len);
            self.keys.truncate(len);
            warn!(truncated = report.truncated, "repair: sequence lengths differed");
        }
        if report.truncated > 0 || self.index.len() != len {
            report.index_rebuilt = self.index.len() != len;
            self.rebuild_index();
        }

        // 2. absent entries, removed in lock step
        report.absent_removed = self.remove_positions(|_, key, item| key.is_empty() || !item.is_live());
        if report.absent_removed > 0 {
            warn!(removed = report.absent_removed, "repair: dropped empty keys or dead items");
        }

        // 3. map divergence; later duplicates are left to step 4
        let diverged: Vec<bool> = {
            let mut seen = HashSet::new();
            self.iter()
                .map(|(key, item)| seen.insert(key) && self.index.get(key) != Some(item))
                .collect()
        };
        report.diverged_removed = self.remove_positions(|pos, _, _| diverged[pos]);
        if report.diverged_removed > 0 {
            warn!(removed = report.diverged_removed, "repair: dropped entries the map disagreed with");
        }

        // 4. duplicate keys, earliest wins
        let mut seen = HashSet::new();
        let duplicate: Vec<bool> = self.keys.iter().map(|key| !seen.insert(key.clone())).collect();
        report.duplicates_removed = self.remove_positions(|pos, _, _| duplicate[pos]);
        if report.duplicates_removed > 0 {
            warn!(removed = report.duplicates_removed, "repair: dropped duplicate keys");
        }

        // 5. final map
        self.rebuild_index();
        report
    }

    /// Remove every position the predicate selects, last to first
    ///
    /// Rebuilds the map when anything was removed.
    fn remove_positions(&mut self, mut selected: impl FnMut(usize, &str, &T) -> bool) -> usize {
        let mut removed = 0;
        for pos in (0..self.len()).rev() {
            if selected(pos, &self.keys[pos], &self.items[pos]) {
                self.keys.remove(pos);
                self.items.remove(pos);
                removed += 1;
            }
        }
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Check every invariant without changing anything
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let len = self.items.len();
        if self.keys.len() != len || self.index.len() != len {
            return false;
        }

        let mut seen = HashSet::with_capacity(len);
        self.iter().all(|(key, item)| {
            !key.is_empty()
                && item.is_live()
                && seen.insert(key)
                && self.index.get(key) == Some(item)
        })
    }

    /// Emit one `info` event per entry with its map status
    ///
    /// `pair` is `OK` when the map agrees with the entry and `ERROR` otherwise.
    pub fn log_entries(&self) {
        for (key, item) in self.iter() {
            let pair = if self.index.get(key) == Some(item) { "OK" } else { "ERROR" };
            info!(key, name = %item.name(), pair, "bundle entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Registry, RegistryParts};
    use pretty_assertions::assert_eq;

    #[test]
    fn consistent_registry_is_clean() {
        let mut registry = Registry::from_items(["a", "b"]);
        assert!(registry.is_consistent());
        assert!(!registry.check_and_repair());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_key_keeps_earliest() {
        let mut registry = Registry::new();
        registry.add("x", Some("k"));
        registry.add("y", Some("k"));
        assert!(!registry.is_consistent());

        let report = registry.repair();

        assert!(report.index_rebuilt);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(registry.items(), &["x"]);
        assert_eq!(registry.keys(), &["k"]);
        assert!(registry.is_consistent());
        assert!(!registry.check_and_repair());
    }

    #[test]
    fn truncates_longer_sequence() {
        let parts = RegistryParts {
            items: vec!["a", "b", "c"],
            keys: vec!["0".into(), "1".into()],
            pairs: [("0".to_string(), "a"), ("1".to_string(), "b")].into_iter().collect(),
        };
        let mut registry = Registry::from_parts_unchecked(parts);

        let report = registry.repair();
        assert_eq!(report.truncated, 1);
        assert!(!report.index_rebuilt);
        assert_eq!(registry.items(), &["a", "b"]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn empty_keys_removed_in_lock_step() {
        let parts = RegistryParts {
            items: vec!["a", "b", "c"],
            keys: vec!["0".into(), String::new(), "2".into()],
            pairs: [("0".to_string(), "a"), (String::new(), "b"), ("2".to_string(), "c")]
                .into_iter()
                .collect(),
        };
        let mut registry = Registry::from_parts_unchecked(parts);

        let report = registry.repair();
        assert_eq!(report.absent_removed, 1);
        assert_eq!(registry.items(), &["a", "c"]);
        assert_eq!(registry.keys(), &["0", "2"]);
    }

    #[test]
    fn diverged_map_entry_removed() {
        let parts = RegistryParts {
            items: vec!["a", "b"],
            keys: vec!["0".into(), "1".into()],
            pairs: [("0".to_string(), "a"), ("1".to_string(), "stale")].into_iter().collect(),
        };
        let mut registry = Registry::from_parts_unchecked(parts);

        let report = registry.repair();
        assert_eq!(report.diverged_removed, 1);
        assert_eq!(registry.items(), &["a"]);
        assert_eq!(registry.index_get("1"), None);
        assert!(registry.is_consistent());
    }

    #[test]
    fn repair_is_idempotent() {
        let mut registry = Registry::new();
        registry.add("x", Some("k"));
        registry.add("y", Some("k"));
        registry.add("z", Some("j"));

        assert!(registry.check_and_repair());
        assert!(!registry.check_and_repair());
        assert_eq!(registry.items(), &["x", "z"]);
    }

    #[test]
    fn report_totals() {
        let report = crate::RepairReport {
            truncated: 1,
            absent_removed: 2,
            diverged_removed: 0,
            duplicates_removed: 3,
            index_rebuilt: true,
        };
        assert_eq!(report.removed(), 6);
        assert!(!report.is_clean());
        assert!(crate::RepairReport::default().is_clean());
    }
}
