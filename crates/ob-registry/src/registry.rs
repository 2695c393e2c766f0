//! Keyed object registry
//!
//! Provides [`Registry`]: an ordered sequence of item handles, an index-aligned
//! sequence of string keys, and a derived key → item map for exact lookup.
//!
//! # Consistency
//!
//! Every mutating method leaves the three containers in agreement before it
//! returns. The two ways to end up inconsistent are:
//! - duplicate keys accepted by [`Registry::add`] under [`KeyPolicy::Permissive`]
//!   (the map keeps the earliest entry for such a key)
//! - state imported through [`Registry::from_parts`] without repair
//!
//! [`Registry::check_and_repair`] restores the invariants in both cases.

use crate::config::{KeyPolicy, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::handle::{Handle, Needle};
use crate::partition::PartitionRule;
use indexmap::IndexMap;
use tracing::debug;

/// Ordered, keyed bundle of host handles
///
/// # Example
/// ```
/// use ob_registry::Registry;
///
/// let mut bundle = Registry::from_items(["crate", "barrel"]);
/// bundle.add("lamp", Some("light"));
///
/// assert_eq!(bundle.key_of(&"barrel"), Some("1"));
/// assert_eq!(bundle.get("light"), Some(&"lamp"));
/// assert!(!bundle.check_and_repair());
/// ```
#[derive(Debug, Clone)]
pub struct Registry<T> {
    /// Authoritative item sequence
    pub(crate) items: Vec<T>,

    /// Keys, index-aligned with `items`
    pub(crate) keys: Vec<String>,

    /// Derived key → item map
    pub(crate) index: IndexMap<String, T>,

    pub(crate) config: RegistryConfig,
}

impl<T: Handle> Registry<T> {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create empty registry with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
            index: IndexMap::new(),
            config,
        }
    }

    /// Create registry keyed by position: `"0"`, `"1"`, ...
    ///
    /// Duplicate and dead handles are skipped, like [`Registry::add`].
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut registry = Self::new();
        registry.extend(items);
        registry
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len().min(self.keys.len())
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in registry order
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Items in registry order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate over `(key, item)` entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys.iter().map(String::as_str).zip(&self.items)
    }

    /// Check if the item is registered (identity comparison)
    #[inline]
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Exact key lookup through the derived map
    #[inline]
    #[must_use]
    pub fn index_get(&self, key: &str) -> Option<&T> {
        self.index.get(key)
    }

    /// Append an item
    ///
    /// Without a key (or with an empty one) the key is the current entry
    /// count. Returns `false` and changes nothing when the item is already
    /// registered or no longer live, or when the key is taken and the policy
    /// is [`KeyPolicy::RejectDuplicates`].
    pub fn add(&mut self, item: T, key: Option<&str>) -> bool {
        if !item.is_live() || self.contains(&item) {
            debug!("add skipped: item dead or already registered");
            return false;
        }

        let key = match key {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => self.len().to_string(),
        };

        if self.config.key_policy == KeyPolicy::RejectDuplicates && self.index.contains_key(&key) {
            debug!(%key, "add skipped: key already bound");
            return false;
        }

        self.push(key, item);
        true
    }

    /// Append an item under an explicit, unused key
    ///
    /// # Errors
    /// - [`RegistryError::EmptyKey`] if `key` is empty
    /// - [`RegistryError::DeadItem`] if the handle is no longer live
    /// - [`RegistryError::DuplicateItem`] if the item is already registered
    /// - [`RegistryError::DuplicateKey`] if `key` is already bound
    pub fn try_insert(&mut self, key: &str, item: T) -> Result<()> {
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if !item.is_live() {
            return Err(RegistryError::DeadItem);
        }
        if let Some(existing) = self.key_of(&item) {
            return Err(RegistryError::DuplicateItem {
                key: existing.to_string(),
            });
        }
        if self.keys.iter().any(|k| k == key) {
            return Err(RegistryError::DuplicateKey {
                key: key.to_string(),
            });
        }

        self.push(key.to_string(), item);
        Ok(())
    }

    fn push(&mut self, key: String, item: T) {
        self.index.entry(key.clone()).or_insert_with(|| item.clone());
        self.keys.push(key);
        self.items.push(item);
    }

    /// Swap the item of the first entry whose key contains `key`
    ///
    /// Returns `false` when `key` is empty, `new_item` is dead, or no key
    /// matches.
    pub fn replace(&mut self, key: &str, new_item: T) -> bool {
        if key.is_empty() || !new_item.is_live() {
            return false;
        }

        let Some(pos) = self.iter().position(|(k, _)| k.contains(key)) else {
            return false;
        };

        let old = std::mem::replace(&mut self.items[pos], new_item.clone());
        if let Some(indexed) = self.index.get_mut(&self.keys[pos]) {
            if *indexed == old {
                *indexed = new_item;
            }
        }
        true
    }

    /// Replace or delete every entry whose key contains `keyword`
    ///
    /// Entries are visited from the last to the first. Each matching entry
    /// consumes the next slot of `new_items`: `Some` live handle replaces the
    /// item, `None` (or a dead handle) deletes the entry. Matching entries
    /// left once `new_items` runs out are untouched.
    ///
    /// Returns the number of slots consumed.
    pub fn replace_many(&mut self, keyword: &str, new_items: &[Option<T>]) -> usize {
        if keyword.is_empty() {
            return 0;
        }
        self.replace_where(new_items, |key| key.contains(keyword))
    }

    /// Like [`Registry::replace_many`] over every entry whose key does not
    /// contain `except`
    pub fn replace_all(&mut self, new_items: &[Option<T>], except: Option<&str>) -> usize {
        let except = except.filter(|e| !e.is_empty());
        self.replace_where(new_items, |key| except.map_or(true, |e| !key.contains(e)))
    }

    fn replace_where(
        &mut self,
        new_items: &[Option<T>],
        mut selected: impl FnMut(&str) -> bool,
    ) -> usize {
        let mut cursor = 0;

        for pos in (0..self.len()).rev() {
            if !selected(&self.keys[pos]) {
                continue;
            }
            let Some(slot) = new_items.get(cursor) else {
                break;
            };
            cursor += 1;

            match slot {
                Some(item) if item.is_live() => self.items[pos] = item.clone(),
                _ => {
                    self.keys.remove(pos);
                    self.items.remove(pos);
                }
            }
        }

        self.rebuild_index();
        cursor
    }

    /// Rename matching entries to `"{prefix}{n}"`
    ///
    /// `n` counts matches only, starting at zero. No-op for an empty prefix
    /// or needle.
    pub fn rekey<'a>(&mut self, prefix: &str, needle: impl Into<Needle<'a>>) {
        let needle = needle.into();
        if prefix.is_empty() || needle.is_empty() {
            debug!("rekey skipped: empty prefix or needle");
            return;
        }

        let mut next = 0usize;
        for (key, item) in self.keys.iter_mut().zip(&self.items) {
            if !needle.matches(key.as_str(), item) {
                continue;
            }
            *key = format!("{prefix}{next}");
            next += 1;
        }

        self.rebuild_index();
    }

    /// Regenerate every key by position
    ///
    /// Positions selected by `rule` become `"{prefix}{i}"`, the rest `"{i}"`.
    pub fn rekey_by_partition(&mut self, prefix: &str, rule: PartitionRule) {
        if prefix.is_empty() {
            debug!("rekey_by_partition skipped: empty prefix");
            return;
        }

        self.keys = (0..self.items.len())
            .map(|i| {
                if rule.selects(i) {
                    format!("{prefix}{i}")
                } else {
                    i.to_string()
                }
            })
            .collect();

        self.rebuild_index();
    }

    /// Regenerate every key from a reference list
    ///
    /// Position `i` becomes `"{ref_keys[i]}{i}"` while `i < ref_keys.len()`,
    /// and `"{i}"` past the end of the list.
    pub fn rekey_from_list<S: AsRef<str>>(&mut self, ref_keys: &[S]) {
        self.keys = (0..self.items.len())
            .map(|i| match ref_keys.get(i) {
                Some(base) => format!("{}{i}", base.as_ref()),
                None => i.to_string(),
            })
            .collect();

        self.rebuild_index();
    }

    /// Remove entries and hand each removed item to `destroy`
    ///
    /// Entries whose key contains `except` stay. Removal runs from the last
    /// entry to the first. Returns the number of removed entries.
    pub fn clear(&mut self, except: Option<&str>, destroy: impl FnMut(T)) -> usize {
        let drained = self.clear_and_drain(except);
        let count = drained.len();
        drained.into_iter().for_each(destroy);
        count
    }

    /// Remove entries and return their items in removal order
    ///
    /// Same selection and order as [`Registry::clear`]; nothing is destroyed.
    /// Items past the end of the key list have no key to match `except`, so
    /// they are always removed; keys past the end of the item list are dropped.
    pub fn clear_and_drain(&mut self, except: Option<&str>) -> Vec<T> {
        let except = except.filter(|e| !e.is_empty());
        self.keys.truncate(self.items.len());
        let mut drained: Vec<T> = self.items.drain(self.keys.len()..).rev().collect();

        for pos in (0..self.keys.len()).rev() {
            if except.is_some_and(|e| self.keys[pos].contains(e)) {
                continue;
            }
            self.keys.remove(pos);
            drained.push(self.items.remove(pos));
        }

        self.rebuild_index();
        drained
    }

    /// Rebuild the derived map from the sequences
    ///
    /// A duplicated key maps to its earliest entry.
    pub(crate) fn rebuild_index(&mut self) {
        self.index.clear();
        for (key, item) in self.keys.iter().zip(&self.items) {
            self.index
                .entry(key.clone())
                .or_insert_with(|| item.clone());
        }
    }
}

impl<T: Handle> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Handle> Extend<T> for Registry<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item, None);
        }
    }
}

impl<T: Handle> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}
