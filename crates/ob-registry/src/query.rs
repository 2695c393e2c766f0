//! Read-only lookups over a [`Registry`]
//!
//! Key and name searches are substring matches. An empty needle or keyword
//! matches nothing, with one exception: [`Registry::items_with_key_containing`]
//! keeps plain substring semantics, so `""` selects every entry.
//!
//! Capability queries take caller-supplied predicates and extractors; the
//! registry has no notion of what an item exposes.

use crate::handle::{Handle, Needle};
use crate::registry::Registry;

impl<T: Handle> Registry<T> {
    /// First item matching the needle
    ///
    /// ```
    /// use ob_registry::{Needle, Registry};
    ///
    /// let bundle = Registry::from_items(["Player", "Enemy"]);
    /// assert_eq!(bundle.get("1"), Some(&"Enemy"));
    /// assert_eq!(bundle.get(Needle::Name("Play")), Some(&"Player"));
    /// assert_eq!(bundle.get(""), None);
    /// ```
    #[must_use]
    pub fn get<'a>(&self, needle: impl Into<Needle<'a>>) -> Option<&T> {
        let needle = needle.into();
        self.iter()
            .find(|(key, item)| needle.matches(key, *item))
            .map(|(_, item)| item)
    }

    /// Items matching the needle, at most `limit` of them
    #[must_use]
    pub fn get_many<'a>(&self, needle: impl Into<Needle<'a>>, limit: usize) -> Vec<&T> {
        let needle = needle.into();
        self.iter()
            .filter(|(key, item)| needle.matches(key, *item))
            .map(|(_, item)| item)
            .take(limit)
            .collect()
    }

    /// First item satisfying the capability predicate
    #[must_use]
    pub fn get_by_capability(&self, has_capability: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|&item| has_capability(item))
    }

    /// All items satisfying the capability predicate, in order
    #[must_use]
    pub fn get_all_by_capability(&self, has_capability: impl Fn(&T) -> bool) -> Vec<&T> {
        self.items.iter().filter(|&item| has_capability(item)).collect()
    }

    /// First value extracted from an entry matching the needle
    ///
    /// Matching entries whose extraction yields `None` are skipped.
    #[must_use]
    pub fn capability_value<'a, U>(
        &self,
        needle: impl Into<Needle<'a>>,
        extract: impl Fn(&T) -> Option<U>,
    ) -> Option<U> {
        let needle = needle.into();
        self.iter()
            .filter(|(key, item)| needle.matches(key, *item))
            .find_map(|(_, item)| extract(item))
    }

    /// Every value extracted from entries matching the needle
    #[must_use]
    pub fn capability_values<'a, U>(
        &self,
        needle: impl Into<Needle<'a>>,
        extract: impl Fn(&T) -> Option<U>,
    ) -> Vec<U> {
        let needle = needle.into();
        self.iter()
            .filter(|(key, item)| needle.matches(key, *item))
            .filter_map(|(_, item)| extract(item))
            .collect()
    }

    /// Every value extracted from any entry
    #[must_use]
    pub fn all_capability_values<U>(&self, extract: impl Fn(&T) -> Option<U>) -> Vec<U> {
        self.items.iter().filter_map(extract).collect()
    }

    /// Key of the entry holding `item`
    #[must_use]
    pub fn key_of(&self, item: &T) -> Option<&str> {
        self.iter()
            .find(|(_, candidate)| *candidate == item)
            .map(|(key, _)| key)
    }

    /// Key of the first entry whose item name equals `name`
    #[must_use]
    pub fn key_of_name(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(_, item)| item.name() == name)
            .map(|(key, _)| key)
    }

    /// Keys of entries whose item name contains `keyword`
    #[must_use]
    pub fn keys_of_name_containing(&self, keyword: &str) -> Vec<&str> {
        let needle = Needle::Name(keyword);
        self.iter()
            .filter(|(key, item)| needle.matches(key, *item))
            .map(|(key, _)| key)
            .collect()
    }

    /// Items whose key contains `keyword`; `""` selects all
    #[must_use]
    pub fn items_with_key_containing(&self, keyword: &str) -> Vec<&T> {
        self.iter()
            .filter(|(key, _)| key.contains(keyword))
            .map(|(_, item)| item)
            .collect()
    }
}
