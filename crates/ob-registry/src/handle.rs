//! Host boundary: item handles and search needles
//!
//! The registry never owns the entities it tracks. Items are [`Handle`]s into
//! a host environment, compared by identity through `PartialEq`, named by the
//! host, and possibly invalidated by the host behind the registry's back.

use std::borrow::Cow;

/// Non-owning handle to a host entity
///
/// `PartialEq` must be an identity comparison: two handles are equal only when
/// they refer to the same host entity.
///
/// # Example
/// ```
/// use ob_registry::Handle;
/// use std::borrow::Cow;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct EntityId(u32, &'static str);
///
/// impl Handle for EntityId {
///     fn name(&self) -> Cow<'_, str> {
///         Cow::Borrowed(self.1)
///     }
/// }
/// ```
pub trait Handle: Clone + PartialEq {
    /// Display/search name the host resolves for this entity
    fn name(&self) -> Cow<'_, str>;

    /// Whether the host still holds the entity
    ///
    /// A handle that is no longer live counts as an absent entry and is
    /// dropped by [`Registry::check_and_repair`](crate::Registry::check_and_repair).
    #[inline]
    fn is_live(&self) -> bool {
        true
    }
}

impl Handle for String {
    #[inline]
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Handle for &'static str {
    #[inline]
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(*self)
    }
}

/// What a lookup matches against
///
/// `&str` converts into [`Needle::Key`], so `registry.get("enemy")` searches
/// keys and `registry.get(Needle::Name("Enemy"))` searches host names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needle<'a> {
    /// Substring of the entry key
    Key(&'a str),

    /// Substring of the host-resolved item name
    Name(&'a str),
}

impl<'a> Needle<'a> {
    /// The raw search text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Key(s) | Self::Name(s) => s,
        }
    }

    /// Empty needles match nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Check an entry against this needle
    #[must_use]
    pub fn matches<T: Handle>(&self, key: &str, item: &T) -> bool {
        match *self {
            _ if self.is_empty() => false,
            Self::Key(needle) => key.contains(needle),
            Self::Name(needle) => item.name().contains(needle),
        }
    }
}

impl<'a> From<&'a str> for Needle<'a> {
    #[inline]
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a String> for Needle<'a> {
    #[inline]
    fn from(key: &'a String) -> Self {
        Self::Key(key.as_str())
    }
}
