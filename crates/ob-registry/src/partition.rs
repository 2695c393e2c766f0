//! Index partitioning for positional rekeying

use serde::{Deserialize, Serialize};

/// Which positions receive the new prefix in
/// [`Registry::rekey_by_partition`](crate::Registry::rekey_by_partition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionRule {
    /// Odd indices (1, 3, 5, ...)
    Odd,

    /// Even indices (0, 2, 4, ...)
    Even,

    /// Multiples of the pivot; a zero pivot selects index 0 only
    MultipleOf(usize),

    /// Every index except the pivot
    ExceptIndex(usize),

    /// Every index that is not a multiple of the pivot
    ExceptMultipleOf(usize),

    /// Every index
    All,
}

impl PartitionRule {
    /// Check whether index `i` is selected
    #[must_use]
    pub fn selects(self, i: usize) -> bool {
        match self {
            Self::Odd => i % 2 == 1,
            Self::Even => i % 2 == 0,
            Self::MultipleOf(pivot) => is_multiple(i, pivot),
            Self::ExceptIndex(pivot) => i != pivot,
            Self::ExceptMultipleOf(pivot) => !is_multiple(i, pivot),
            Self::All => true,
        }
    }
}

fn is_multiple(i: usize, pivot: usize) -> bool {
    i.checked_rem(pivot).map_or(i == 0, |rem| rem == 0)
}

/// Build a reference key list for
/// [`Registry::rekey_from_list`](crate::Registry::rekey_from_list)
///
/// Splits `count` slots into `labels.len()` equal runs, one label per run, in
/// order. Slots left over by the integer division go to the last label.
///
/// ```
/// use ob_registry::divide_keys;
///
/// assert_eq!(divide_keys(5, &["left", "right"]), ["left", "left", "right", "right", "right"]);
/// ```
#[must_use]
pub fn divide_keys<S: AsRef<str>>(count: usize, labels: &[S]) -> Vec<String> {
    let Some(last) = labels.last() else {
        return Vec::new();
    };

    let run = count / labels.len();
    let mut list: Vec<String> = labels
        .iter()
        .flat_map(|label| std::iter::repeat(label.as_ref().to_string()).take(run))
        .collect();

    list.resize(count, last.as_ref().to_string());
    list
}
