//! Explicit field renames.

use hashbrown::HashMap;

// -----------------------------------------------------------------------------
// NamePair

/// One explicit remap entry: copy the source field `old` into the target
/// field `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePair {
    old: String,
    new: String,
}

impl NamePair {
    /// Creates a remap entry from `old` to `new`.
    #[inline]
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// The source-side field name.
    #[inline]
    pub fn old_name(&self) -> &str {
        &self.old
    }

    /// The target-side field name.
    #[inline]
    pub fn new_name(&self) -> &str {
        &self.new
    }
}

// -----------------------------------------------------------------------------
// NamePairs

/// A fluent accumulator of [`NamePair`] entries.
///
/// The collected pairs convert into a rename map consumed by
/// [`MapOptions::renames`](crate::MapOptions::renames); when the same old
/// name appears more than once, the last entry wins.
///
/// # Examples
///
/// ```
/// use fieldmap::NamePairs;
///
/// let pairs = NamePairs::new()
///     .add("score", "value")
///     .add("created", "created_at");
///
/// assert_eq!(pairs.len(), 2);
///
/// let map = pairs.into_rename_map();
/// assert_eq!(map.get("score").map(String::as_str), Some("value"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamePairs {
    pairs: Vec<NamePair>,
}

impl NamePairs {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a remap entry and returns the accumulator.
    #[inline]
    pub fn add(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.pairs.push(NamePair::new(old, new));
        self
    }

    /// Number of collected entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no entries were collected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the collected entries in insertion order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, NamePair> {
        self.pairs.iter()
    }

    /// Converts the entries into an old-name to new-name map.
    ///
    /// Duplicate old names resolve to the last entry added.
    pub fn into_rename_map(self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(self.pairs.len());
        for pair in self.pairs {
            map.insert(pair.old, pair.new);
        }
        map
    }
}

impl IntoIterator for NamePairs {
    type Item = NamePair;
    type IntoIter = std::vec::IntoIter<NamePair>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
