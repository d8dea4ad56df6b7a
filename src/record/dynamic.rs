//! An insertion-ordered, type-erased key-value record.

use core::any::Any;
use core::fmt;
use std::borrow::Cow;

use crate::access::{CloneFn, FieldValue};

// -----------------------------------------------------------------------------
// DynamicRecord

/// A dynamic container of named, type-erased values.
///
/// `DynamicRecord` is the key-value shape of an object: the input of
/// [`record_to_object`](crate::Mapper::record_to_object) and the output of
/// [`object_to_record`](crate::Mapper::object_to_record). Entries keep
/// insertion order; inserting under an existing name overwrites the value in
/// place.
///
/// # Examples
///
/// ```
/// use fieldmap::DynamicRecord;
///
/// let mut record = DynamicRecord::new();
/// record.insert("name", "ada".to_string());
/// record.insert("age", 36_i32);
///
/// assert_eq!(record.len(), 2);
/// assert_eq!(record.get_as::<i32>("age"), Some(&36));
/// assert_eq!(record.index_of("name"), Some(0));
///
/// record.insert("age", 37_i32);
/// assert_eq!(record.len(), 2);
/// assert_eq!(record.get_as::<i32>("age"), Some(&37));
/// ```
#[derive(Default)]
pub struct DynamicRecord {
    names: Vec<Cow<'static, str>>,
    entries: Vec<Entry>,
    indices: hashbrown::HashMap<Cow<'static, str>, usize>,
}

struct Entry {
    value: FieldValue,
    clone_value: CloneFn,
}

impl DynamicRecord {
    /// Creates an empty record.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record with at least the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            indices: hashbrown::HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a value under `name`, overwriting any existing entry with
    /// that name.
    #[inline]
    pub fn insert<T: Any + Send + Sync + Clone>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) {
        self.insert_boxed(name, Box::new(value), |value| {
            value
                .downcast_ref::<T>()
                .map(|value| Box::new(value.clone()) as FieldValue)
        });
    }

    /// Inserts an already-boxed value under `name`.
    ///
    /// This is the low-level form of [`insert`](Self::insert): the caller
    /// supplies the duplicator used when the value has to be copied out of
    /// the record (for example by
    /// [`record_to_object`](crate::Mapper::record_to_object)).
    pub fn insert_boxed(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: FieldValue,
        clone_value: CloneFn,
    ) {
        let name: Cow<'static, str> = name.into();
        let entry = Entry { value, clone_value };
        if let Some(index) = self.indices.get(&name) {
            self.entries[*index] = entry;
        } else {
            self.entries.push(entry);
            self.indices.insert(name.clone(), self.entries.len() - 1);
            self.names.push(name);
        }
    }

    /// Returns the value stored under `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn Any> {
        self.indices
            .get(name)
            .map(|index| &*self.entries[*index].value as &dyn Any)
    }

    /// Returns the value stored under `name`, downcast to `T`.
    #[inline]
    pub fn get_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(<dyn Any>::downcast_ref)
    }

    /// Returns a fresh copy of the value stored under `name`.
    #[inline]
    pub fn clone_value(&self, name: &str) -> Option<FieldValue> {
        let entry = &self.entries[*self.indices.get(name)?];
        (entry.clone_value)(&*entry.value)
    }

    /// Returns the insertion index of `name`.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Returns the name at insertion index `index`.
    #[inline]
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(AsRef::as_ref)
    }

    /// Number of entries in the record.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entry names in insertion order.
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> RecordIter<'_> {
        RecordIter {
            record: self,
            index: 0,
        }
    }
}

impl fmt::Debug for DynamicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRecord")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl<N: Into<Cow<'static, str>>, T: Any + Send + Sync + Clone> FromIterator<(N, T)>
    for DynamicRecord
{
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut record = DynamicRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

// -----------------------------------------------------------------------------
// RecordIter

/// An iterator over the entries of a [`DynamicRecord`].
pub struct RecordIter<'a> {
    record: &'a DynamicRecord,
    index: usize,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = (&'a str, &'a dyn Any);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.record.name_at(self.index)?;
        let value = &*self.record.entries[self.index].value as &dyn Any;
        self.index += 1;
        Some((name, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIter<'_> {}

impl<'a> IntoIterator for &'a DynamicRecord {
    type Item = (&'a str, &'a dyn Any);
    type IntoIter = RecordIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_overwrites_by_name() {
        let mut record = DynamicRecord::new();
        record.insert("a", 1_i32);
        record.insert("b", 2_i32);
        record.insert("a", 10_i32);

        assert_eq!(record.len(), 2);
        assert_eq!(record.name_at(0), Some("a"));
        assert_eq!(record.name_at(1), Some("b"));
        assert_eq!(record.get_as::<i32>("a"), Some(&10));
    }

    #[test]
    fn get_is_typed_and_missing_names_are_none() {
        let mut record = DynamicRecord::new();
        record.insert("flag", true);

        assert_eq!(record.get_as::<bool>("flag"), Some(&true));
        assert_eq!(record.get_as::<i32>("flag"), None);
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn clone_value_duplicates_entries() {
        let mut record = DynamicRecord::new();
        record.insert("name", "ada".to_string());

        let copy = record.clone_value("name").unwrap();
        assert_eq!(
            copy.downcast_ref::<String>().map(String::as_str),
            Some("ada")
        );
        // Original is untouched.
        assert_eq!(record.get_as::<String>("name").unwrap(), "ada");
        assert!(record.clone_value("missing").is_none());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let record: DynamicRecord = [("x", 1_i32), ("y", 2_i32)].into_iter().collect();

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(record.iter().len(), 2);
    }
}
