//! The mapping capability traits and the dynamic key-value record.
//!
//! A type becomes mappable by exposing a per-type accessor table:
//!
//! - [`Fields`] is the static side: `T::field_table()` resolves the table
//!   once and caches it.
//! - [`Mappable`] is the object-safe side the engine works with; it adds the
//!   [`Any`] casts needed to drive the erased accessors.
//!
//! Both are implemented by [`#[derive(Mappable)]`](crate::derive::Mappable)
//! for structs with named fields.

use core::any::Any;

use crate::access::FieldTable;

mod dynamic;

pub use dynamic::DynamicRecord;

// -----------------------------------------------------------------------------
// Fields

/// Static access to a type's accessor table.
///
/// The table is built on first use and cached for the lifetime of the
/// process, so repeated mapping calls never re-derive it.
///
/// # Examples
///
/// ```
/// use fieldmap::derive::Mappable;
/// use fieldmap::Fields;
///
/// #[derive(Mappable)]
/// struct User {
///     name: String,
///     age: i32,
/// }
///
/// let table = User::field_table();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.field_at(0).unwrap().name(), "name");
/// assert!(table.field("age").is_some());
/// ```
pub trait Fields: Mappable {
    /// Returns the accessor table for this type.
    fn field_table() -> &'static FieldTable;
}

// -----------------------------------------------------------------------------
// Mappable

/// The object-safe capability the mapping engine operates on.
///
/// Exposes the type's accessor table and the [`Any`] casts the erased
/// accessors need. Implemented via [`#[derive(Mappable)]`](crate::derive::Mappable);
/// manual implementations normally delegate to [`Fields`]:
///
/// ```rust, ignore
/// impl Mappable for Foo {
///     fn get_field_table(&self) -> &'static FieldTable {
///         <Self as Fields>::field_table()
///     }
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
/// ```
pub trait Mappable: Any + Send + Sync {
    /// Returns the accessor table of the underlying type.
    fn get_field_table(&self) -> &'static FieldTable;

    /// Casts to [`Any`] for use as an accessor receiver.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`as_any`](Mappable::as_any).
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Casts this value to a mappable trait object.
    #[inline(always)]
    fn as_mappable(&self) -> &dyn Mappable
    where
        Self: Sized,
    {
        self
    }

    /// Casts this value to a mutable mappable trait object.
    #[inline(always)]
    fn as_mappable_mut(&mut self) -> &mut dyn Mappable
    where
        Self: Sized,
    {
        self
    }
}

impl dyn Mappable {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

// -----------------------------------------------------------------------------
// Tests
