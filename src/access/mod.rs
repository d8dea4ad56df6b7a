//! Field accessors and per-type accessor tables.
//!
//! A [`FieldAccessor`] binds one logical field of a type to a pair of
//! type-erased read/write functions plus the field's [`TypeId`]. A
//! [`FieldTable`] is the ordered collection of a type's accessors, built
//! once per type and cached in a static cell (see [`NonGenericTableCell`]
//! and [`GenericTableCell`]).
//!
//! Accessor tables are normally generated by
//! [`#[derive(Mappable)]`](crate::derive::Mappable); the types here are the
//! building blocks that generated code (and the occasional manual
//! implementation) assembles.

use core::any::{Any, TypeId};
use core::{error, fmt};

mod cell;

pub use cell::{GenericTableCell, NonGenericTableCell};

// -----------------------------------------------------------------------------
// Erased function signatures

/// A boxed, type-erased field value.
pub type FieldValue = Box<dyn Any + Send + Sync>;

/// Reads a field out of a receiver, cloning its value.
///
/// Returns `None` if the receiver is not the type the accessor was built for.
pub type GetFn = fn(&dyn Any) -> Option<FieldValue>;

/// Writes a boxed value into a field of a receiver.
pub type SetFn = fn(&mut dyn Any, FieldValue) -> Result<(), AccessError>;

/// Duplicates an already-extracted field value.
///
/// Returns `None` if the value is not of the field's type.
pub type CloneFn = fn(&dyn Any) -> Option<FieldValue>;

// -----------------------------------------------------------------------------
// AccessError

/// An error produced when invoking a field accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The accessor was invoked on a receiver of the wrong type.
    Receiver {
        /// Type path of the receiver the accessor was built for.
        expected: &'static str,
    },
    /// The writer was handed a value it cannot downcast to the field's type.
    Value {
        /// Name of the field being written.
        field: &'static str,
        /// Type path the field expects.
        expected: &'static str,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver { expected } => {
                write!(f, "accessor for `{expected}` invoked on a different type")
            }
            Self::Value { field, expected } => {
                write!(f, "field `{field}` expects a value of type `{expected}`")
            }
        }
    }
}

impl error::Error for AccessError {}

// -----------------------------------------------------------------------------
// FieldAccessor

/// A reader/writer pair bound to a single logical field of a type.
///
/// The accessor knows the field's name, its [`TypeId`] and type path, and
/// carries three erased functions: a getter that clones the field out of a
/// receiver, a setter that moves a boxed value into it, and a duplicator for
/// values that have already been extracted.
///
/// # Examples
///
/// Accessors are usually generated, but can be written by hand:
///
/// ```
/// use core::any::Any;
/// use fieldmap::access::{AccessError, FieldAccessor, FieldValue};
///
/// struct Point {
///     x: i32,
/// }
///
/// let accessor = FieldAccessor::new::<i32>(
///     "x",
///     |receiver| {
///         receiver
///             .downcast_ref::<Point>()
///             .map(|p| Box::new(p.x) as FieldValue)
///     },
///     |receiver, value| {
///         let point = receiver
///             .downcast_mut::<Point>()
///             .ok_or(AccessError::Receiver { expected: "Point" })?;
///         let value = value.downcast::<i32>().map_err(|_| AccessError::Value {
///             field: "x",
///             expected: "i32",
///         })?;
///         point.x = *value;
///         Ok(())
///     },
/// );
///
/// let mut point = Point { x: 3 };
/// let value = accessor.get(&point).unwrap();
/// assert_eq!(value.downcast_ref::<i32>(), Some(&3));
///
/// accessor.set(&mut point, Box::new(7_i32)).unwrap();
/// assert_eq!(point.x, 7);
/// ```
pub struct FieldAccessor {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    get: GetFn,
    set: SetFn,
    clone_value: CloneFn,
}

impl FieldAccessor {
    /// Creates an accessor for a field of type `F` with the given name and
    /// read/write functions.
    ///
    /// The duplicator is synthesized from `F: Clone`.
    pub fn new<F: Any + Send + Sync + Clone>(name: &'static str, get: GetFn, set: SetFn) -> Self {
        Self {
            name,
            type_id: TypeId::of::<F>(),
            type_name: core::any::type_name::<F>(),
            get,
            set,
            clone_value: |value| {
                value
                    .downcast_ref::<F>()
                    .map(|value| Box::new(value.clone()) as FieldValue)
            },
        }
    }

    /// The logical field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The [`TypeId`] of the field's declared type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The type path of the field's declared type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Clones the field's current value out of `receiver`.
    ///
    /// Returns `None` if `receiver` is not the type this accessor belongs to.
    #[inline]
    pub fn get(&self, receiver: &dyn Any) -> Option<FieldValue> {
        (self.get)(receiver)
    }

    /// Moves `value` into the field of `receiver`.
    #[inline]
    pub fn set(&self, receiver: &mut dyn Any, value: FieldValue) -> Result<(), AccessError> {
        (self.set)(receiver, value)
    }

    /// The duplicator for extracted values of this field's type.
    #[inline]
    pub fn cloner(&self) -> CloneFn {
        self.clone_value
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldTable

/// The ordered accessor table of a single type.
///
/// Field order follows declaration order; lookup by name is constant time.
/// A table is built once per type and cached, so all methods take `&self`
/// and return borrows that live as long as the table.
pub struct FieldTable {
    type_name: &'static str,
    fields: Vec<FieldAccessor>,
    indices: hashbrown::HashMap<&'static str, usize>,
}

impl FieldTable {
    /// Builds a table for the named type from its accessors.
    ///
    /// Duplicate field names keep the first accessor for lookup purposes;
    /// generated tables never contain duplicates.
    pub fn new(type_name: &'static str, fields: Vec<FieldAccessor>) -> Self {
        let mut indices = hashbrown::HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            indices.entry(field.name()).or_insert(index);
        }
        Self {
            type_name,
            fields,
            indices,
        }
    }

    /// The type path of the table's owner.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Looks up an accessor by field name.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldAccessor> {
        self.indices.get(name).map(|index| &self.fields[*index])
    }

    /// Returns the accessor at `index`, in declaration order.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldAccessor> {
        self.fields.get(index)
    }

    /// Number of fields in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the table has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the accessors in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, FieldAccessor> {
        self.fields.iter()
    }
}

impl fmt::Debug for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("type", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a FieldAccessor;
    type IntoIter = core::slice::Iter<'a, FieldAccessor>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
