//! Static storage for per-type accessor tables.
//!
//! A [`FieldTable`] is built the first time a type's table is requested and
//! reused for every mapping call afterwards.
//!
//! For non-generic types a plain [`OnceLock`] inside a `static` is enough:
//! see [`NonGenericTableCell`]. For generic types the `static CELL` inside
//! the function is shared by every instantiation, so [`GenericTableCell`]
//! keys the stored tables by [`TypeId`] behind an [`RwLock`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::access::FieldTable;

type TableMap = HashMap<TypeId, &'static FieldTable, foldhash::fast::FixedState>;

// -----------------------------------------------------------------------------
// NonGenericTableCell

/// Container for the accessor table of a non-generic type.
///
/// # Example
///
/// ```
/// use fieldmap::access::{FieldTable, NonGenericTableCell};
/// use fieldmap::Fields;
/// # use fieldmap::Mappable;
/// # use core::any::Any;
///
/// struct Empty;
/// # impl Mappable for Empty {
/// #     fn get_field_table(&self) -> &'static FieldTable {
/// #         <Self as Fields>::field_table()
/// #     }
/// #     fn as_any(&self) -> &dyn Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// # }
///
/// impl Fields for Empty {
///     fn field_table() -> &'static FieldTable {
///         static CELL: NonGenericTableCell = NonGenericTableCell::new();
///         CELL.get_or_init(|| FieldTable::new("Empty", Vec::new()))
///     }
/// }
///
/// assert!(Empty::field_table().is_empty());
/// ```
pub struct NonGenericTableCell(OnceLock<FieldTable>);

impl NonGenericTableCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored table, building it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &FieldTable
    where
        F: FnOnce() -> FieldTable,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTableCell

/// Container for the accessor tables of a generic type.
///
/// One `static CELL` in a generic `field_table` body is shared by every
/// instantiation of the type, so tables are stored per [`TypeId`] and leaked
/// to get the `'static` borrow the table contract promises.
pub struct GenericTableCell(RwLock<TableMap>);

impl GenericTableCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TableMap::with_hasher(
            foldhash::fast::FixedState::with_seed(0),
        )))
    }

    /// Returns the table stored for type `G`, building it with `f` on the
    /// first access for that instantiation.
    #[inline]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> FieldTable) -> &'static FieldTable {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> FieldTable,
    ) -> &'static FieldTable {
        if let Some(table) = self.get_by_type_id(type_id) {
            return table;
        }
        self.insert_by_type_id(type_id, f())
    }

    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static FieldTable> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    fn insert_by_type_id(&self, type_id: TypeId, table: FieldTable) -> &'static FieldTable {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(table)))
    }
}

// -----------------------------------------------------------------------------
// Tests
