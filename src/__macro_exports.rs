//! Re-exports for generated code. Not public API.

pub use crate::access::{
    AccessError, FieldAccessor, FieldTable, FieldValue, GenericTableCell, GetFn,
    NonGenericTableCell, SetFn,
};
pub use crate::record::{Fields, Mappable};
