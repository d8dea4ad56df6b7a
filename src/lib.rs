#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits paths starting with `fieldmap::`, which is what user
// crates see. This alias makes the same paths resolve inside this crate, so
// the derive can be used in our own tests and doc examples.
extern crate self as fieldmap;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod convert;
pub mod mapper;
pub mod matcher;
pub mod record;
pub mod rename;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use convert::ConverterRegistry;
pub use mapper::{MapOptions, MapReport, Mapper, SkipReason, SkippedField};
pub use matcher::{ExactNameMatcher, NameMatcher};
pub use record::{DynamicRecord, Fields, Mappable};
pub use rename::{NamePair, NamePairs};

pub use fieldmap_derive as derive;
