//! The value conversion registry.
//!
//! Converters adapt a field value from one type to another during a copy,
//! keyed by the `(source type, target type)` pair. Lookup is an exact key
//! match: no inheritance-style widening, no transitive chaining.

use core::any::{Any, TypeId};

use hashbrown::HashMap;

use crate::access::FieldValue;

// -----------------------------------------------------------------------------
// Converter

type ErasedConvertFn = Box<dyn Fn(&dyn Any) -> Option<FieldValue> + Send + Sync>;

/// A registered conversion function, erased over its concrete types.
///
/// Produced by [`ConverterRegistry::register`]; the source and target type
/// paths are retained for diagnostics.
pub struct Converter {
    source: &'static str,
    target: &'static str,
    convert: ErasedConvertFn,
}

impl Converter {
    /// Type path of the value type this converter consumes.
    #[inline]
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Type path of the value type this converter produces.
    #[inline]
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Applies the conversion.
    ///
    /// Returns `None` if `value` is not of the converter's source type,
    /// which cannot happen when the converter was found through
    /// [`ConverterRegistry::lookup`] with the value's runtime type.
    #[inline]
    pub fn convert(&self, value: &dyn Any) -> Option<FieldValue> {
        (self.convert)(value)
    }
}

impl core::fmt::Debug for Converter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Converter({} -> {})", self.source, self.target)
    }
}

// -----------------------------------------------------------------------------
// ConverterRegistry

/// Stores conversion functions keyed by `(source type, target type)`.
///
/// At most one converter exists per key; registering under an occupied key
/// replaces the previous entry.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use fieldmap::ConverterRegistry;
///
/// let mut registry = ConverterRegistry::new();
/// registry.register::<i32, String>(|n| n.to_string());
///
/// let converter = registry
///     .lookup(TypeId::of::<i32>(), TypeId::of::<String>())
///     .unwrap();
/// let converted = converter.convert(&7_i32).unwrap();
/// assert_eq!(converted.downcast_ref::<String>().unwrap(), "7");
/// ```
#[derive(Default)]
pub struct ConverterRegistry {
    table: HashMap<(TypeId, TypeId), Converter>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a conversion from `S` to `T`, replacing any previous
    /// converter for that pair.
    pub fn register<S, T>(&mut self, convert: impl Fn(&S) -> T + Send + Sync + 'static)
    where
        S: Any,
        T: Any + Send + Sync,
    {
        let converter = Converter {
            source: core::any::type_name::<S>(),
            target: core::any::type_name::<T>(),
            convert: Box::new(move |value| {
                value
                    .downcast_ref::<S>()
                    .map(|source| Box::new(convert(source)) as FieldValue)
            }),
        };
        tracing::debug!(from = %converter.source, to = %converter.target, "registered converter");
        self.table
            .insert((TypeId::of::<S>(), TypeId::of::<T>()), converter);
    }

    /// Looks up the converter for the exact `(source, target)` pair.
    #[inline]
    pub fn lookup(&self, source: TypeId, target: TypeId) -> Option<&Converter> {
        self.table.get(&(source, target))
    }

    /// Whether a converter is registered for the pair `(S, T)`.
    #[inline]
    pub fn contains<S: Any, T: Any>(&self) -> bool {
        self.table
            .contains_key(&(TypeId::of::<S>(), TypeId::of::<T>()))
    }

    /// Number of registered converters.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests
