//! The outcome report of a mapping call.

use core::fmt;

// -----------------------------------------------------------------------------
// SkipReason

/// Why a source field was not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The field name appears in the source skip list.
    SourceSkipList,
    /// The resolved target field name appears in the target skip list.
    TargetSkipList,
    /// No target field matched, neither directly nor through a rename.
    NoMatchingField,
    /// The source accessor returned no value.
    ReadFailed,
    /// The target accessor refused the value handed to it.
    ValueRejected {
        /// Type path the target field expects.
        expected: &'static str,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceSkipList => write!(f, "field is in the source skip list"),
            Self::TargetSkipList => write!(f, "target field is in the target skip list"),
            Self::NoMatchingField => write!(f, "no matching target field"),
            Self::ReadFailed => write!(f, "reading the source field failed"),
            Self::ValueRejected { expected } => {
                write!(f, "target field expects a value of type `{expected}`")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// SkippedField

/// A source field that was considered but not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    field: String,
    reason: SkipReason,
}

impl SkippedField {
    #[inline]
    pub(crate) fn new(field: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    /// The source-side field name.
    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Why the field was skipped.
    #[inline]
    pub fn reason(&self) -> &SkipReason {
        &self.reason
    }
}

impl fmt::Display for SkippedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.reason)
    }
}

// -----------------------------------------------------------------------------
// MapReport

/// What a single mapping call did.
///
/// Every source field ends up either in the copied count or in the skipped
/// list, so `copied() + skipped().len()` equals the number of source fields
/// considered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapReport {
    copied: usize,
    skipped: Vec<SkippedField>,
}

impl MapReport {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_copy(&mut self) {
        self.copied += 1;
    }

    #[inline]
    pub(crate) fn record_skip(&mut self, field: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedField::new(field, reason));
    }

    /// Number of fields copied into the target.
    #[inline]
    pub fn copied(&self) -> usize {
        self.copied
    }

    /// The fields that were considered but not copied, in source order.
    #[inline]
    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }

    /// Whether every considered field was copied.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Total number of source fields considered.
    #[inline]
    pub fn considered(&self) -> usize {
        self.copied + self.skipped.len()
    }
}

// -----------------------------------------------------------------------------
// Tests
