//! Pluggable field-name matching.

// -----------------------------------------------------------------------------
// NameMatcher

/// Decides whether two field names denote the same logical field.
///
/// A [`Mapper`](crate::Mapper) holds a list of matchers; a source/target
/// name pair matches as soon as any matcher in the list says so, consulted
/// in registration order. The built-in default is [`ExactNameMatcher`].
///
/// # Examples
///
/// ```
/// use fieldmap::NameMatcher;
///
/// struct CaseInsensitive;
///
/// impl NameMatcher for CaseInsensitive {
///     fn matches(&self, source: &str, target: &str) -> bool {
///         source.eq_ignore_ascii_case(target)
///     }
/// }
///
/// assert!(CaseInsensitive.matches("userName", "username"));
/// ```
pub trait NameMatcher: Send + Sync {
    /// Returns `true` when `source` and `target` correspond.
    ///
    /// The two fields are treated as the same whenever this returns `true`,
    /// whether or not the names are literally equal.
    fn matches(&self, source: &str, target: &str) -> bool;
}

// -----------------------------------------------------------------------------
// ExactNameMatcher

/// The default matcher: case-sensitive string equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactNameMatcher;

impl NameMatcher for ExactNameMatcher {
    #[inline]
    fn matches(&self, source: &str, target: &str) -> bool {
        source == target
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matcher_is_case_sensitive() {
        assert!(ExactNameMatcher.matches("name", "name"));
        assert!(!ExactNameMatcher.matches("name", "Name"));
        assert!(!ExactNameMatcher.matches("name", "nam"));
    }
}
