//! The mapping engine.
//!
//! A [`Mapper`] bundles the pluggable pieces of a copy: the list of
//! [`NameMatcher`]s that decide which fields correspond, and the
//! [`ConverterRegistry`] that adapts mismatched value types. Registration
//! takes `&mut self`, mapping takes `&self`; a configured mapper can be
//! shared freely once setup is done.
//!
//! Per-call knobs (renames and skip lists) travel in [`MapOptions`]; every
//! copy operation returns a [`MapReport`].

use core::any::Any;

use hashbrown::{HashMap, HashSet};

use crate::access::{FieldAccessor, FieldTable, FieldValue};
use crate::convert::ConverterRegistry;
use crate::matcher::{ExactNameMatcher, NameMatcher};
use crate::record::{DynamicRecord, Fields, Mappable};
use crate::rename::NamePairs;

mod report;

pub use report::{MapReport, SkipReason, SkippedField};

// -----------------------------------------------------------------------------
// MapOptions

/// Per-call mapping options: explicit renames and skip lists.
///
/// Precedence, per source field: skip lists override everything, then a
/// direct name match, then the rename map. See
/// [`Mapper::object_to_object_with`] for the full walk.
///
/// # Examples
///
/// ```
/// use fieldmap::MapOptions;
///
/// let options = MapOptions::new()
///     .rename("score", "value")
///     .skip_source("internal_id")
///     .skip_target("updated_at");
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    rename: HashMap<String, String>,
    skip_source: HashSet<String>,
    skip_target: HashSet<String>,
}

impl MapOptions {
    /// Creates empty options: no renames, no skips.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rename: a source field `old` may copy into the target field
    /// `new` when no target field matches `old` directly.
    #[inline]
    pub fn rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.rename.insert(old.into(), new.into());
        self
    }

    /// Adds all entries of a [`NamePairs`] accumulator to the rename map.
    #[inline]
    pub fn renames(mut self, pairs: NamePairs) -> Self {
        self.rename.extend(pairs.into_rename_map());
        self
    }

    /// Excludes a source field from the copy entirely.
    #[inline]
    pub fn skip_source(mut self, name: impl Into<String>) -> Self {
        self.skip_source.insert(name.into());
        self
    }

    /// Excludes a target field from being written, however it was matched.
    #[inline]
    pub fn skip_target(mut self, name: impl Into<String>) -> Self {
        self.skip_target.insert(name.into());
        self
    }
}

// -----------------------------------------------------------------------------
// Mapper

/// Copies fields between [`Mappable`] values.
///
/// # Examples
///
/// ```
/// use fieldmap::derive::Mappable;
/// use fieldmap::Mapper;
///
/// #[derive(Mappable, Default)]
/// struct Source {
///     name: String,
///     age: i32,
/// }
///
/// #[derive(Mappable, Default)]
/// struct Target {
///     name: String,
///     age: i32,
/// }
///
/// let mapper = Mapper::new();
/// let source = Source { name: "ada".into(), age: 36 };
/// let (target, report) = mapper.object_to_new::<Target>(&source);
///
/// assert_eq!(target.name, "ada");
/// assert_eq!(target.age, 36);
/// assert_eq!(report.copied(), 2);
/// ```
pub struct Mapper {
    matchers: Vec<Box<dyn NameMatcher>>,
    converters: ConverterRegistry,
}

impl Default for Mapper {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper {
    /// Creates a mapper with the built-in [`ExactNameMatcher`] and no
    /// converters.
    pub fn new() -> Self {
        Self {
            matchers: vec![Box::new(ExactNameMatcher)],
            converters: ConverterRegistry::new(),
        }
    }

    /// Creates a mapper with no matchers and no converters.
    ///
    /// Without at least one matcher nothing copies; use this when even exact
    /// name equality should go through a caller-supplied matcher.
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
            converters: ConverterRegistry::new(),
        }
    }

    /// Appends a matcher. Matchers are consulted in registration order and
    /// any hit wins.
    pub fn add_matcher(&mut self, matcher: impl NameMatcher + 'static) -> &mut Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// Registers a value converter from `S` to `T`, replacing any previous
    /// converter for that pair.
    pub fn register_converter<S, T>(
        &mut self,
        convert: impl Fn(&S) -> T + Send + Sync + 'static,
    ) -> &mut Self
    where
        S: Any,
        T: Any + Send + Sync,
    {
        self.converters.register(convert);
        self
    }

    /// The mapper's converter registry.
    #[inline]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    // -------------------------------------------------------------------------
    // Object to object

    /// Copies same-named fields from `source` into `target`.
    ///
    /// Shorthand for [`object_to_object_with`](Self::object_to_object_with)
    /// with empty options.
    #[inline]
    pub fn object_to_object(&self, source: &dyn Mappable, target: &mut dyn Mappable) -> MapReport {
        self.object_to_object_with(source, target, &MapOptions::default())
    }

    /// Copies fields from `source` into `target` under the given options.
    ///
    /// For each source field, in declaration order:
    ///
    /// 1. A field named in `skip_source` is not copied.
    /// 2. A target writer is resolved by the matchers; when none matches and
    ///    the rename map has an entry for the field, the renamed name is
    ///    tried instead. A direct match always beats a rename.
    /// 3. A resolved writer named in `skip_target` is not written.
    /// 4. The value is read, run through a registered converter when its
    ///    runtime type differs from the writer's declared type, and written.
    ///
    /// Failures are per-field: an unmatched, unreadable, or rejected field
    /// lands in the report and the remaining fields still copy.
    pub fn object_to_object_with(
        &self,
        source: &dyn Mappable,
        target: &mut dyn Mappable,
        options: &MapOptions,
    ) -> MapReport {
        let source_table = source.get_field_table();
        let target_table = target.get_field_table();
        let mut report = MapReport::new();

        for field in source_table {
            let name = field.name();
            if options.skip_source.contains(name) {
                report.record_skip(name, SkipReason::SourceSkipList);
                continue;
            }

            let mut writer = self.find_writer(target_table, name);
            if writer.is_none() {
                if let Some(renamed) = options.rename.get(name) {
                    writer = self.find_writer(target_table, renamed);
                }
            }
            let Some(writer) = writer else {
                tracing::debug!(
                    field = %name,
                    target = %target_table.type_name(),
                    "no matching target field"
                );
                report.record_skip(name, SkipReason::NoMatchingField);
                continue;
            };
            if options.skip_target.contains(writer.name()) {
                report.record_skip(name, SkipReason::TargetSkipList);
                continue;
            }

            let Some(value) = field.get(source.as_any()) else {
                tracing::error!(
                    field = %name,
                    source = %source_table.type_name(),
                    "failed to read source field"
                );
                report.record_skip(name, SkipReason::ReadFailed);
                continue;
            };
            self.write_value(name, value, writer, target, &mut report);
        }
        report
    }

    /// Constructs a `T` via [`Default`] and copies same-named fields into it.
    #[inline]
    pub fn object_to_new<T: Fields + Default>(&self, source: &dyn Mappable) -> (T, MapReport) {
        self.object_to_new_with(source, &MapOptions::default())
    }

    /// Constructs a `T` via [`Default`] and copies fields into it under the
    /// given options.
    pub fn object_to_new_with<T: Fields + Default>(
        &self,
        source: &dyn Mappable,
        options: &MapOptions,
    ) -> (T, MapReport) {
        let mut target = T::default();
        let report = self.object_to_object_with(source, &mut target, options);
        (target, report)
    }

    // -------------------------------------------------------------------------
    // Record to object, object to record

    /// Copies entries of `record` into matching fields of `target`.
    ///
    /// Entries are visited in insertion order. Matchers and converters apply
    /// as in [`object_to_object_with`](Self::object_to_object_with); renames
    /// and skip lists do not exist on this path. An empty record is a no-op.
    pub fn record_to_object(&self, record: &DynamicRecord, target: &mut dyn Mappable) -> MapReport {
        let target_table = target.get_field_table();
        let mut report = MapReport::new();

        for name in record.names() {
            let Some(writer) = self.find_writer(target_table, name) else {
                tracing::debug!(
                    field = %name,
                    target = %target_table.type_name(),
                    "no matching target field"
                );
                report.record_skip(name, SkipReason::NoMatchingField);
                continue;
            };
            let Some(value) = record.clone_value(name) else {
                report.record_skip(name, SkipReason::ReadFailed);
                continue;
            };
            self.write_value(name, value, writer, target, &mut report);
        }
        report
    }

    /// Constructs a `T` via [`Default`] and fills it from `record`.
    pub fn record_to_new<T: Fields + Default>(&self, record: &DynamicRecord) -> (T, MapReport) {
        let mut target = T::default();
        let report = self.record_to_object(record, &mut target);
        (target, report)
    }

    /// Snapshots `source` as a [`DynamicRecord`].
    ///
    /// One entry per table field, keyed by the exact field name, holding a
    /// clone of the current value. No matching and no conversion take place;
    /// the result is independent of the mapper's registration state.
    pub fn object_to_record(&self, source: &dyn Mappable) -> DynamicRecord {
        let table = source.get_field_table();
        let mut record = DynamicRecord::with_capacity(table.len());
        for field in table {
            match field.get(source.as_any()) {
                Some(value) => record.insert_boxed(field.name(), value, field.cloner()),
                None => {
                    tracing::error!(
                        field = %field.name(),
                        source = %table.type_name(),
                        "failed to read source field"
                    );
                }
            }
        }
        record
    }

    // -------------------------------------------------------------------------
    // List to list

    /// Maps `sources` onto `targets` pairwise by index.
    ///
    /// The shorter slice bounds the walk; surplus elements on either side are
    /// left untouched. Returns one report per mapped pair.
    pub fn list_to_list<S, T>(
        &self,
        sources: &[S],
        targets: &mut [T],
        options: &MapOptions,
    ) -> Vec<MapReport>
    where
        S: Mappable,
        T: Mappable,
    {
        sources
            .iter()
            .zip(targets.iter_mut())
            .map(|(source, target)| self.object_to_object_with(source, target, options))
            .collect()
    }

    /// Constructs one `T` via [`Default`] per source element and maps
    /// pairwise.
    pub fn list_to_new<S, T>(&self, sources: &[S], options: &MapOptions) -> (Vec<T>, Vec<MapReport>)
    where
        S: Mappable,
        T: Fields + Default,
    {
        let mut targets: Vec<T> = Vec::with_capacity(sources.len());
        targets.resize_with(sources.len(), T::default);
        let reports = self.list_to_list(sources, &mut targets, options);
        (targets, reports)
    }

    // -------------------------------------------------------------------------
    // Internals

    /// Resolves the first target field any matcher pairs with `source_name`.
    fn find_writer<'t>(
        &self,
        table: &'t FieldTable,
        source_name: &str,
    ) -> Option<&'t FieldAccessor> {
        for field in table {
            for matcher in &self.matchers {
                if matcher.matches(source_name, field.name()) {
                    return Some(field);
                }
            }
        }
        None
    }

    /// Converts `value` if needed and hands it to `writer`.
    fn write_value(
        &self,
        source_name: &str,
        mut value: FieldValue,
        writer: &FieldAccessor,
        target: &mut dyn Mappable,
        report: &mut MapReport,
    ) {
        let value_type = (*value).type_id();
        if value_type != writer.type_id() {
            match self.converters.lookup(value_type, writer.type_id()) {
                Some(converter) => {
                    if let Some(converted) = converter.convert(&*value) {
                        tracing::debug!(
                            field = %source_name,
                            from = %converter.source(),
                            to = %converter.target(),
                            "applied converter"
                        );
                        value = converted;
                    }
                }
                None => {
                    tracing::debug!(
                        field = %source_name,
                        to = %writer.type_name(),
                        "no converter for mismatched value type"
                    );
                }
            }
        }
        match writer.set(target.as_any_mut(), value) {
            Ok(()) => report.record_copy(),
            Err(error) => {
                tracing::warn!(field = %source_name, error = %error, "target field rejected value");
                report.record_skip(
                    source_name,
                    SkipReason::ValueRejected {
                        expected: writer.type_name(),
                    },
                );
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessError, NonGenericTableCell};
    use crate::derive::Mappable;
    use crate::matcher::NameMatcher;

    #[derive(Mappable, Default, Debug, PartialEq, Clone)]
    struct Src {
        name: String,
        age: i32,
        score: i32,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Target {
        name: String,
        age: i32,
        value: String,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Wide {
        name: String,
        age: i32,
        score: i32,
        value: i32,
    }

    fn sample() -> Src {
        Src {
            name: "src".to_string(),
            age: 1,
            score: 2,
        }
    }

    #[test]
    fn same_name_same_type_fields_copy() {
        let mapper = Mapper::new();
        let (copy, report) = mapper.object_to_new::<Src>(&sample());

        assert_eq!(copy, sample());
        assert_eq!(report.copied(), 3);
        assert!(report.is_complete());
    }

    #[test]
    fn mapping_is_idempotent() {
        let mapper = Mapper::new();
        let mut target = Src::default();

        mapper.object_to_object(&sample(), &mut target);
        let first = target.clone();
        mapper.object_to_object(&sample(), &mut target);
        assert_eq!(target, first);
    }

    #[test]
    fn rename_and_conversion_scenario() {
        let mut mapper = Mapper::new();
        mapper.register_converter::<i32, String>(|n| n.to_string());

        let options = MapOptions::new().renames(NamePairs::new().add("score", "value"));
        let (target, report) = mapper.object_to_new_with::<Target>(&sample(), &options);

        assert_eq!(
            target,
            Target {
                name: "src".to_string(),
                age: 1,
                value: "2".to_string(),
            }
        );
        assert_eq!(report.copied(), 3);
        assert!(report.is_complete());
    }

    #[test]
    fn direct_match_beats_rename() {
        let mapper = Mapper::new();
        let options = MapOptions::new().rename("score", "value");
        let (target, report) = mapper.object_to_new_with::<Wide>(&sample(), &options);

        // `score` exists on the target, so the rename never applies.
        assert_eq!(target.score, 2);
        assert_eq!(target.value, 0);
        assert_eq!(report.copied(), 3);
    }

    #[test]
    fn skip_source_overrides_match_and_rename() {
        let mapper = Mapper::new();
        let options = MapOptions::new()
            .rename("score", "value")
            .skip_source("score")
            .skip_source("name");
        let (target, report) = mapper.object_to_new_with::<Wide>(&sample(), &options);

        assert_eq!(target.name, "");
        assert_eq!(target.score, 0);
        assert_eq!(target.value, 0);
        assert_eq!(target.age, 1);
        assert_eq!(report.copied(), 1);
        assert_eq!(report.skipped().len(), 2);
        assert!(report
            .skipped()
            .iter()
            .all(|skip| skip.reason() == &SkipReason::SourceSkipList));
    }

    #[test]
    fn skip_target_applies_to_renamed_writer() {
        let mut mapper = Mapper::new();
        mapper.register_converter::<i32, String>(|n| n.to_string());

        let options = MapOptions::new()
            .rename("score", "value")
            .skip_target("value");
        let (target, report) = mapper.object_to_new_with::<Target>(&sample(), &options);

        assert_eq!(target.value, "");
        assert_eq!(report.copied(), 2);
        assert_eq!(
            report.skipped(),
            [SkippedField::new("score", SkipReason::TargetSkipList)]
        );
    }

    #[test]
    fn unmatched_fields_are_reported_and_target_extras_keep_defaults() {
        let mapper = Mapper::new();
        let (target, report) = mapper.object_to_new::<Target>(&sample());

        assert_eq!(target.name, "src");
        assert_eq!(target.age, 1);
        assert_eq!(target.value, "");
        assert_eq!(report.copied(), 2);
        assert_eq!(
            report.skipped(),
            [SkippedField::new("score", SkipReason::NoMatchingField)]
        );
    }

    #[test]
    fn mismatched_type_without_converter_is_rejected() {
        let mapper = Mapper::new();
        let options = MapOptions::new().rename("score", "value");
        let (target, report) = mapper.object_to_new_with::<Target>(&sample(), &options);

        assert_eq!(target.value, "");
        assert_eq!(report.copied(), 2);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].field(), "score");
        assert_eq!(
            report.skipped()[0].reason(),
            &SkipReason::ValueRejected {
                expected: core::any::type_name::<String>(),
            }
        );
    }

    #[test]
    fn report_totals_add_up() {
        let mapper = Mapper::new();
        let options = MapOptions::new().skip_source("name");
        let (_, report) = mapper.object_to_new_with::<Target>(&sample(), &options);

        assert_eq!(report.considered(), Src::field_table().len());
        assert_eq!(report.copied() + report.skipped().len(), 3);
    }

    struct CaseInsensitive;

    impl NameMatcher for CaseInsensitive {
        fn matches(&self, source: &str, target: &str) -> bool {
            source.eq_ignore_ascii_case(target)
        }
    }

    #[derive(Mappable, Default)]
    #[allow(non_snake_case)]
    struct Shouting {
        NAME: String,
        AGE: i32,
    }

    #[test]
    fn custom_matcher_resolves_what_exact_matching_misses() {
        let mut mapper = Mapper::new();
        let (miss, _) = mapper.object_to_new::<Shouting>(&sample());
        assert_eq!(miss.NAME, "");

        mapper.add_matcher(CaseInsensitive);
        let (hit, report) = mapper.object_to_new::<Shouting>(&sample());
        assert_eq!(hit.NAME, "src");
        assert_eq!(hit.AGE, 1);
        assert_eq!(report.copied(), 2);
    }

    #[test]
    fn empty_mapper_copies_nothing() {
        let mapper = Mapper::empty();
        let (target, report) = mapper.object_to_new::<Src>(&sample());

        assert_eq!(target, Src::default());
        assert_eq!(report.copied(), 0);
        assert_eq!(report.skipped().len(), 3);
    }

    #[test]
    fn record_round_trip() {
        let mapper = Mapper::new();
        let record = mapper.object_to_record(&sample());

        assert_eq!(record.len(), 3);
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, ["name", "age", "score"]);
        assert_eq!(record.get_as::<String>("name").unwrap(), "src");
        assert_eq!(record.get_as::<i32>("score"), Some(&2));

        let (rebuilt, report) = mapper.record_to_new::<Src>(&record);
        assert_eq!(rebuilt, sample());
        assert!(report.is_complete());
    }

    #[test]
    fn record_snapshot_ignores_converters() {
        let mut mapper = Mapper::new();
        mapper.register_converter::<i32, String>(|n| n.to_string());

        let record = mapper.object_to_record(&sample());
        assert_eq!(record.get_as::<i32>("age"), Some(&1));
    }

    #[test]
    fn record_to_object_converts_and_reports() {
        let mut mapper = Mapper::new();
        mapper.register_converter::<i32, String>(|n| n.to_string());

        let mut record = DynamicRecord::new();
        record.insert("name", "rec".to_string());
        record.insert("value", 7_i32);
        record.insert("ghost", 1_u8);

        let mut target = Target::default();
        let report = mapper.record_to_object(&record, &mut target);

        assert_eq!(target.name, "rec");
        assert_eq!(target.value, "7");
        assert_eq!(report.copied(), 2);
        assert_eq!(
            report.skipped(),
            [SkippedField::new("ghost", SkipReason::NoMatchingField)]
        );
    }

    // Hand-built table whose `a` getter always fails; `b` behaves normally.
    #[derive(Default, Debug, PartialEq)]
    struct Flaky {
        a: i32,
        b: i32,
    }

    impl Fields for Flaky {
        fn field_table() -> &'static FieldTable {
            static CELL: NonGenericTableCell = NonGenericTableCell::new();
            CELL.get_or_init(|| {
                FieldTable::new(
                    "Flaky",
                    vec![
                        FieldAccessor::new::<i32>(
                            "a",
                            |_| None,
                            |receiver, value| {
                                let Some(receiver) = receiver.downcast_mut::<Flaky>() else {
                                    return Err(AccessError::Receiver { expected: "Flaky" });
                                };
                                let value = value.downcast::<i32>().map_err(|_| {
                                    AccessError::Value {
                                        field: "a",
                                        expected: "i32",
                                    }
                                })?;
                                receiver.a = *value;
                                Ok(())
                            },
                        ),
                        FieldAccessor::new::<i32>(
                            "b",
                            |receiver| {
                                receiver
                                    .downcast_ref::<Flaky>()
                                    .map(|flaky| Box::new(flaky.b) as FieldValue)
                            },
                            |receiver, value| {
                                let Some(receiver) = receiver.downcast_mut::<Flaky>() else {
                                    return Err(AccessError::Receiver { expected: "Flaky" });
                                };
                                let value = value.downcast::<i32>().map_err(|_| {
                                    AccessError::Value {
                                        field: "b",
                                        expected: "i32",
                                    }
                                })?;
                                receiver.b = *value;
                                Ok(())
                            },
                        ),
                    ],
                )
            })
        }
    }

    impl super::Mappable for Flaky {
        fn get_field_table(&self) -> &'static FieldTable {
            <Self as Fields>::field_table()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn reader_failure_is_contained_per_field() {
        let mapper = Mapper::new();
        let source = Flaky { a: 5, b: 7 };

        let (target, report) = mapper.object_to_new::<Flaky>(&source);

        assert_eq!(target.a, 0);
        assert_eq!(target.b, 7);
        assert_eq!(report.copied(), 1);
        assert_eq!(
            report.skipped(),
            [SkippedField::new("a", SkipReason::ReadFailed)]
        );
    }

    #[test]
    fn uncloneable_record_entry_is_contained_per_field() {
        let mapper = Mapper::new();
        let mut record = DynamicRecord::new();
        record.insert_boxed("a", Box::new(5_i32), |_| None);
        record.insert("b", 7_i32);

        let mut target = Flaky::default();
        let report = mapper.record_to_object(&record, &mut target);

        assert_eq!(target.a, 0);
        assert_eq!(target.b, 7);
        assert_eq!(report.copied(), 1);
        assert_eq!(
            report.skipped(),
            [SkippedField::new("a", SkipReason::ReadFailed)]
        );
    }

    #[test]
    fn empty_record_is_a_no_op() {
        let mapper = Mapper::new();
        let mut target = Target::default();
        let report = mapper.record_to_object(&DynamicRecord::new(), &mut target);

        assert_eq!(target, Target::default());
        assert_eq!(report.considered(), 0);
    }

    #[test]
    fn list_mapping_is_bounded_by_the_shorter_slice() {
        let mapper = Mapper::new();
        let sources = vec![sample(); 3];

        let mut many: Vec<Src> = (0..5).map(|_| Src::default()).collect();
        let reports = mapper.list_to_list(&sources, &mut many, &MapOptions::new());
        assert_eq!(reports.len(), 3);
        assert_eq!(many[2], sample());
        assert_eq!(many[3], Src::default());

        let mut few: Vec<Src> = (0..2).map(|_| Src::default()).collect();
        let reports = mapper.list_to_list(&sources, &mut few, &MapOptions::new());
        assert_eq!(reports.len(), 2);
        assert_eq!(few[1], sample());
    }

    #[test]
    fn list_to_new_builds_one_target_per_source() {
        let mut mapper = Mapper::new();
        mapper.register_converter::<i32, String>(|n| n.to_string());

        let sources = vec![sample(); 2];
        let options = MapOptions::new().renames(NamePairs::new().add("score", "value"));
        let (targets, reports) = mapper.list_to_new::<_, Target>(&sources, &options);

        assert_eq!(targets.len(), 2);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(MapReport::is_complete));
        assert_eq!(targets[0].value, "2");
    }
}
