//! Sort mapping registry and the sort expression interpreter.
//!
//! A client sort expression is a comma separated list of public field names,
//! each optionally prefixed with `-` for descending order, e.g.
//! `-name,frequency`. Public names are translated to SQL columns through a
//! [`SortMappingDefinition`] registered for the (DTO, entity) pair, so no
//! client supplied text ever reaches the `ORDER BY` clause.

use crate::{DevHabitError, DevHabitResult};
use std::any::{type_name, TypeId};
use std::fmt;

/// Maps one public sort field to one or more SQL columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortMapping {
    /// Field name as clients spell it.
    pub sort_field: &'static str,
    /// Columns ordered by, in priority order.
    pub columns: &'static [&'static str],
    /// Inverts the requested direction.
    pub reverse: bool,
}

impl SortMapping {
    /// Maps a field to a single column.
    #[must_use]
    pub const fn new(sort_field: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            sort_field,
            columns,
            reverse: false,
        }
    }

    /// Marks the mapping as naturally reversed.
    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Immutable set of mappings for one (DTO, entity) pair.
pub struct SortMappingDefinition {
    source: TypeId,
    destination: TypeId,
    source_name: &'static str,
    destination_name: &'static str,
    mappings: &'static [SortMapping],
}

impl SortMappingDefinition {
    /// Creates the definition for `Dto` sorted over `Entity`.
    #[must_use]
    pub fn new<Dto: 'static, Entity: 'static>(mappings: &'static [SortMapping]) -> Self {
        Self {
            source: TypeId::of::<Dto>(),
            destination: TypeId::of::<Entity>(),
            source_name: type_name::<Dto>(),
            destination_name: type_name::<Entity>(),
            mappings,
        }
    }

    /// Returns the mappings in declaration order.
    #[must_use]
    pub const fn mappings(&self) -> &'static [SortMapping] {
        self.mappings
    }
}

impl fmt::Debug for SortMappingDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortMappingDefinition")
            .field("source", &self.source_name)
            .field("destination", &self.destination_name)
            .field("mappings", &self.mappings.len())
            .finish()
    }
}

/// Process wide registry of sort mapping definitions.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Default)]
pub struct SortMappingProvider {
    definitions: Vec<SortMappingDefinition>,
}

impl SortMappingProvider {
    /// Creates a registry from its definitions.
    #[must_use]
    pub fn new(definitions: Vec<SortMappingDefinition>) -> Self {
        Self { definitions }
    }

    /// Returns the mappings registered for `Dto` over `Entity`.
    ///
    /// A missing pair is a wiring bug and surfaces as an internal error.
    pub fn get_mappings<Dto: 'static, Entity: 'static>(&self) -> DevHabitResult<&'static [SortMapping]> {
        let source = TypeId::of::<Dto>();
        let destination = TypeId::of::<Entity>();

        self.definitions
            .iter()
            .find(|d| d.source == source && d.destination == destination)
            .map(SortMappingDefinition::mappings)
            .ok_or_else(|| {
                DevHabitError::internal(format!(
                    "Cannot find sort mapping from '{}' to '{}'",
                    type_name::<Dto>(),
                    type_name::<Entity>()
                ))
            })
    }

    /// Checks that every term of `sort` names a registered field.
    ///
    /// An absent or blank expression is valid. Unregistered type pairs are
    /// never valid.
    #[must_use]
    pub fn validate_mappings<Dto: 'static, Entity: 'static>(&self, sort: Option<&str>) -> bool {
        let Ok(mappings) = self.get_mappings::<Dto, Entity>() else {
            return false;
        };
        sort_terms(sort).all(|term| find_mapping(mappings, term.field).is_some())
    }
}

/// One parsed term of a sort expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTerm<'a> {
    pub field: &'a str,
    pub descending: bool,
}

/// Splits a sort expression into its terms, skipping empty segments.
pub fn sort_terms(sort: Option<&str>) -> impl Iterator<Item = SortTerm<'_>> {
    sort.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match t.strip_prefix('-') {
            Some(rest) => SortTerm {
                field: rest.trim(),
                descending: true,
            },
            None => SortTerm {
                field: t,
                descending: false,
            },
        })
}

fn find_mapping<'m>(mappings: &'m [SortMapping], field: &str) -> Option<&'m SortMapping> {
    mappings.iter().find(|m| m.sort_field.eq_ignore_ascii_case(field))
}

/// A single `ORDER BY` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderKey {
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending { "DESC" } else { "ASC" };
        write!(f, "{} {}", self.column, direction)
    }
}

/// Ordered list of keys resolved from a sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPlan {
    keys: Vec<OrderKey>,
}

impl SortPlan {
    /// Resolves `sort` against `mappings`.
    ///
    /// Terms are applied left to right. A term that maps to several columns
    /// contributes one key per column, all with the term's direction. A blank
    /// expression yields `default_order`. `tiebreaker` is appended last unless
    /// it is already a key, so equal rows keep a stable page order.
    pub fn resolve(
        sort: Option<&str>,
        mappings: &[SortMapping],
        default_order: &[OrderKey],
        tiebreaker: &'static str,
    ) -> DevHabitResult<Self> {
        let mut keys = Vec::new();

        for term in sort_terms(sort) {
            let mapping = find_mapping(mappings, term.field).ok_or_else(|| DevHabitError::invalid_sort(sort))?;
            let descending = term.descending ^ mapping.reverse;
            keys.extend(mapping.columns.iter().map(|&column| OrderKey { column, descending }));
        }

        if keys.is_empty() {
            keys.extend_from_slice(default_order);
        }
        if !keys.iter().any(|k| k.column == tiebreaker) {
            keys.push(OrderKey::asc(tiebreaker));
        }

        Ok(Self { keys })
    }

    /// Returns the keys in priority order.
    #[must_use]
    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    /// Renders the body of an `ORDER BY` clause.
    ///
    /// Columns come from static mappings only, never from request input.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WidgetDto;
    struct Widget;
    struct Unregistered;

    const WIDGET_MAPPINGS: &[SortMapping] = &[
        SortMapping::new("name", &["name"]),
        SortMapping::new("type", &["type"]),
        SortMapping::new("frequency", &["frequency_type", "frequency_times_per_period"]),
        SortMapping::new("age", &["created_at"]).reversed(),
    ];

    fn provider() -> SortMappingProvider {
        SortMappingProvider::new(vec![SortMappingDefinition::new::<WidgetDto, Widget>(WIDGET_MAPPINGS)])
    }

    fn resolve(sort: Option<&str>) -> SortPlan {
        SortPlan::resolve(sort, WIDGET_MAPPINGS, &[OrderKey::asc("created_at")], "id").unwrap()
    }

    #[test]
    fn test_validate_accepts_registered_fields() {
        let provider = provider();
        assert!(provider.validate_mappings::<WidgetDto, Widget>(Some("name")));
        assert!(provider.validate_mappings::<WidgetDto, Widget>(Some("-name, type")));
        assert!(provider.validate_mappings::<WidgetDto, Widget>(Some(" NAME ,-Frequency")));
    }

    #[test]
    fn test_validate_empty_is_valid() {
        let provider = provider();
        assert!(provider.validate_mappings::<WidgetDto, Widget>(None));
        assert!(provider.validate_mappings::<WidgetDto, Widget>(Some("")));
        assert!(provider.validate_mappings::<WidgetDto, Widget>(Some("  ")));
    }

    #[test]
    fn test_validate_rejects_any_unknown_field() {
        let provider = provider();
        assert!(!provider.validate_mappings::<WidgetDto, Widget>(Some("bogusField")));
        assert!(!provider.validate_mappings::<WidgetDto, Widget>(Some("name,bogusField")));
        assert!(!provider.validate_mappings::<WidgetDto, Widget>(Some("--name")));
    }

    #[test]
    fn test_get_mappings_for_unregistered_pair_is_internal() {
        let err = provider().get_mappings::<Unregistered, Widget>().unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(!provider().validate_mappings::<Unregistered, Widget>(None));
    }

    #[test]
    fn test_sort_terms_parsing() {
        let terms: Vec<_> = sort_terms(Some(" -name , type,,")).collect();
        assert_eq!(
            terms,
            vec![
                SortTerm { field: "name", descending: true },
                SortTerm { field: "type", descending: false },
            ]
        );
    }

    #[test]
    fn test_resolve_default_order() {
        let plan = resolve(None);
        assert_eq!(plan.keys(), &[OrderKey::asc("created_at"), OrderKey::asc("id")]);
    }

    #[test]
    fn test_resolve_is_left_to_right() {
        let plan = resolve(Some("-name,type"));
        assert_eq!(plan.to_sql(), "name DESC, type ASC, id ASC");
    }

    #[test]
    fn test_resolve_composite_field_shares_direction() {
        let plan = resolve(Some("-frequency"));
        assert_eq!(
            plan.keys(),
            &[
                OrderKey::desc("frequency_type"),
                OrderKey::desc("frequency_times_per_period"),
                OrderKey::asc("id"),
            ]
        );
    }

    #[test]
    fn test_resolve_reversed_mapping_xors_direction() {
        assert_eq!(resolve(Some("age")).keys()[0], OrderKey::desc("created_at"));
        assert_eq!(resolve(Some("-age")).keys()[0], OrderKey::asc("created_at"));
    }

    #[test]
    fn test_resolve_does_not_duplicate_tiebreaker() {
        let mappings = &[SortMapping::new("id", &["id"])];
        let plan = SortPlan::resolve(Some("-id"), mappings, &[], "id").unwrap();
        assert_eq!(plan.keys(), &[OrderKey::desc("id")]);
    }

    #[test]
    fn test_resolve_unknown_field_is_validation_error() {
        let err = SortPlan::resolve(Some("bogus"), WIDGET_MAPPINGS, &[], "id").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        assert_eq!(resolve(None), resolve(None));
        assert_eq!(resolve(Some("type")), resolve(Some("type")));
    }
}
