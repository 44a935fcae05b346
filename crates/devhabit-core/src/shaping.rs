//! Data shaping: projecting DTOs onto a client selected subset of fields.

use crate::{DevHabitError, DevHabitResult, LinkDto};
use serde::Serialize;
use serde_json::{Map, Value};

/// A shaped object: requested field names mapped to their values.
pub type ShapedEntry = Map<String, Value>;

/// Key under which links are attached to a shaped entry.
pub const LINKS_KEY: &str = "links";

/// Key of the identity field kept on every shaped entry.
pub const ID_KEY: &str = "id";

/// A DTO that can be shaped by field name.
///
/// `FIELDS` is the allow list of public field names, spelled exactly as the
/// DTO serializes them. Values are read from the serde representation, so a
/// field that is not listed can never leak into shaped output.
pub trait Shape: Serialize {
    /// Public field names in canonical casing.
    const FIELDS: &'static [&'static str];

    /// Identity of the item, used to address per-item links.
    fn id(&self) -> &str;
}

/// Resolves requested field names to their canonical spelling.
///
/// `None` means at least one requested field does not exist on `T`.
fn resolve_fields<T: Shape>(fields: Option<&str>) -> Option<Vec<&'static str>> {
    let requested: Vec<&str> = fields
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if requested.is_empty() {
        return Some(T::FIELDS.to_vec());
    }

    let mut resolved = Vec::with_capacity(requested.len() + 1);
    for name in requested {
        let canonical = T::FIELDS.iter().find(|f| f.eq_ignore_ascii_case(name))?;
        if !resolved.contains(canonical) {
            resolved.push(*canonical);
        }
    }
    Some(resolved)
}

/// Field selection over [`Shape`] types.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataShapingService;

impl DataShapingService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks that every requested field is a public field of `T`.
    ///
    /// Absent or blank `fields` is valid and selects everything.
    #[must_use]
    pub fn validate<T: Shape>(&self, fields: Option<&str>) -> bool {
        resolve_fields::<T>(fields).is_some()
    }

    /// Shapes a single item.
    pub fn shape_one<T: Shape>(&self, item: &T, fields: Option<&str>) -> DevHabitResult<ShapedEntry> {
        let selected = resolve_fields::<T>(fields).ok_or_else(|| DevHabitError::invalid_fields(fields))?;
        shape(item, &selected)
    }

    /// Shapes every item of a collection.
    pub fn shape_many<T: Shape>(&self, items: &[T], fields: Option<&str>) -> DevHabitResult<Vec<ShapedEntry>> {
        let selected = resolve_fields::<T>(fields).ok_or_else(|| DevHabitError::invalid_fields(fields))?;
        items.iter().map(|item| shape(item, &selected)).collect()
    }

    /// Shapes every item and attaches the links produced by `link_factory`.
    ///
    /// The factory receives the item id and the raw `fields` value so the
    /// links can reproduce the same projection.
    pub fn shape_many_with_links<T, F>(
        &self,
        items: &[T],
        fields: Option<&str>,
        link_factory: F,
    ) -> DevHabitResult<Vec<ShapedEntry>>
    where
        T: Shape,
        F: Fn(&str, Option<&str>) -> DevHabitResult<Vec<LinkDto>>,
    {
        let selected = resolve_fields::<T>(fields).ok_or_else(|| DevHabitError::invalid_fields(fields))?;
        items
            .iter()
            .map(|item| {
                let mut entry = shape(item, &selected)?;
                let links = link_factory(item.id(), fields)?;
                entry.insert(LINKS_KEY.to_string(), serde_json::to_value(links)?);
                Ok(entry)
            })
            .collect()
    }
}

fn shape<T: Shape>(item: &T, selected: &[&'static str]) -> DevHabitResult<ShapedEntry> {
    let Value::Object(mut source) = serde_json::to_value(item)? else {
        return Err(DevHabitError::internal(format!(
            "{} does not serialize to an object",
            std::any::type_name::<T>()
        )));
    };

    let mut entry = ShapedEntry::new();
    if !selected.contains(&ID_KEY) {
        entry.insert(ID_KEY.to_string(), Value::String(item.id().to_string()));
    }
    for &field in selected {
        let value = source.remove(field).unwrap_or(Value::Null);
        entry.insert(field.to_string(), value);
    }
    Ok(entry)
}
