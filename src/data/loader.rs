use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::model::Column;
use crate::error::{Result, SoilError};

// ---------------------------------------------------------------------------
// Field lookup
// ---------------------------------------------------------------------------

/// A payload field with its ordered fallback keys.
///
/// The first key that is present in the object wins, even when its value is
/// `null`; the aliases are only consulted when the earlier keys are absent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
}

impl FieldSpec {
    pub(crate) const fn new(key: &'static str) -> Self {
        Self { key, aliases: &[] }
    }

    pub(crate) const fn with_aliases(key: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { key, aliases }
    }

    /// Resolve the field against a JSON object: the matched key and its value.
    pub(crate) fn lookup<'a>(
        &self,
        object: &'a JsonValue,
    ) -> Option<(&'static str, &'a JsonValue)> {
        std::iter::once(self.key)
            .chain(self.aliases.iter().copied())
            .find_map(|key| object.get(key).map(|value| (key, value)))
    }
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Read one column. `Ok(None)` when the field is absent or `null`.
///
/// Expected JSON shape: `{ "<key>": [v0, v1, null, ...] }`
pub(crate) fn read_column<T: DeserializeOwned>(
    object: &JsonValue,
    field: &FieldSpec,
) -> Result<Option<Column<T>>> {
    let Some((key, value)) = field.lookup(object) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }

    let items = value
        .as_array()
        .ok_or_else(|| SoilError::InvalidData(format!("'{key}' is not an array")))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Option<T>>(item.clone())
                .map_err(|e| SoilError::InvalidData(format!("{key}[{i}]: {e}")))
        })
        .collect::<Result<Column<T>>>()
        .map(Some)
}

/// Read an optional scalar. A `null` value counts as absent.
pub(crate) fn read_scalar<T: DeserializeOwned>(object: &JsonValue, key: &str) -> Result<Option<T>> {
    match object.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => serde_json::from_value::<T>(value.clone())
            .map(Some)
            .map_err(|e| SoilError::InvalidData(format!("{key}: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Length invariant
// ---------------------------------------------------------------------------

/// Common length of the present columns of `table`.
///
/// Absent columns (`None`) take no part in the check; when every column is
/// absent the table is empty.
pub(crate) fn common_length(
    table: &'static str,
    lengths: &[(&'static str, Option<usize>)],
) -> Result<usize> {
    let present: Vec<(&str, usize)> = lengths
        .iter()
        .filter_map(|(name, len)| len.map(|len| (*name, len)))
        .collect();

    let Some(&(_, expected)) = present.first() else {
        return Ok(0);
    };

    if present.iter().all(|&(_, len)| len == expected) {
        return Ok(expected);
    }

    let lengths = present
        .iter()
        .map(|(name, len)| format!("{name}={len}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(SoilError::Validation { table, lengths })
}

/// Substitute an all-missing column of `len` entries for an absent one.
pub(crate) fn fill_absent<T: Clone>(column: Option<Column<T>>, len: usize) -> Column<T> {
    column.unwrap_or_else(|| vec![None; len])
}
