//! Field projection: decide per field whether a scope may see it.

use std::num::FpCategory;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ScopeError;
use crate::record::{AsRecord, ScopedRecord};

/// Visible fields of one record under one scope, keyed by output key.
pub type ProjectedView = Map<String, Value>;

/// Result of projecting a [`Projectable`](crate::Projectable) input.
///
/// Serializes as a JSON object for a single record and as an array of
/// objects for a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projection {
    One(ProjectedView),
    Many(Vec<ProjectedView>),
}

impl Projection {
    /// Number of projected records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(views) => views.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::One(view) => Value::Object(view),
            Self::Many(views) => Value::Array(views.into_iter().map(Value::Object).collect()),
        }
    }
}

/// Whether `value` is the empty value of its JSON type: `null`, `false`,
/// zero, `""`, `[]` or `{}`.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => {
            n.as_u64() == Some(0)
                || n.as_i64() == Some(0)
                || n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero)
        }
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Project one record under `scope`.
///
/// A field is kept when it has an output key, `scope` is in its visibility
/// set (or the set is empty), and it is not an empty value flagged
/// omit-if-empty. When two fields share an output key the later one wins.
///
/// # Errors
/// [`ScopeError::InvalidRecord`] if the record is absent or its descriptor
/// table is inconsistent; [`ScopeError::Encoding`] if a field value cannot be
/// represented as JSON.
pub fn project<R: AsRecord + ?Sized>(
    record: &R,
    scope: &str,
) -> Result<ProjectedView, ScopeError> {
    let record = record
        .as_record()
        .ok_or_else(ScopeError::absent::<R::Record>)?;
    project_fields(record, scope)
}

/// Project every record of `records` under the same scope, preserving order.
///
/// # Errors
/// Fails on the first record that fails; no partial result is returned.
pub fn project_many<I>(records: I, scope: &str) -> Result<Vec<ProjectedView>, ScopeError>
where
    I: IntoIterator,
    I::Item: AsRecord,
{
    records
        .into_iter()
        .map(|record| project(&record, scope))
        .collect()
}

fn project_fields<R: ScopedRecord>(record: &R, scope: &str) -> Result<ProjectedView, ScopeError> {
    let record_type = std::any::type_name::<R>();
    let mut view = Map::new();

    for (index, spec) in R::field_specs().iter().enumerate() {
        let Some(key) = spec.output_key() else {
            tracing::trace!(record = record_type, field = spec.name(), "skipping hidden field");
            continue;
        };

        if !spec.is_visible_to(scope) {
            tracing::trace!(
                record = record_type,
                field = spec.name(),
                scope,
                "field not visible to scope"
            );
            continue;
        }

        let value = record.field_value(index)?;
        if spec.is_omit_empty() && is_empty_value(&value) {
            tracing::trace!(record = record_type, field = spec.name(), "omitting empty field");
            continue;
        }

        view.insert(key.to_owned(), value);
    }

    tracing::debug!(record = record_type, scope, fields = view.len(), "projected record");
    Ok(view)
}
