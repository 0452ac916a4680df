//! `relation` widget.
//!
//! Stores the `value_field` of one or more entries of another collection.
//! Referenced entries are resolved by the preview resolver; the widget
//! preview itself only shows the stored values.

use serde_json::Value;

use super::{check_bounds, count_error, options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, RelationOptions, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Reference to entries of another collection.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("relation", BasicControl(ValueType::StringOrList), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

/// Relation options of a field, if it is a relation.
#[must_use]
pub fn options(field: &FieldSchema) -> Option<RelationOptions> {
    match options_as(field, "relation").as_deref() {
        Some(WidgetOptions::Relation(o)) => Some(o.clone()),
        _ => None,
    }
}

/// Referenced values held by a relation value.
#[must_use]
pub fn referenced_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        Value::Null => Vec::new(),
        single => vec![scalar_text(single)],
    }
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let values = referenced_values(props.value);
    if values.is_empty() {
        PreviewNode::Empty
    } else {
        PreviewNode::text(values.join(", "))
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let Some(options) = options(field) else {
        return Ok(Vec::new());
    };
    match value {
        Value::Array(items) if options.multiple => {
            Ok(count_error(items.len(), options.min, options.max).into_iter().collect())
        }
        Value::Array(_) => Ok(vec![ErrorEntry::new(
            FieldErrorKind::Invalid,
            "must reference a single entry",
        )]),
        _ => Ok(Vec::new()),
    }
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    let Some(options) = options(field) else {
        return Err(SchemaError::new(&field.name, "missing relation options"));
    };
    if options.collection.is_empty() {
        return Err(SchemaError::new(&field.name, "relation needs a collection"));
    }
    if options.value_field.is_empty() {
        return Err(SchemaError::new(&field.name, "relation needs a value_field"));
    }
    check_bounds(field, options.min, options.max)
}
