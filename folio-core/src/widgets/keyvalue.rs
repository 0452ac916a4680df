//! `keyvalue` widget.
//!
//! Stores pairs as a list of `{ "key": ..., "value": ... }` objects so the
//! editor can keep the order and report duplicate keys.

use std::collections::HashSet;

use serde_json::Value;

use super::{check_bounds, count_error, options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, KeyValueOptions, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Key/value pairs.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("keyvalue", BasicControl(ValueType::List), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

fn options(field: &FieldSchema) -> KeyValueOptions {
    match options_as(field, "keyvalue").as_deref() {
        Some(WidgetOptions::KeyValue(o)) => o.clone(),
        _ => KeyValueOptions::default(),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    (
                        item.get("key").map(scalar_text).unwrap_or_default(),
                        item.get("value").map(scalar_text).unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let rows: Vec<PreviewNode> = pairs(props.value)
        .into_iter()
        .map(|(key, value)| PreviewNode::text(format!("{key}: {value}")))
        .collect();
    if rows.is_empty() {
        PreviewNode::Empty
    } else {
        PreviewNode::container(rows)
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = options(field);
    let pairs = pairs(value);
    let mut errors: Vec<ErrorEntry> = count_error(pairs.len(), options.min, options.max)
        .into_iter()
        .collect();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (key, _) in &pairs {
        if key.is_empty() {
            errors.push(ErrorEntry::new(FieldErrorKind::Invalid, "keys must not be empty"));
        } else if !seen.insert(key.as_str()) && reported.insert(key.as_str()) {
            errors.push(ErrorEntry::new(
                FieldErrorKind::UniqueKey,
                format!("duplicate key '{key}'"),
            ));
        }
    }
    Ok(errors)
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    let options = options(field);
    check_bounds(field, options.min, options.max)
}
