//! `select` widget.

use serde_json::Value;

use super::{check_bounds, count_error, options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, SchemaError, SelectOptions, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Choice among fixed options.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("select", BasicControl(ValueType::StringOrList), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

fn options(field: &FieldSchema) -> SelectOptions {
    match options_as(field, "select").as_deref() {
        Some(WidgetOptions::Select(o)) => o.clone(),
        _ => SelectOptions::default(),
    }
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let options = options(props.field);
    let label_of = |value: &Value| {
        let value = scalar_text(value);
        options
            .options
            .iter()
            .find(|o| o.value() == value)
            .map_or(value, |o| o.label().to_string())
    };
    let labels: Vec<String> = match props.value {
        Value::Array(items) => items.iter().map(label_of).collect(),
        Value::Null => Vec::new(),
        single => vec![label_of(single)],
    };
    if labels.is_empty() {
        PreviewNode::Empty
    } else {
        PreviewNode::text(labels.join(", "))
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = options(field);
    let mut errors = Vec::new();

    let chosen: Vec<&Value> = match value {
        Value::Array(items) if options.multiple => {
            errors.extend(count_error(items.len(), options.min, options.max));
            items.iter().collect()
        }
        Value::Array(_) => {
            errors.push(ErrorEntry::new(
                FieldErrorKind::Invalid,
                "must be a single option",
            ));
            return Ok(errors);
        }
        single => vec![single],
    };

    for item in chosen {
        let text = scalar_text(item);
        if !options.options.iter().any(|o| o.value() == text) {
            errors.push(ErrorEntry::new(
                FieldErrorKind::Invalid,
                format!("'{text}' is not an allowed option"),
            ));
        }
    }
    Ok(errors)
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    let options = options(field);
    if options.options.is_empty() {
        return Err(SchemaError::new(&field.name, "select needs at least one option"));
    }
    check_bounds(field, options.min, options.max)
}
