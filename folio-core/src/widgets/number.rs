//! `number` widget.

use serde_json::Value;

use super::{check_bounds, options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, NumberKind, NumberOptions, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Number input with optional bounds.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("number", BasicControl(ValueType::Number), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    PreviewNode::text(scalar_text(props.value))
}

fn options(field: &FieldSchema) -> NumberOptions {
    match options_as(field, "number").as_deref() {
        Some(WidgetOptions::Number(o)) => o.clone(),
        _ => NumberOptions::default(),
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = options(field);
    let Some(number) = value.as_f64() else {
        return Ok(vec![ErrorEntry::new(
            FieldErrorKind::Invalid,
            "must be a number",
        )]);
    };

    let mut errors = Vec::new();
    if options.value_type == NumberKind::Int && number.fract().abs() > f64::EPSILON {
        errors.push(ErrorEntry::new(
            FieldErrorKind::Invalid,
            "must be a whole number",
        ));
    }

    let message = match (options.min, options.max) {
        (Some(min), Some(max)) if number < min || number > max => {
            Some(format!("must be between {min} and {max}"))
        }
        (Some(min), None) if number < min => Some(format!("must be at least {min}")),
        (None, Some(max)) if number > max => Some(format!("must be at most {max}")),
        _ => None,
    };
    if let Some(message) = message {
        errors.push(ErrorEntry::new(FieldErrorKind::Range, message));
    }
    Ok(errors)
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    let options = options(field);
    check_bounds(field, options.min, options.max)?;
    match options.step {
        Some(step) if step <= 0.0 => Err(SchemaError::new(
            &field.name,
            "step must be positive",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{check, field};
    use serde_json::json;

    #[test]
    fn test_range_messages() {
        let count = field(json!({"name": "count", "widget": "number", "min": 1, "max": 10}));
        assert!(check(&count, &json!(5)).is_empty());
        let errors = check(&count, &json!(11));
        assert_eq!(errors[0].kind, FieldErrorKind::Range);
        assert_eq!(errors[0].message, "must be between 1 and 10");

        let floor = field(json!({"name": "count", "widget": "number", "min": 0}));
        assert_eq!(check(&floor, &json!(-1))[0].message, "must be at least 0");
    }

    #[test]
    fn test_int_rejects_fractions() {
        let count = field(json!({"name": "count", "widget": "number", "value_type": "int"}));
        let errors = check(&count, &json!(1.5));
        assert_eq!(errors[0].message, "must be a whole number");
        assert!(check(&count, &json!(2)).is_empty());
    }

    #[test]
    fn test_non_number() {
        let count = field(json!({"name": "count", "widget": "number"}));
        assert_eq!(check(&count, &json!("five"))[0].kind, FieldErrorKind::Invalid);
    }

    #[test]
    fn test_schema_rejects_inverted_bounds() {
        let count = field(json!({"name": "count", "widget": "number", "min": 5, "max": 1}));
        let err = validate_schema(&count).expect_err("inverted");
        assert_eq!(err.message, "min (5) is greater than max (1)");
    }
}
