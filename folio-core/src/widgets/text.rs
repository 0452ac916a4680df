//! `string` and `text` widgets.

use regex::Regex;
use serde_json::Value;

use super::{options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Single-line text.
#[must_use]
pub fn string() -> WidgetDefinition {
    definition("string")
}

/// Multi-line text.
#[must_use]
pub fn text() -> WidgetDefinition {
    definition("text")
}

fn definition(name: &'static str) -> WidgetDefinition {
    WidgetDefinition::new(name, BasicControl(ValueType::String), preview)
        .with_validator(move |value, field| validate(name, value, field))
        .with_schema_validator(move |field| validate_schema(name, field))
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    PreviewNode::text(scalar_text(props.value))
}

fn pattern(widget: &str, field: &FieldSchema) -> Option<(String, String)> {
    match options_as(field, widget).as_deref() {
        Some(WidgetOptions::String(o) | WidgetOptions::Text(o)) => o.pattern.clone(),
        _ => None,
    }
}

fn validate(widget: &str, value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let Some((source, message)) = pattern(widget, field) else {
        return Ok(Vec::new());
    };
    let regex = Regex::new(&source).map_err(|e| e.to_string())?;
    if regex.is_match(&scalar_text(value)) {
        Ok(Vec::new())
    } else {
        Ok(vec![ErrorEntry::new(FieldErrorKind::Pattern, message)])
    }
}

fn validate_schema(widget: &str, field: &FieldSchema) -> Result<(), SchemaError> {
    match pattern(widget, field) {
        Some((source, _)) => Regex::new(&source)
            .map(|_| ())
            .map_err(|e| SchemaError::new(&field.name, format!("invalid pattern: {e}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{check, field, registry, render};
    use serde_json::json;

    #[test]
    fn test_pattern_mismatch() {
        let slug = field(json!({
            "name": "slug",
            "widget": "string",
            "pattern": ["^[a-z-]+$", "Lowercase letters and dashes only"]
        }));
        assert!(check(&slug, &json!("hello-world")).is_empty());
        let errors = check(&slug, &json!("Hello World"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FieldErrorKind::Pattern);
        assert_eq!(errors[0].message, "Lowercase letters and dashes only");
    }

    #[test]
    fn test_invalid_pattern_rejected_by_schema() {
        let bad = field(json!({
            "name": "body",
            "widget": "text",
            "pattern": ["(unclosed", "never"]
        }));
        let registry = registry();
        let definition = registry.resolve("text").expect("registered");
        assert!((definition.schema_validator)(&bad).is_err());
        assert!((definition.validator)(&json!("x"), &bad).is_err());
    }

    #[test]
    fn test_preview_is_text() {
        let title = field(json!({"name": "title", "widget": "string"}));
        assert_eq!(render(&title, &json!("Hello")), PreviewNode::text("Hello"));
    }
}
