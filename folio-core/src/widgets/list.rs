//! `list` widget.
//!
//! Items are either objects described by `fields`, or single values
//! described by `field`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{check_bounds, count_error, options_as, render_fields, scalar_text, BasicControl};
use crate::path::{self, FieldPath};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, ListOptions, SchemaError, WidgetOptions};
use crate::validation::ErrorEntry;

/// Repeated items.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("list", BasicControl(ValueType::List), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

fn options(field: &FieldSchema) -> ListOptions {
    match options_as(field, "list").as_deref() {
        Some(WidgetOptions::List(o)) => o.clone(),
        _ => ListOptions::default(),
    }
}

static SUMMARY_PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*fields\.([\w.]+)\s*\}\}").ok());

/// Fill a summary template such as `{{fields.name}} ({{fields.role}})`
/// from one list item.
#[must_use]
pub fn summarize(template: &str, item: &Value) -> String {
    let Some(placeholder) = SUMMARY_PLACEHOLDER.as_ref() else {
        return template.to_string();
    };
    placeholder
        .replace_all(template, |caps: &regex::Captures<'_>| {
            path::get(item, &FieldPath::parse(&caps[1]))
                .map(scalar_text)
                .unwrap_or_default()
        })
        .into_owned()
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let Value::Array(items) = props.value else {
        return PreviewNode::Empty;
    };
    let options = options(props.field);
    let children = items
        .iter()
        .map(|item| match &options.field {
            Some(item_field) => props.render_child(item_field, item),
            None => PreviewNode::Container {
                label: options.summary.as_deref().map(|s| summarize(s, item)),
                children: render_fields(props, &options.fields, item),
            },
        })
        .collect();
    PreviewNode::Container {
        label: Some(props.field.display_label().to_string()),
        children,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let Value::Array(items) = value else {
        return Ok(vec![ErrorEntry::invalid(field)]);
    };
    let options = options(field);
    Ok(count_error(items.len(), options.min, options.max).into_iter().collect())
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    let options = options(field);
    if options.field.is_some() && !options.fields.is_empty() {
        return Err(SchemaError::new(
            &field.name,
            "list takes either `field` or `fields`, not both",
        ));
    }
    check_bounds(field, options.min, options.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldErrorKind;
    use crate::widgets::test_support::{check, field, render};
    use serde_json::json;

    fn authors() -> FieldSchema {
        field(json!({
            "name": "authors",
            "widget": "list",
            "min": 1,
            "max": 2,
            "summary": "{{fields.name}} ({{ fields.role }})",
            "fields": [
                {"name": "name", "widget": "string"},
                {"name": "role", "widget": "string"}
            ]
        }))
    }

    #[test]
    fn test_summary_template() {
        let item = json!({"name": "Ada", "role": "editor"});
        assert_eq!(summarize("{{fields.name}} ({{ fields.role }})", &item), "Ada (editor)");
        assert_eq!(summarize("{{fields.missing}}!", &item), "!");
    }

    #[test]
    fn test_count_bounds() {
        let errors = check(&authors(), &json!([{}, {}, {}]));
        assert_eq!(errors[0].kind, FieldErrorKind::Range);
        assert_eq!(errors[0].message, "must have between 1 and 2 items");
    }

    #[test]
    fn test_non_array_value_is_invalid() {
        let errors = check(&authors(), &json!({"0": {"name": "Ada"}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FieldErrorKind::Invalid);
        assert_eq!(errors[0].message, "authors is invalid.");
    }

    #[test]
    fn test_preview_items() {
        let node = render(&authors(), &json!([{"name": "Ada", "role": "editor"}]));
        let PreviewNode::Container { children, .. } = node else {
            panic!("Expected container");
        };
        assert_eq!(children.len(), 1);
        assert!(matches!(
            &children[0],
            PreviewNode::Container { label: Some(label), .. } if label == "Ada (editor)"
        ));
        assert_eq!(children[0].text_content(), "Adaeditor");
    }

    #[test]
    fn test_schema_rejects_field_and_fields() {
        let both = field(json!({
            "name": "x",
            "widget": "list",
            "field": {"name": "y", "widget": "string"},
            "fields": [{"name": "z", "widget": "string"}]
        }));
        assert!(validate_schema(&both).is_err());
    }
}
