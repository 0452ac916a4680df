//! `object` widget.

use super::{options_as, render_fields, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, SchemaError, WidgetOptions};

/// Group of nested fields.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("object", BasicControl(ValueType::Object), preview)
        .with_schema_validator(validate_schema)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let Some(WidgetOptions::Object(options)) = options_as(props.field, "object").as_deref().cloned()
    else {
        return PreviewNode::Empty;
    };
    if !props.value.is_object() {
        return PreviewNode::Empty;
    }
    PreviewNode::Container {
        label: Some(props.field.display_label().to_string()),
        children: render_fields(props, &options.fields, props.value),
    }
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    match options_as(field, "object").as_deref() {
        Some(WidgetOptions::Object(o)) if o.fields.is_empty() => {
            Err(SchemaError::new(&field.name, "object needs at least one field"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{field, render};
    use serde_json::{json, Value};

    #[test]
    fn test_preview_renders_nested_fields() {
        let seo = field(json!({
            "name": "seo",
            "label": "SEO",
            "widget": "object",
            "fields": [
                {"name": "title", "widget": "string"},
                {"name": "noindex", "widget": "boolean"}
            ]
        }));
        let node = render(&seo, &json!({"title": "Hello", "noindex": true}));
        match node {
            PreviewNode::Container { label, children } => {
                assert_eq!(label.as_deref(), Some("SEO"));
                assert_eq!(children.len(), 2);
                assert_eq!(node_text(&children), "HelloYes");
            }
            other => panic!("Expected container, got {other:?}"),
        }
    }

    fn node_text(children: &[PreviewNode]) -> String {
        children.iter().map(PreviewNode::text_content).collect()
    }

    #[test]
    fn test_preview_of_missing_value() {
        let seo = field(json!({
            "name": "seo",
            "widget": "object",
            "fields": [{"name": "title", "widget": "string"}]
        }));
        assert!(render(&seo, &Value::Null).is_empty());
    }
}
