//! `boolean` widget.

use serde_json::Value;

use crate::preview::PreviewNode;
use crate::registry::{Control, PreviewProps, ValueType, WidgetDefinition};
use crate::schema::FieldSchema;

struct BooleanControl;

impl Control for BooleanControl {
    fn value_type(&self) -> ValueType {
        ValueType::Boolean
    }

    fn default_value(&self, field: &FieldSchema) -> Value {
        field.default.clone().unwrap_or(Value::Bool(false))
    }
}

/// Checkbox. New entries start unchecked.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("boolean", BooleanControl, preview)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    let checked = props.value.as_bool().unwrap_or(false);
    PreviewNode::text(if checked { "Yes" } else { "No" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{field, render};
    use serde_json::json;

    #[test]
    fn test_default_is_false() {
        let draft = field(json!({"name": "draft", "widget": "boolean"}));
        assert_eq!(definition().default_value(&draft), json!(false));
        let featured = field(json!({"name": "featured", "widget": "boolean", "default": true}));
        assert_eq!(definition().default_value(&featured), json!(true));
    }

    #[test]
    fn test_preview() {
        let draft = field(json!({"name": "draft", "widget": "boolean"}));
        assert_eq!(render(&draft, &json!(true)), PreviewNode::text("Yes"));
        assert_eq!(render(&draft, &Value::Null), PreviewNode::text("No"));
    }
}
