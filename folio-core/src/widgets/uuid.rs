//! `uuid` widget.
//!
//! Generates an identifier when the field is mounted without a valid one.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{options_as, scalar_text};
use crate::preview::PreviewNode;
use crate::registry::{Control, PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, UuidOptions, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

fn options(field: &FieldSchema) -> UuidOptions {
    match options_as(field, "uuid").as_deref() {
        Some(WidgetOptions::Uuid(o)) => o.clone(),
        _ => UuidOptions::default(),
    }
}

/// Whether `value` is a UUID, optionally behind the configured prefix.
#[must_use]
pub fn is_valid(value: &str, prefix: Option<&str>) -> bool {
    let bare = prefix
        .and_then(|p| value.strip_prefix(p))
        .unwrap_or(value);
    Uuid::parse_str(bare).is_ok()
}

/// A new identifier with the configured prefix.
#[must_use]
pub fn generate(options: &UuidOptions) -> String {
    format!(
        "{}{}",
        options.prefix.as_deref().unwrap_or_default(),
        Uuid::new_v4()
    )
}

struct UuidControl;

impl Control for UuidControl {
    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn on_mount(&self, field: &FieldSchema, value: &Value) -> Option<Value> {
        let options = options(field);
        match value.as_str() {
            Some(current) if is_valid(current, options.prefix.as_deref()) => None,
            _ => {
                let generated = generate(&options);
                debug!(field = %field.name, uuid = %generated, "Generated identifier on mount");
                Some(Value::String(generated))
            }
        }
    }

    fn regenerate(&self, field: &FieldSchema) -> Option<Value> {
        let options = options(field);
        options
            .allow_regenerate
            .then(|| Value::String(generate(&options)))
    }
}

/// Generated identifier.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("uuid", UuidControl, preview).with_validator(validate)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    PreviewNode::text(scalar_text(props.value))
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = options(field);
    match value.as_str() {
        Some(id) if is_valid(id, options.prefix.as_deref()) => Ok(Vec::new()),
        _ => Ok(vec![ErrorEntry::new(
            FieldErrorKind::Pattern,
            "must be a valid UUID",
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{check, field};
    use serde_json::json;

    #[test]
    fn test_mount_generates_prefixed_uuid() {
        let id = field(json!({"name": "id", "widget": "uuid", "prefix": "post-"}));
        let generated = UuidControl.on_mount(&id, &Value::Null).expect("generated");
        let generated = generated.as_str().expect("string");
        assert!(generated.starts_with("post-"));
        assert!(is_valid(generated, Some("post-")));
    }

    #[test]
    fn test_mount_keeps_valid_value() {
        let id = field(json!({"name": "id", "widget": "uuid"}));
        let existing = json!(Uuid::new_v4().to_string());
        assert!(UuidControl.on_mount(&id, &existing).is_none());
        assert!(UuidControl.on_mount(&id, &json!("not-a-uuid")).is_some());
    }

    #[test]
    fn test_regenerate_respects_option() {
        let locked = field(json!({"name": "id", "widget": "uuid", "allow_regenerate": false}));
        assert!(UuidControl.regenerate(&locked).is_none());
        let open = field(json!({"name": "id", "widget": "uuid"}));
        assert!(UuidControl.regenerate(&open).is_some());
    }

    #[test]
    fn test_validator() {
        let id = field(json!({"name": "id", "widget": "uuid"}));
        assert!(check(&id, &json!(Uuid::new_v4().to_string())).is_empty());
        let errors = check(&id, &json!("1234"));
        assert_eq!(errors[0].message, "must be a valid UUID");
    }
}
