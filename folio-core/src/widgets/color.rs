//! `color` widget.

use serde_json::Value;

use super::{options_as, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{ColorOptions, FieldSchema, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Hex color picker.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("color", BasicControl(ValueType::String), preview).with_validator(validate)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    match props.value.as_str() {
        Some(value) if !value.is_empty() => PreviewNode::Color {
            value: value.to_string(),
        },
        _ => PreviewNode::Empty,
    }
}

/// Whether `value` is `#rgb` or `#rrggbb`, plus `#rgba` and `#rrggbbaa`
/// when alpha is enabled.
#[must_use]
pub fn is_hex_color(value: &str, enable_alpha: bool) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    let length_ok = match digits.len() {
        3 | 6 => true,
        4 | 8 => enable_alpha,
        _ => false,
    };
    length_ok && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = match options_as(field, "color").as_deref() {
        Some(WidgetOptions::Color(o)) => o.clone(),
        _ => ColorOptions::default(),
    };
    match value.as_str() {
        Some(color) if is_hex_color(color, options.enable_alpha) => Ok(Vec::new()),
        _ => Ok(vec![ErrorEntry::new(
            FieldErrorKind::InvalidColor,
            "must be a hex color",
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{check, field, render};
    use serde_json::json;

    #[test]
    fn test_hex_colors() {
        assert!(is_hex_color("#fff", false));
        assert!(is_hex_color("#A1B2C3", false));
        assert!(!is_hex_color("#A1B2C3FF", false));
        assert!(is_hex_color("#A1B2C3FF", true));
        assert!(!is_hex_color("red", true));
        assert!(!is_hex_color("#ggg", false));
    }

    #[test]
    fn test_validator_kind() {
        let brand = field(json!({"name": "brand", "widget": "color"}));
        assert_eq!(check(&brand, &json!("blue"))[0].kind, FieldErrorKind::InvalidColor);
        assert!(check(&brand, &json!("#123456")).is_empty());
    }

    #[test]
    fn test_preview_swatch() {
        let brand = field(json!({"name": "brand", "widget": "color"}));
        assert_eq!(
            render(&brand, &json!("#fff")),
            PreviewNode::Color { value: "#fff".into() }
        );
    }
}
