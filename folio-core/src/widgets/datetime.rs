//! `datetime` widget.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use super::{options_as, scalar_text, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{DatetimeOptions, FieldSchema, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Date and time picker.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("datetime", BasicControl(ValueType::String), preview)
        .with_validator(validate)
        .with_schema_validator(validate_schema)
}

fn options(field: &FieldSchema) -> DatetimeOptions {
    match options_as(field, "datetime").as_deref() {
        Some(WidgetOptions::Datetime(o)) => o.clone(),
        _ => DatetimeOptions::default(),
    }
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    PreviewNode::text(scalar_text(props.value))
}

/// Whether `value` matches `format`, or is RFC 3339 when no format is set.
///
/// A format may describe a date, a time, or both.
#[must_use]
pub fn parses(value: &str, format: Option<&str>) -> bool {
    match format {
        Some(format) => {
            NaiveDateTime::parse_from_str(value, format).is_ok()
                || NaiveDate::parse_from_str(value, format).is_ok()
                || NaiveTime::parse_from_str(value, format).is_ok()
        }
        None => DateTime::parse_from_rfc3339(value).is_ok(),
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = options(field);
    let format = options.format.as_deref();
    if value.as_str().is_some_and(|v| parses(v, format)) {
        return Ok(Vec::new());
    }
    let message = match format {
        Some(format) => format!("must be a date matching '{format}'"),
        None => "must be an RFC 3339 date".to_string(),
    };
    Ok(vec![ErrorEntry::new(FieldErrorKind::Invalid, message)])
}

fn validate_schema(field: &FieldSchema) -> Result<(), SchemaError> {
    match options(field).format {
        Some(format) if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) => Err(
            SchemaError::new(&field.name, format!("invalid date format '{format}'")),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{check, field};
    use serde_json::json;

    #[test]
    fn test_rfc3339_by_default() {
        let published = field(json!({"name": "date", "widget": "datetime"}));
        assert!(check(&published, &json!("2024-05-01T10:00:00Z")).is_empty());
        let errors = check(&published, &json!("May 1st"));
        assert_eq!(errors[0].message, "must be an RFC 3339 date");
    }

    #[test]
    fn test_custom_format_date_only() {
        let day = field(json!({"name": "day", "widget": "datetime", "format": "%Y-%m-%d"}));
        assert!(check(&day, &json!("2024-05-01")).is_empty());
        assert_eq!(
            check(&day, &json!("01/05/2024"))[0].message,
            "must be a date matching '%Y-%m-%d'"
        );
    }

    #[test]
    fn test_schema_rejects_bad_format() {
        let broken = field(json!({"name": "day", "widget": "datetime", "format": "%Y-%"}));
        assert!(validate_schema(&broken).is_err());
    }
}
