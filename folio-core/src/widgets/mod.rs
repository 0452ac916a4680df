//! Built-in widgets.
//!
//! Each submodule exposes the [`WidgetDefinition`]s of one widget family:
//! control value type, preview, value validator and options validator.

use std::borrow::Cow;

use serde_json::Value;

use crate::preview::PreviewNode;
use crate::registry::{Control, PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, SchemaError, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

pub mod boolean;
pub mod color;
pub mod datetime;
pub mod file;
pub mod keyvalue;
pub mod list;
pub mod map;
pub mod markdown;
pub mod number;
pub mod object;
pub mod relation;
pub mod select;
pub mod text;
pub mod uuid;

/// Every built-in widget.
#[must_use]
pub fn builtins() -> Vec<WidgetDefinition> {
    vec![
        text::string(),
        text::text(),
        number::definition(),
        boolean::definition(),
        uuid::definition(),
        file::image(),
        file::file(),
        map::definition(),
        markdown::definition(),
        color::definition(),
        select::definition(),
        datetime::definition(),
        list::definition(),
        object::definition(),
        relation::definition(),
        keyvalue::definition(),
        hidden(),
    ]
}

/// A control with no behaviour beyond its value type.
#[derive(Debug, Clone, Copy)]
pub struct BasicControl(pub ValueType);

impl Control for BasicControl {
    fn value_type(&self) -> ValueType {
        self.0
    }
}

fn hidden() -> WidgetDefinition {
    WidgetDefinition::new("hidden", BasicControl(ValueType::Any), hidden_preview)
}

fn hidden_preview(_: &PreviewProps<'_>) -> PreviewNode {
    PreviewNode::Empty
}

/// Options of `field` read as options of `widget`.
///
/// Fields of widgets that reuse a built-in control carry raw options; they
/// are parsed as the built-in's options here.
pub(crate) fn options_as<'a>(field: &'a FieldSchema, widget: &str) -> Option<Cow<'a, WidgetOptions>> {
    match &field.options {
        WidgetOptions::Custom { options, .. } => {
            WidgetOptions::from_parts(&field.name, widget, options.clone())
                .ok()
                .map(Cow::Owned)
        }
        other => Some(Cow::Borrowed(other)),
    }
}

/// Plain text form of a scalar value.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Range error for an item count outside `min..=max`.
pub(crate) fn count_error(count: usize, min: Option<usize>, max: Option<usize>) -> Option<ErrorEntry> {
    let message = match (min, max) {
        (Some(min), Some(max)) if min == max && count != min => {
            format!("must have exactly {min} item(s)")
        }
        (Some(min), Some(max)) if count < min || count > max => {
            format!("must have between {min} and {max} items")
        }
        (Some(min), None) if count < min => format!("must have at least {min} item(s)"),
        (None, Some(max)) if count > max => format!("must have at most {max} item(s)"),
        _ => return None,
    };
    Some(ErrorEntry::new(FieldErrorKind::Range, message))
}

/// Schema error when `min` exceeds `max`.
pub(crate) fn check_bounds<T: PartialOrd + std::fmt::Display>(
    field: &FieldSchema,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), SchemaError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::new(
            &field.name,
            format!("min ({min}) is greater than max ({max})"),
        )),
        _ => Ok(()),
    }
}

/// Previews of `fields` read from the object `value`, as labelled nodes.
pub(crate) fn render_fields(
    props: &PreviewProps<'_>,
    fields: &[FieldSchema],
    value: &Value,
) -> Vec<PreviewNode> {
    fields
        .iter()
        .map(|field| PreviewNode::Field {
            name: field.name.clone(),
            label: field.display_label().to_string(),
            child: Box::new(props.render_child(field, value.get(&field.name).unwrap_or(&Value::Null))),
        })
        .collect()
}
