//! `image` and `file` widgets.
//!
//! Values are repository paths (or URLs when allowed), a single string or a
//! list when the field accepts several assets. Previews show resolved URLs.

use serde_json::Value;
use url::Url;

use super::{count_error, options_as, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FileOptions, FieldSchema, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

/// Image asset(s).
#[must_use]
pub fn image() -> WidgetDefinition {
    WidgetDefinition::new("image", BasicControl(ValueType::StringOrList), image_preview)
        .with_validator(|value, field| validate("image", value, field))
}

/// File asset(s).
#[must_use]
pub fn file() -> WidgetDefinition {
    WidgetDefinition::new("file", BasicControl(ValueType::StringOrList), file_preview)
        .with_validator(|value, field| validate("file", value, field))
}

/// Asset paths held by a value: one string or an array of strings.
#[must_use]
pub fn asset_paths(value: &Value) -> Vec<&str> {
    match value {
        Value::String(path) if !path.is_empty() => vec![path.as_str()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn resolved(props: &PreviewProps<'_>, path: &str) -> String {
    props
        .asset_url(path)
        .map_or_else(|| path.to_string(), |url| url.to_string())
}

fn image_preview(props: &PreviewProps<'_>) -> PreviewNode {
    let sources: Vec<String> = asset_paths(props.value)
        .into_iter()
        .map(|path| resolved(props, path))
        .collect();
    if sources.is_empty() {
        PreviewNode::Empty
    } else {
        PreviewNode::Image { sources }
    }
}

fn file_preview(props: &PreviewProps<'_>) -> PreviewNode {
    let links: Vec<PreviewNode> = asset_paths(props.value)
        .into_iter()
        .map(|path| PreviewNode::Link {
            href: resolved(props, path),
            text: path.rsplit('/').next().unwrap_or(path).to_string(),
        })
        .collect();
    match links.len() {
        0 => PreviewNode::Empty,
        1 => links.into_iter().next().unwrap_or(PreviewNode::Empty),
        _ => PreviewNode::container(links),
    }
}

fn is_url(path: &str) -> bool {
    Url::parse(path).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn path_error(path: &str, options: &FileOptions) -> Option<&'static str> {
    if path.trim().is_empty() {
        Some("must not be empty")
    } else if is_url(path) {
        (!options.choose_url).then_some("must be a repository path, not a URL")
    } else if path.contains('\\') {
        Some("must use forward slashes")
    } else if path.split('/').any(|segment| segment == "..") {
        Some("must not leave the media folder")
    } else {
        None
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(widget: &str, value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let options = match options_as(field, widget).as_deref() {
        Some(WidgetOptions::Image(o) | WidgetOptions::File(o)) => o.clone(),
        _ => FileOptions::default(),
    };

    let mut errors = Vec::new();
    let items: Vec<&Value> = match value {
        Value::Array(items) => {
            let max = (!options.multiple).then_some(1);
            errors.extend(count_error(items.len(), None, max));
            items.iter().collect()
        }
        single => vec![single],
    };

    for item in items {
        let message = match item.as_str() {
            Some(path) => path_error(path, &options),
            None => Some("must be a path"),
        };
        if let Some(message) = message {
            errors.push(ErrorEntry::new(FieldErrorKind::InvalidPath, message));
        }
    }
    Ok(errors)
}
