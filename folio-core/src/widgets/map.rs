//! `map` widget.
//!
//! Stores one GeoJSON geometry as a string. Coordinates are rounded to the
//! configured number of decimals when the user finishes drawing.

use serde_json::{Number, Value};
use tracing::warn;

use super::{options_as, BasicControl};
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};
use crate::schema::{FieldSchema, MapOptions, WidgetOptions};
use crate::validation::{ErrorEntry, FieldErrorKind};

const MAX_DECIMALS: u32 = 15;

/// GeoJSON map.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("map", BasicControl(ValueType::String), preview).with_validator(validate)
}

fn options(field: &FieldSchema) -> MapOptions {
    match options_as(field, "map").as_deref() {
        Some(WidgetOptions::Map(o)) => o.clone(),
        _ => MapOptions::default(),
    }
}

/// Serialise a drawn geometry with rounded coordinates.
///
/// Returns `None` when the control is disabled or the geometry cannot be
/// serialised.
#[must_use]
pub fn finish_drawing(geometry: &Value, options: &MapOptions, disabled: bool) -> Option<String> {
    if disabled {
        return None;
    }
    let mut geometry = geometry.clone();
    if let Some(coordinates) = geometry.get_mut("coordinates") {
        round_coordinates(coordinates, options.decimals);
    }
    serde_json::to_string(&geometry)
        .map_err(|e| warn!("Failed to serialise geometry: {e}"))
        .ok()
}

fn round_coordinates(value: &mut Value, decimals: u32) {
    match value {
        Value::Array(items) => {
            for item in items {
                round_coordinates(item, decimals);
            }
        }
        Value::Number(n) => {
            if let Some(rounded) = n.as_f64().and_then(|x| Number::from_f64(round(x, decimals))) {
                *n = rounded;
            }
        }
        _ => {}
    }
}

fn round(x: f64, decimals: u32) -> f64 {
    let exponent = i32::try_from(decimals.min(MAX_DECIMALS)).unwrap_or(0);
    let factor = 10f64.powi(exponent);
    (x * factor).round() / factor
}

/// Parse a stored geometry, written as a string or an object.
#[must_use]
pub fn parse_geometry(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) => serde_json::from_str(text).ok(),
        Value::Object(_) => Some(value.clone()),
        _ => None,
    }
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    match parse_geometry(props.value) {
        Some(geometry) => PreviewNode::Map {
            geometry,
            height: options(props.field).height,
        },
        None => PreviewNode::Empty,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn validate(value: &Value, field: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    let expected = options(field).geometry.as_str();
    let matches = parse_geometry(value).is_some_and(|geometry| {
        geometry.get("type").and_then(Value::as_str) == Some(expected)
            && geometry.get("coordinates").is_some_and(Value::is_array)
    });
    if matches {
        Ok(Vec::new())
    } else {
        Ok(vec![ErrorEntry::new(
            FieldErrorKind::Invalid,
            format!("must be a GeoJSON {expected}"),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GeometryType;
    use crate::widgets::test_support::{check, field, render};
    use serde_json::json;

    #[test]
    fn test_finish_drawing_rounds_to_default_decimals() {
        let geometry = json!({"type": "Point", "coordinates": [13.404_953_712_3, 52.520_006_599_9]});
        let written = finish_drawing(&geometry, &MapOptions::default(), false).expect("written");
        let parsed: Value = serde_json::from_str(&written).expect("json");
        assert_eq!(parsed["coordinates"], json!([13.404_953_7, 52.520_006_6]));
    }

    #[test]
    fn test_finish_drawing_nested_coordinates() {
        let options = MapOptions {
            decimals: 1,
            geometry: GeometryType::LineString,
            ..MapOptions::default()
        };
        let geometry = json!({"type": "LineString", "coordinates": [[1.26, 2.24], [3.35, 4.0]]});
        let written = finish_drawing(&geometry, &options, false).expect("written");
        let parsed: Value = serde_json::from_str(&written).expect("json");
        assert_eq!(parsed["coordinates"], json!([[1.3, 2.2], [3.4, 4.0]]));
    }

    #[test]
    fn test_finish_drawing_disabled() {
        let geometry = json!({"type": "Point", "coordinates": [0.0, 0.0]});
        assert!(finish_drawing(&geometry, &MapOptions::default(), true).is_none());
    }

    #[test]
    fn test_validator_checks_geometry_type() {
        let location = field(json!({"name": "location", "widget": "map"}));
        assert!(check(&location, &json!(r#"{"type":"Point","coordinates":[1,2]}"#)).is_empty());
        let errors = check(
            &location,
            &json!(r#"{"type":"Polygon","coordinates":[[[0,0],[1,1],[0,1],[0,0]]]}"#),
        );
        assert_eq!(errors[0].message, "must be a GeoJSON Point");
        assert_eq!(check(&location, &json!("not json"))[0].kind, FieldErrorKind::Invalid);
    }

    #[test]
    fn test_preview_uses_height() {
        let location = field(json!({"name": "location", "widget": "map", "height": "250px"}));
        let node = render(&location, &json!(r#"{"type":"Point","coordinates":[1,2]}"#));
        assert_eq!(
            node,
            PreviewNode::Map {
                geometry: json!({"type": "Point", "coordinates": [1, 2]}),
                height: "250px".into()
            }
        );
    }
}
