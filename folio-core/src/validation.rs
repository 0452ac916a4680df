//! Field validation routing.
//!
//! Each field is validated in a fixed order: the required check first, then
//! the widget's own validator. Errors from both steps accumulate. A widget
//! validator that fails or panics is reported as one generic `invalid` error
//! so a broken validator never takes the editor down.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::path::{self, FieldPath};
use crate::registry::{WidgetDefinition, WidgetRegistry};
use crate::schema::{FieldSchema, WidgetOptions};

/// Category of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field is empty.
    Required,
    /// The value does not match the configured pattern.
    Pattern,
    /// A number or item count is out of bounds.
    Range,
    /// Keys that must be unique are not.
    UniqueKey,
    /// An asset path is not usable.
    InvalidPath,
    /// A color is not a hex color.
    InvalidColor,
    /// Any other problem, including failing validators.
    Invalid,
}

/// One validation error of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error category.
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    /// Message shown to editors.
    pub message: String,
}

impl ErrorEntry {
    /// Create an error.
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error of an empty required field.
    #[must_use]
    pub fn required(field: &FieldSchema) -> Self {
        Self::new(
            FieldErrorKind::Required,
            format!("{} is required.", field.display_label()),
        )
    }

    /// The generic error of a field whose validator failed.
    #[must_use]
    pub fn invalid(field: &FieldSchema) -> Self {
        Self::new(
            FieldErrorKind::Invalid,
            format!("{} is invalid.", field.display_label()),
        )
    }
}

/// Validation errors of an entry, keyed by field path.
///
/// Paths without errors are never stored, so a present key always has a
/// non-empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldsErrors(BTreeMap<FieldPath, Vec<ErrorEntry>>);

impl FieldsErrors {
    /// No errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the errors of `path`. An empty list clears the path.
    pub fn set(&mut self, path: FieldPath, errors: Vec<ErrorEntry>) {
        if errors.is_empty() {
            self.0.remove(&path);
        } else {
            self.0.insert(path, errors);
        }
    }

    /// Errors of `path`, empty when it has none.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> &[ErrorEntry] {
        self.0.get(path).map_or(&[], Vec::as_slice)
    }

    /// Whether `path` has errors.
    #[must_use]
    pub fn has_errors(&self, path: &FieldPath) -> bool {
        self.0.contains_key(path)
    }

    /// Whether no path has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of paths with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Paths and their errors in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[ErrorEntry])> {
        self.0.iter().map(|(path, errors)| (path, errors.as_slice()))
    }

    /// One line per error, `path: message`, joined by `; `.
    #[must_use]
    pub fn summary(&self) -> String {
        self.iter()
            .flat_map(|(path, errors)| errors.iter().map(move |e| format!("{path}: {}", e.message)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Remove every error.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Whether a value counts as empty for the required check.
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Validate one field value.
///
/// Runs the required check, then the widget validator when the value is not
/// empty and a definition is available.
#[must_use]
pub fn validate(
    path: &FieldPath,
    value: Option<&Value>,
    field: &FieldSchema,
    definition: Option<&WidgetDefinition>,
) -> Vec<ErrorEntry> {
    let mut errors = Vec::new();
    let empty = is_empty_value(value);

    if field.required && empty {
        errors.push(ErrorEntry::required(field));
    }

    if let (false, Some(value), Some(definition)) = (empty, value, definition) {
        let outcome = catch_unwind(AssertUnwindSafe(|| (definition.validator)(value, field)));
        match outcome {
            Ok(Ok(found)) => errors.extend(found),
            Ok(Err(reason)) => {
                warn!(path = %path, widget = %definition.type_name, %reason, "Validator failed");
                errors.push(ErrorEntry::invalid(field));
            }
            Err(_) => {
                warn!(path = %path, widget = %definition.type_name, "Validator panicked");
                errors.push(ErrorEntry::invalid(field));
            }
        }
    }

    errors
}

/// Validates whole entries against a registry.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRouter<'r> {
    registry: &'r WidgetRegistry,
}

impl<'r> ValidationRouter<'r> {
    /// Route validation through `registry`.
    #[must_use]
    pub fn new(registry: &'r WidgetRegistry) -> Self {
        Self { registry }
    }

    /// Validate one field value.
    ///
    /// Fields of unregistered widgets only get the required check.
    #[must_use]
    pub fn validate_field(
        &self,
        path: &FieldPath,
        value: Option<&Value>,
        field: &FieldSchema,
    ) -> Vec<ErrorEntry> {
        let definition = self.registry.resolve(field.widget()).ok();
        validate(path, value, field, definition.map(Arc::as_ref))
    }

    /// Validate every field of an entry, nested object and list fields
    /// included, rebuilding the error map from scratch.
    #[must_use]
    pub fn validate_entry(&self, fields: &[FieldSchema], data: &Value) -> FieldsErrors {
        let mut errors = FieldsErrors::new();
        self.validate_fields(&FieldPath::root(), fields, data, &mut errors);
        errors
    }

    fn validate_fields(
        &self,
        base: &FieldPath,
        fields: &[FieldSchema],
        data: &Value,
        errors: &mut FieldsErrors,
    ) {
        for field in fields {
            let field_path = base.join(&field.name);
            self.validate_at(&field_path, field, data, errors);
        }
    }

    fn validate_at(
        &self,
        field_path: &FieldPath,
        field: &FieldSchema,
        data: &Value,
        errors: &mut FieldsErrors,
    ) {
        let value = path::get(data, field_path);
        errors.set(
            field_path.clone(),
            self.validate_field(field_path, value, field),
        );

        match (self.registry.options(field), value) {
            (WidgetOptions::Object(object), Some(Value::Object(_))) => {
                self.validate_fields(field_path, &object.fields, data, errors);
            }
            (WidgetOptions::List(list), Some(Value::Array(items))) => {
                for index in 0..items.len() {
                    let item_path = field_path.join(index);
                    match &list.field {
                        Some(item_field) => self.validate_at(&item_path, item_field, data, errors),
                        None => self.validate_fields(&item_path, &list.fields, data, errors),
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Control, PreviewProps, RegistryBuilder, ValueType};
    use crate::schema::{ListOptions, ObjectOptions, StringOptions};
    use crate::PreviewNode;
    use serde_json::json;

    struct AnyControl;

    impl Control for AnyControl {
        fn value_type(&self) -> ValueType {
            ValueType::Any
        }
    }

    fn no_preview(_: &PreviewProps<'_>) -> PreviewNode {
        PreviewNode::Empty
    }

    fn string_field(name: &str) -> FieldSchema {
        FieldSchema::new(name, WidgetOptions::String(StringOptions::default()))
    }

    // ========================================================================
    // Single field
    // ========================================================================

    #[test]
    fn test_required_empty_values() {
        let field = string_field("title");
        for value in [None, Some(json!(null)), Some(json!("  ")), Some(json!([]))] {
            let errors = validate(&FieldPath::parse("title"), value.as_ref(), &field, None);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].kind, FieldErrorKind::Required);
            assert_eq!(errors[0].message, "title is required.");
        }
    }

    #[test]
    fn test_optional_empty_value_has_no_errors() {
        let field = string_field("title").optional();
        assert!(validate(&FieldPath::parse("title"), None, &field, None).is_empty());
    }

    #[test]
    fn test_validator_error_becomes_invalid() {
        let definition = WidgetDefinition::new("custom", AnyControl, no_preview)
            .with_validator(|_, _| Err("backend unavailable".to_string()));
        let field = string_field("title");
        let errors = validate(
            &FieldPath::parse("title"),
            Some(&json!("x")),
            &field,
            Some(&definition),
        );
        assert_eq!(errors, vec![ErrorEntry::invalid(&field)]);
    }

    #[test]
    fn test_validator_panic_becomes_invalid() {
        let definition = WidgetDefinition::new("custom", AnyControl, no_preview)
            .with_validator(|_, _| panic!("validator bug"));
        let field = string_field("title");
        let errors = validate(
            &FieldPath::parse("title"),
            Some(&json!("x")),
            &field,
            Some(&definition),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, FieldErrorKind::Invalid);
    }

    #[test]
    fn test_validator_errors_accumulate_in_order() {
        let definition = WidgetDefinition::new("custom", AnyControl, no_preview).with_validator(
            |_, _| {
                Ok(vec![
                    ErrorEntry::new(FieldErrorKind::Pattern, "first"),
                    ErrorEntry::new(FieldErrorKind::Range, "second"),
                ])
            },
        );
        let field = string_field("title");
        let errors = validate(
            &FieldPath::parse("title"),
            Some(&json!("x")),
            &field,
            Some(&definition),
        );
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    // ========================================================================
    // Error map
    // ========================================================================

    #[test]
    fn test_fields_errors_never_store_empty_lists() {
        let mut errors = FieldsErrors::new();
        let path = FieldPath::parse("title");
        errors.set(path.clone(), vec![ErrorEntry::new(FieldErrorKind::Invalid, "x")]);
        assert!(errors.has_errors(&path));
        errors.set(path.clone(), Vec::new());
        assert!(!errors.has_errors(&path));
        assert!(errors.is_empty());
        assert!(errors.get(&path).is_empty());
    }

    #[test]
    fn test_summary_lists_paths() {
        let mut errors = FieldsErrors::new();
        errors.set(
            FieldPath::parse("title"),
            vec![ErrorEntry::new(FieldErrorKind::Required, "Title is required.")],
        );
        assert_eq!(errors.summary(), "title: Title is required.");
    }

    #[test]
    fn test_serialized_kind_is_type() {
        let entry = ErrorEntry::new(FieldErrorKind::UniqueKey, "duplicate key 'a'");
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value, json!({"type": "unique_key", "message": "duplicate key 'a'"}));
    }

    // ========================================================================
    // Whole entries
    // ========================================================================

    #[test]
    fn test_validate_entry_reaches_nested_fields() {
        let registry = RegistryBuilder::with_builtins().build().expect("build");
        let router = ValidationRouter::new(&registry);
        let fields = vec![
            string_field("title"),
            FieldSchema::new(
                "authors",
                WidgetOptions::List(ListOptions {
                    fields: vec![string_field("name")],
                    ..ListOptions::default()
                }),
            ),
            FieldSchema::new(
                "seo",
                WidgetOptions::Object(ObjectOptions {
                    fields: vec![string_field("description")],
                    collapsed: false,
                }),
            ),
        ];
        let data = json!({
            "title": "Hello",
            "authors": [{"name": "Ada"}, {"name": ""}],
            "seo": {}
        });

        let errors = router.validate_entry(&fields, &data);
        let paths: Vec<&str> = errors.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["authors.1.name", "seo", "seo.description"]);
    }

    #[test]
    fn test_validate_entry_single_field_list() {
        let registry = RegistryBuilder::with_builtins().build().expect("build");
        let router = ValidationRouter::new(&registry);
        let fields = vec![FieldSchema::new(
            "tags",
            WidgetOptions::List(ListOptions {
                field: Some(Box::new(string_field("tag"))),
                ..ListOptions::default()
            }),
        )];
        let errors = router.validate_entry(&fields, &json!({"tags": ["a", ""]}));
        assert!(errors.has_errors(&FieldPath::parse("tags.1")));
        assert!(!errors.has_errors(&FieldPath::parse("tags.0")));
    }
}
