//! The entry being edited.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::path::{self, FieldPath};
use crate::validation::FieldsErrors;

/// Working copy of one entry.
///
/// Holds the default-locale data, per-locale data for the other locales and
/// the errors of the last validation pass. Publishing makes the current data
/// the new baseline; discarding restores the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDraft {
    collection: String,
    slug: Option<String>,
    data: Value,
    i18n: BTreeMap<String, Value>,
    fields_errors: FieldsErrors,
    has_changed: bool,
    #[serde(skip)]
    baseline: (Value, BTreeMap<String, Value>),
}

impl EntryDraft {
    /// Draft of an entry that has not been published yet.
    #[must_use]
    pub fn new(collection: impl Into<String>, data: Value) -> Self {
        Self::from_parts(collection.into(), None, data)
    }

    /// Draft of a published entry.
    #[must_use]
    pub fn existing(collection: impl Into<String>, slug: impl Into<String>, data: Value) -> Self {
        Self::from_parts(collection.into(), Some(slug.into()), data)
    }

    fn from_parts(collection: String, slug: Option<String>, data: Value) -> Self {
        let data = if data.is_null() {
            Value::Object(Map::new())
        } else {
            data
        };
        Self {
            collection,
            slug,
            baseline: (data.clone(), BTreeMap::new()),
            data,
            i18n: BTreeMap::new(),
            fields_errors: FieldsErrors::new(),
            has_changed: false,
        }
    }

    /// Add the stored data of another locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>, data: Value) -> Self {
        let locale = locale.into();
        self.baseline.1.insert(locale.clone(), data.clone());
        self.i18n.insert(locale, data);
        self
    }

    /// Collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Slug, once published.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Whether the entry has never been published.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.slug.is_none()
    }

    /// Default-locale data.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Data of a non-default locale.
    #[must_use]
    pub fn locale_data(&self, locale: &str) -> Option<&Value> {
        self.i18n.get(locale)
    }

    /// Locales with their own data.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.i18n.keys().map(String::as_str)
    }

    /// Value at a path of the default-locale data.
    #[must_use]
    pub fn get(&self, field_path: &FieldPath) -> Option<&Value> {
        path::get(&self.data, field_path)
    }

    /// Errors of the last validation pass.
    #[must_use]
    pub fn fields_errors(&self) -> &FieldsErrors {
        &self.fields_errors
    }

    /// Whether the data differs from the last published or loaded state.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Write a default-locale value. Returns whether anything changed.
    pub fn set(&mut self, field_path: &FieldPath, value: Value) -> bool {
        if path::get(&self.data, field_path) == Some(&value) {
            return false;
        }
        path::set(&mut self.data, field_path, value);
        self.has_changed = true;
        true
    }

    /// Write a value of another locale. Returns whether anything changed.
    pub fn set_localized(&mut self, locale: &str, field_path: &FieldPath, value: Value) -> bool {
        let data = self
            .i18n
            .entry(locale.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if path::get(data, field_path) == Some(&value) {
            return false;
        }
        path::set(data, field_path, value);
        self.has_changed = true;
        true
    }

    /// Replace the errors with those of a fresh validation pass.
    pub fn set_errors(&mut self, errors: FieldsErrors) {
        self.fields_errors = errors;
    }

    /// Make the current data the baseline after a publish.
    pub fn mark_published(&mut self, slug: impl Into<String>) {
        self.slug = Some(slug.into());
        self.baseline = (self.data.clone(), self.i18n.clone());
        self.fields_errors.clear();
        self.has_changed = false;
    }

    /// Throw away every edit since the baseline.
    pub fn discard(&mut self) {
        self.data = self.baseline.0.clone();
        self.i18n = self.baseline.1.clone();
        self.fields_errors.clear();
        self.has_changed = false;
    }
}
