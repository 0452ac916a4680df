//! Declarative content schema: collections, fields and per-widget options.
//!
//! Field options are a tagged variant with one variant per built-in widget,
//! so a field is checked against its declared widget when the configuration
//! is loaded. Widgets registered by application code land in
//! [`WidgetOptions::Custom`] with their options kept as raw JSON.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::path::FieldPath;
use crate::{CmsError, CmsResult};

/// A field failed to load or does not fit its widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {message}")]
pub struct SchemaError {
    /// Name of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl SchemaError {
    /// Create a schema error for a field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// How a field behaves across locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum I18nMode {
    /// Only present in the default locale.
    #[default]
    None,
    /// Every locale keeps its own value.
    Translate,
    /// Every locale shows the default locale's value.
    Duplicate,
}

/// A `[regex, message]` pair as written in configuration.
pub type Pattern = (String, String);

/// Options shared by the `string` and `text` widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringOptions {
    /// Regex the value must match, with the message shown otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

/// Numeric representation stored by the `number` widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    /// Whole numbers only.
    Int,
    /// Any finite number.
    #[default]
    Float,
}

/// Options for the `number` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberOptions {
    /// Integer or float values.
    #[serde(default)]
    pub value_type: NumberKind,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Input step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Options for the `uuid` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UuidOptions {
    /// Prefix prepended to generated identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Whether the editor offers a "generate new" action.
    #[serde(default = "default_true")]
    pub allow_regenerate: bool,
}

impl Default for UuidOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            allow_regenerate: true,
        }
    }
}

/// Options for the `image` and `file` widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOptions {
    /// Allow several assets in one field.
    #[serde(default)]
    pub multiple: bool,
    /// Allow absolute URLs instead of repository paths.
    #[serde(default = "default_true")]
    pub choose_url: bool,
    /// Folder uploads are written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_folder: Option<String>,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            choose_url: true,
            media_folder: None,
        }
    }
}

/// GeoJSON geometry drawn by the `map` widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    /// A single point.
    #[default]
    Point,
    /// An open line.
    LineString,
    /// A closed polygon.
    Polygon,
}

impl GeometryType {
    /// GeoJSON `type` member for this geometry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
        }
    }
}

/// Options for the `map` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Decimal places kept when writing coordinates.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Geometry the user draws.
    #[serde(default, rename = "type")]
    pub geometry: GeometryType,
    /// CSS height of the map canvas.
    #[serde(default = "default_map_height")]
    pub height: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            geometry: GeometryType::default(),
            height: default_map_height(),
        }
    }
}

/// Options for the `color` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorOptions {
    /// Allow typing a value instead of picking one.
    #[serde(default)]
    pub allow_input: bool,
    /// Accept an alpha channel (`#rrggbbaa`).
    #[serde(default)]
    pub enable_alpha: bool,
}

/// One choice of a `select` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    /// Label and stored value are the same string.
    Plain(String),
    /// Distinct label and stored value.
    Labeled {
        /// Text shown to editors.
        label: String,
        /// Value stored in the entry.
        value: String,
    },
}

impl SelectOption {
    /// Value stored in the entry.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Labeled { value, .. } => value,
        }
    }

    /// Text shown to editors.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Plain(label) | Self::Labeled { label, .. } => label,
        }
    }
}

/// Options for the `select` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOptions {
    /// Allowed choices.
    pub options: Vec<SelectOption>,
    /// Store a list of choices.
    #[serde(default)]
    pub multiple: bool,
    /// Minimum number of choices when `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum number of choices when `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

/// Options for the `datetime` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatetimeOptions {
    /// `strftime` format of the stored value; RFC 3339 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Store the value in UTC.
    #[serde(default)]
    pub picker_utc: bool,
}

/// Options for the `list` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Fields of each item when items are objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSchema>,
    /// Single field describing each item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Box<FieldSchema>>,
    /// Minimum number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum number of items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Template for collapsed item summaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Options for the `object` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectOptions {
    /// Nested fields.
    pub fields: Vec<FieldSchema>,
    /// Start collapsed in the editor.
    #[serde(default)]
    pub collapsed: bool,
}

/// Options for the `relation` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationOptions {
    /// Referenced collection.
    pub collection: String,
    /// Field of the referenced entry stored as the value.
    pub value_field: String,
    /// Fields searched when picking an entry.
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Fields shown for a picked entry; `value_field` when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_fields: Vec<String>,
    /// Store a list of references.
    #[serde(default)]
    pub multiple: bool,
    /// Minimum number of references when `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum number of references when `multiple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

/// Options for the `keyvalue` widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueOptions {
    /// Minimum number of pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum number of pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

/// Widget type and its options.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOptions {
    /// Single-line text.
    String(StringOptions),
    /// Multi-line text.
    Text(StringOptions),
    /// Number input.
    Number(NumberOptions),
    /// Checkbox.
    Boolean,
    /// Generated identifier.
    Uuid(UuidOptions),
    /// Image asset(s).
    Image(FileOptions),
    /// File asset(s).
    File(FileOptions),
    /// GeoJSON geometry.
    Map(MapOptions),
    /// Rich text with shortcodes.
    Markdown,
    /// Hex color.
    Color(ColorOptions),
    /// Fixed choices.
    Select(SelectOptions),
    /// Date and time.
    Datetime(DatetimeOptions),
    /// Repeated items.
    List(ListOptions),
    /// Group of nested fields.
    Object(ObjectOptions),
    /// Reference to entries of another collection.
    Relation(RelationOptions),
    /// Key/value pairs with unique keys.
    KeyValue(KeyValueOptions),
    /// Value kept but never edited.
    Hidden,
    /// Widget registered by application code.
    Custom {
        /// Registered widget type name.
        widget: String,
        /// Raw options.
        options: Map<String, Value>,
        /// Options read as those of the built-in widget this one reuses.
        reused: ReusedOptions,
    },
}

/// Options of a custom widget parsed as the options of the built-in widget
/// whose control it reuses.
///
/// Filled on the first lookup through a registry and kept with the field.
#[derive(Debug, Clone, Default)]
pub struct ReusedOptions(OnceLock<Option<Box<WidgetOptions>>>);

impl ReusedOptions {
    /// The parsed options, running `parse` on first use.
    #[must_use]
    pub fn get_or_init(&self, parse: impl FnOnce() -> Option<WidgetOptions>) -> Option<&WidgetOptions> {
        self.0.get_or_init(|| parse().map(Box::new)).as_deref()
    }
}

// Derived from the raw options, which are compared on their own.
impl PartialEq for ReusedOptions {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl WidgetOptions {
    /// Options of a widget registered by application code.
    #[must_use]
    pub fn custom(widget: impl Into<String>, options: Map<String, Value>) -> Self {
        Self::Custom {
            widget: widget.into(),
            options,
            reused: ReusedOptions::default(),
        }
    }

    /// Build typed options from a widget name and its raw option map.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the options do not fit the widget.
    pub fn from_parts(
        field: &str,
        widget: &str,
        options: Map<String, Value>,
    ) -> Result<Self, SchemaError> {
        fn parse<T: DeserializeOwned>(
            field: &str,
            options: Map<String, Value>,
        ) -> Result<T, SchemaError> {
            serde_json::from_value(Value::Object(options))
                .map_err(|e| SchemaError::new(field, e.to_string()))
        }

        Ok(match widget {
            "string" => Self::String(parse(field, options)?),
            "text" => Self::Text(parse(field, options)?),
            "number" => Self::Number(parse(field, options)?),
            "boolean" => Self::Boolean,
            "uuid" => Self::Uuid(parse(field, options)?),
            "image" => Self::Image(parse(field, options)?),
            "file" => Self::File(parse(field, options)?),
            "map" => Self::Map(parse(field, options)?),
            "markdown" => Self::Markdown,
            "color" => Self::Color(parse(field, options)?),
            "select" => Self::Select(parse(field, options)?),
            "datetime" => Self::Datetime(parse(field, options)?),
            "list" => Self::List(parse(field, options)?),
            "object" => Self::Object(parse(field, options)?),
            "relation" => Self::Relation(parse(field, options)?),
            "keyvalue" => Self::KeyValue(parse(field, options)?),
            "hidden" => Self::Hidden,
            other => Self::custom(other, options),
        })
    }

    /// Registered widget type name.
    #[must_use]
    pub fn widget_name(&self) -> &str {
        match self {
            Self::String(_) => "string",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Boolean => "boolean",
            Self::Uuid(_) => "uuid",
            Self::Image(_) => "image",
            Self::File(_) => "file",
            Self::Map(_) => "map",
            Self::Markdown => "markdown",
            Self::Color(_) => "color",
            Self::Select(_) => "select",
            Self::Datetime(_) => "datetime",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Relation(_) => "relation",
            Self::KeyValue(_) => "keyvalue",
            Self::Hidden => "hidden",
            Self::Custom { widget, .. } => widget,
        }
    }

    fn to_map(&self) -> Map<String, Value> {
        fn map<T: Serialize>(options: &T) -> Map<String, Value> {
            match serde_json::to_value(options) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            }
        }

        match self {
            Self::String(o) | Self::Text(o) => map(o),
            Self::Number(o) => map(o),
            Self::Uuid(o) => map(o),
            Self::Image(o) | Self::File(o) => map(o),
            Self::Map(o) => map(o),
            Self::Color(o) => map(o),
            Self::Select(o) => map(o),
            Self::Datetime(o) => map(o),
            Self::List(o) => map(o),
            Self::Object(o) => map(o),
            Self::Relation(o) => map(o),
            Self::KeyValue(o) => map(o),
            Self::Custom { options, .. } => options.clone(),
            Self::Boolean | Self::Markdown | Self::Hidden => Map::new(),
        }
    }
}

/// Declarative description of one content field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSchema", into = "RawFieldSchema")]
pub struct FieldSchema {
    /// Key of the field in entry data.
    pub name: String,
    /// Label shown to editors.
    pub label: Option<String>,
    /// Help text shown under the control.
    pub hint: Option<String>,
    /// Whether an empty value is a validation error.
    pub required: bool,
    /// Locale behaviour.
    pub i18n: I18nMode,
    /// Value used for new entries.
    pub default: Option<Value>,
    /// Widget type and options.
    pub options: WidgetOptions,
}

impl FieldSchema {
    /// Create a required field.
    pub fn new(name: impl Into<String>, options: WidgetOptions) -> Self {
        Self {
            name: name.into(),
            label: None,
            hint: None,
            required: true,
            i18n: I18nMode::None,
            default: None,
            options,
        }
    }

    /// Mark the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the locale behaviour.
    #[must_use]
    pub fn with_i18n(mut self, i18n: I18nMode) -> Self {
        self.i18n = i18n;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Registered widget type name.
    #[must_use]
    pub fn widget(&self) -> &str {
        self.options.widget_name()
    }

    /// Label, falling back to the field name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Serialize, Deserialize)]
struct RawFieldSchema {
    name: String,
    widget: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default = "default_true")]
    required: bool,
    #[serde(default)]
    i18n: I18nMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(flatten)]
    options: Map<String, Value>,
}

impl TryFrom<RawFieldSchema> for FieldSchema {
    type Error = SchemaError;

    fn try_from(raw: RawFieldSchema) -> Result<Self, Self::Error> {
        let options = WidgetOptions::from_parts(&raw.name, &raw.widget, raw.options)?;
        Ok(Self {
            name: raw.name,
            label: raw.label,
            hint: raw.hint,
            required: raw.required,
            i18n: raw.i18n,
            default: raw.default,
            options,
        })
    }
}

impl From<FieldSchema> for RawFieldSchema {
    fn from(field: FieldSchema) -> Self {
        Self {
            widget: field.widget().to_string(),
            options: field.options.to_map(),
            name: field.name,
            label: field.label,
            hint: field.hint,
            required: field.required,
            i18n: field.i18n,
            default: field.default,
        }
    }
}

/// Find the field addressed by `path`.
///
/// Numeric segments step into list items; for lists of objects the item
/// itself has no schema, so a path ending at the index yields `None`.
#[must_use]
pub fn find_field<'a>(fields: &'a [FieldSchema], path: &FieldPath) -> Option<&'a FieldSchema> {
    find_field_with(fields, path, |field| &field.options)
}

/// [`find_field`] reading each field's options through `options`.
///
/// Used by the registry to step through custom widgets that reuse the
/// `list` or `object` control.
#[must_use]
pub fn find_field_with<'a, F>(
    fields: &'a [FieldSchema],
    path: &FieldPath,
    options: F,
) -> Option<&'a FieldSchema>
where
    F: Fn(&'a FieldSchema) -> &'a WidgetOptions,
{
    let object_fields = |field: &'a FieldSchema| -> &'a [FieldSchema] {
        match options(field) {
            WidgetOptions::Object(object) => &object.fields,
            _ => &[],
        }
    };
    let mut scope = fields;
    let mut current: Option<&'a FieldSchema> = None;

    for segment in path.segments() {
        if let Some(WidgetOptions::List(list)) = current.map(&options) {
            if segment.parse::<usize>().is_ok() {
                match &list.field {
                    Some(item) => {
                        current = Some(item.as_ref());
                        scope = object_fields(item);
                    }
                    None => {
                        current = None;
                        scope = &list.fields;
                    }
                }
                continue;
            }
        }
        let field = scope.iter().find(|f| f.name == segment)?;
        current = Some(field);
        scope = object_fields(field);
    }

    current
}

/// One file of a file collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionFile {
    /// Identifier of the file within the collection.
    pub name: String,
    /// Repository path of the file.
    pub file: String,
    /// Label shown to editors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields of the file.
    pub fields: Vec<FieldSchema>,
}

/// A group of entries sharing one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection identifier.
    pub name: String,
    /// Label shown to editors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Folder holding one file per entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Whether editors may create entries.
    #[serde(default)]
    pub create: bool,
    /// Explicit deletion permission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
    /// Field whose value names new entries.
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,
    /// Fields of folder collection entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSchema>,
    /// Files of a file collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<CollectionFile>,
}

impl Collection {
    /// Create an empty folder collection.
    pub fn folder(name: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            folder: Some(folder.into()),
            create: true,
            delete: None,
            identifier_field: default_identifier_field(),
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Add a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Whether entries live one-per-file in a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Whether editors may create new entries.
    #[must_use]
    pub fn can_create(&self) -> bool {
        self.is_folder() && self.create
    }

    /// Whether editors may delete entries.
    ///
    /// Folder collections allow it unless disabled; file collections only
    /// when explicitly enabled.
    #[must_use]
    pub fn allows_deletion(&self) -> bool {
        if self.is_folder() {
            self.delete.unwrap_or(true)
        } else {
            self.delete.unwrap_or(false)
        }
    }

    /// Fields of an entry, or of one file of a file collection.
    #[must_use]
    pub fn fields_for(&self, file: Option<&str>) -> Option<&[FieldSchema]> {
        match file {
            Some(name) => self
                .files
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.fields.as_slice()),
            None if self.files.is_empty() => Some(&self.fields),
            None => None,
        }
    }
}

/// Locale settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Available locales.
    pub locales: Vec<String>,
    /// Locale edited first; the first listed locale when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
}

impl I18nConfig {
    /// The default locale, if any locales are configured.
    #[must_use]
    pub fn default_locale(&self) -> Option<&str> {
        self.default_locale
            .as_deref()
            .or_else(|| self.locales.first().map(String::as_str))
    }

    /// Every locale except the default one.
    pub fn other_locales(&self) -> impl Iterator<Item = &str> {
        let default = self.default_locale();
        self.locales
            .iter()
            .map(String::as_str)
            .filter(move |l| Some(*l) != default)
    }
}

/// Top-level CMS configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Configured collections.
    pub collections: Vec<Collection>,
    /// Locale settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18nConfig>,
}

impl CmsConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Serialization`] if the JSON is invalid or a field
    /// does not fit its widget.
    pub fn from_json(json: &str) -> CmsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a collection by name.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::CollectionNotFound`] if no collection has that name.
    pub fn collection(&self, name: &str) -> CmsResult<&Collection> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CmsError::CollectionNotFound(name.to_string()))
    }
}

const fn default_true() -> bool {
    true
}

const fn default_decimals() -> u32 {
    7
}

fn default_map_height() -> String {
    "400px".to_string()
}

fn default_identifier_field() -> String {
    "title".to_string()
}
