//! Widget registry.
//!
//! Maps widget type names to their control, preview and validators, and
//! holds the per-collection preview templates, cards, field preview
//! overrides, shortcodes and additional links.
//!
//! Registration happens on a [`RegistryBuilder`] during startup. The builder
//! is then frozen into an immutable [`WidgetRegistry`], either owned by the
//! caller or installed once as the process-wide registry read through
//! [`global`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::path::FieldPath;
use crate::preview::PreviewNode;
use crate::resolver::PreviewContext;
use crate::schema::{
    find_field_with, CmsConfig, Collection, FieldSchema, I18nMode, SchemaError, WidgetOptions,
};
use crate::shortcode::{ShortcodeDefinition, Shortcodes};
use crate::validation::ErrorEntry;
use crate::{CmsError, CmsResult};

static GLOBAL: OnceLock<WidgetRegistry> = OnceLock::new();

/// The installed process-wide registry, if any.
#[must_use]
pub fn global() -> Option<&'static WidgetRegistry> {
    GLOBAL.get()
}

/// Kind of value a control may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// An array.
    List,
    /// An object.
    Object,
    /// A string, or an array when the field allows several values.
    StringOrList,
    /// Anything.
    Any,
}

impl ValueType {
    /// Whether `value` has this type. `null` (a cleared field) always matches.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
            Self::StringOrList => value.is_string() || value.is_array(),
            Self::Any => true,
        }
    }
}

/// Everything a control receives when it is mounted for a field.
#[derive(Debug, Clone)]
pub struct ControlProps<'a> {
    /// Path of the field in the entry.
    pub path: FieldPath,
    /// Field schema.
    pub field: &'a FieldSchema,
    /// Current value in the draft.
    pub value: Value,
    /// Validation errors of the field.
    pub errors: Vec<ErrorEntry>,
    /// Whether `errors` is non-empty.
    pub has_errors: bool,
    /// Editing is disabled.
    pub disabled: bool,
    /// The control is the single field of a list item.
    pub for_single_list: bool,
    /// The control edits a non-default locale of a duplicated field.
    pub duplicate: bool,
    /// The value is owned by the caller.
    pub controlled: bool,
    /// Locale being edited.
    pub locale: Option<String>,
}

impl<'a> ControlProps<'a> {
    /// Props for an uncontrolled, enabled control without errors.
    #[must_use]
    pub fn new(path: FieldPath, field: &'a FieldSchema, value: Value) -> Self {
        Self {
            path,
            field,
            value,
            errors: Vec::new(),
            has_errors: false,
            disabled: false,
            for_single_list: false,
            duplicate: false,
            controlled: false,
            locale: None,
        }
    }

    /// Whether the control mirrors the external value instead of buffering.
    ///
    /// Duplicated i18n fields are always controlled in non-default locales.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.controlled || (self.field.i18n == I18nMode::Duplicate && self.duplicate)
    }
}

/// Editing behaviour of a widget.
pub trait Control: Send + Sync {
    /// Type of the values this control emits.
    fn value_type(&self) -> ValueType;

    /// Value of the field in a new entry.
    fn default_value(&self, field: &FieldSchema) -> Value {
        field.default.clone().unwrap_or(Value::Null)
    }

    /// Replacement for the initial value, propagated right after mount.
    fn on_mount(&self, _field: &FieldSchema, _value: &Value) -> Option<Value> {
        None
    }

    /// A freshly generated value, for controls that offer one.
    fn regenerate(&self, _field: &FieldSchema) -> Option<Value> {
        None
    }
}

/// Read access available to previews while rendering.
pub trait PreviewEnv {
    /// Registry used to render nested fields and shortcodes.
    fn registry(&self) -> &WidgetRegistry;

    /// Resolved URL of an asset path, if it has been resolved.
    fn asset_url(&self, path: &str) -> Option<Url>;
}

/// Environment for rendering outside an editor session. No assets resolve.
#[derive(Debug, Clone, Copy)]
pub struct DetachedEnv<'a> {
    registry: &'a WidgetRegistry,
}

impl<'a> DetachedEnv<'a> {
    /// Render against `registry` only.
    #[must_use]
    pub fn new(registry: &'a WidgetRegistry) -> Self {
        Self { registry }
    }
}

impl PreviewEnv for DetachedEnv<'_> {
    fn registry(&self) -> &WidgetRegistry {
        self.registry
    }

    fn asset_url(&self, _path: &str) -> Option<Url> {
        None
    }
}

/// Input of a widget preview.
#[derive(Clone, Copy)]
pub struct PreviewProps<'a> {
    /// Field value.
    pub value: &'a Value,
    /// Field schema.
    pub field: &'a FieldSchema,
    /// Rendering environment.
    pub env: &'a dyn PreviewEnv,
}

impl PreviewProps<'_> {
    /// Resolved URL of an asset path.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> Option<Url> {
        self.env.asset_url(path)
    }

    /// Render a nested field with its registered preview.
    #[must_use]
    pub fn render_child(&self, field: &FieldSchema, value: &Value) -> PreviewNode {
        render_field(self.env, field, value)
    }
}

/// Read-only rendering of a field value.
pub trait Preview: Send + Sync {
    /// Render the value.
    fn render(&self, props: &PreviewProps<'_>) -> PreviewNode;
}

impl<F> Preview for F
where
    F: Fn(&PreviewProps<'_>) -> PreviewNode + Send + Sync,
{
    fn render(&self, props: &PreviewProps<'_>) -> PreviewNode {
        self(props)
    }
}

/// Render `value` with the preview registered for the field's widget.
#[must_use]
pub fn render_field(env: &dyn PreviewEnv, field: &FieldSchema, value: &Value) -> PreviewNode {
    match env.registry().resolve(field.widget()) {
        Ok(definition) => definition.preview.render(&PreviewProps { value, field, env }),
        Err(_) => preview_fallback(field.widget()),
    }
}

/// Node shown in place of a preview for an unregistered widget.
#[must_use]
pub fn preview_fallback(widget: &str) -> PreviewNode {
    PreviewNode::fallback(format!("No preview for widget '{widget}'"))
}

/// Message shown in place of a control for an unregistered widget.
#[must_use]
pub fn control_fallback(widget: &str) -> String {
    format!("No control for widget '{widget}'")
}

/// Whole-entry preview for a collection.
pub trait PreviewTemplate: Send + Sync {
    /// Render the entry.
    fn render(&self, context: &PreviewContext<'_>) -> PreviewNode;
}

impl<F> PreviewTemplate for F
where
    F: Fn(&PreviewContext<'_>) -> PreviewNode + Send + Sync,
{
    fn render(&self, context: &PreviewContext<'_>) -> PreviewNode {
        self(context)
    }
}

type CardHeight = dyn Fn(&Value) -> u32 + Send + Sync;

/// Compact entry preview shown in collection listings.
#[derive(Clone)]
pub struct PreviewCard {
    /// Card template.
    pub template: Arc<dyn PreviewTemplate>,
    height: Arc<CardHeight>,
}

impl PreviewCard {
    /// Height in pixels of the card for an entry.
    #[must_use]
    pub fn height(&self, data: &Value) -> u32 {
        (self.height)(data)
    }
}

/// Where an additional link points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// External URL.
    Url(Url),
    /// Custom page rendered by the application.
    Page(String),
}

/// Display options of an additional link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOptions {
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Extra navigation entry shown next to the collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalLink {
    /// Unique identifier.
    pub id: String,
    /// Link title.
    pub title: String,
    /// Link target.
    pub data: LinkTarget,
    /// Display options.
    #[serde(default)]
    pub options: LinkOptions,
}

/// Validates a field value; `Err` is reported as a generic `invalid` error.
pub type FieldValidator =
    dyn Fn(&Value, &FieldSchema) -> Result<Vec<ErrorEntry>, String> + Send + Sync;

/// Validates a field's options against its widget.
pub type SchemaValidator = dyn Fn(&FieldSchema) -> Result<(), SchemaError> + Send + Sync;

/// A registered widget.
#[derive(Clone)]
pub struct WidgetDefinition {
    /// Unique widget type name.
    pub type_name: String,
    /// Editing behaviour.
    pub control: Arc<dyn Control>,
    /// Read-only rendering.
    pub preview: Arc<dyn Preview>,
    /// Value validator.
    pub validator: Arc<FieldValidator>,
    /// Options validator.
    pub schema_validator: Arc<SchemaValidator>,
    /// Built-in widget whose control and options this widget reuses.
    pub base: Option<String>,
}

impl WidgetDefinition {
    /// Create a definition with no value or options validation.
    pub fn new(
        type_name: impl Into<String>,
        control: impl Control + 'static,
        preview: impl Preview + 'static,
    ) -> Self {
        Self::from_parts(type_name, Arc::new(control), Arc::new(preview))
    }

    /// Create a definition from shared parts.
    pub fn from_parts(
        type_name: impl Into<String>,
        control: Arc<dyn Control>,
        preview: Arc<dyn Preview>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            control,
            preview,
            validator: Arc::new(no_value_errors),
            schema_validator: Arc::new(any_options),
            base: None,
        }
    }

    /// Set the value validator.
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &FieldSchema) -> Result<Vec<ErrorEntry>, String> + Send + Sync + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    /// Set the options validator.
    #[must_use]
    pub fn with_schema_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FieldSchema) -> Result<(), SchemaError> + Send + Sync + 'static,
    {
        self.schema_validator = Arc::new(validator);
        self
    }

    /// Type of the values the control emits.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.control.value_type()
    }

    /// Value of the field in a new entry.
    #[must_use]
    pub fn default_value(&self, field: &FieldSchema) -> Value {
        self.control.default_value(field)
    }
}

#[allow(clippy::unnecessary_wraps)]
fn no_value_errors(_: &Value, _: &FieldSchema) -> Result<Vec<ErrorEntry>, String> {
    Ok(Vec::new())
}

#[allow(clippy::unnecessary_wraps)]
fn any_options(_: &FieldSchema) -> Result<(), SchemaError> {
    Ok(())
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("type_name", &self.type_name)
            .field("value_type", &self.value_type())
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// A registration replaced an earlier one under the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRegistrationWarning {
    /// What was registered: `widget` or `shortcode`.
    pub kind: &'static str,
    /// The duplicated name.
    pub name: String,
}

impl fmt::Display for DuplicateRegistrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' registered more than once; the last registration wins",
            self.kind, self.name
        )
    }
}

/// Immutable set of registered widgets and preview extensions.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, Arc<WidgetDefinition>>,
    templates: HashMap<String, Arc<dyn PreviewTemplate>>,
    cards: HashMap<String, PreviewCard>,
    field_previews: HashMap<(String, String), Arc<dyn Preview>>,
    shortcodes: Shortcodes,
    links: Vec<AdditionalLink>,
}

impl WidgetRegistry {
    /// Register a widget, replacing any earlier one with the same name.
    pub fn register(&mut self, definition: WidgetDefinition) -> Option<DuplicateRegistrationWarning> {
        let name = definition.type_name.clone();
        let replaced = self.widgets.insert(name.clone(), Arc::new(definition));
        replaced.map(|_| {
            let warning = DuplicateRegistrationWarning {
                kind: "widget",
                name,
            };
            warn!("{warning}");
            warning
        })
    }

    /// Look up a widget.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::UnknownWidget`] if nothing is registered under
    /// `type_name`.
    pub fn resolve(&self, type_name: &str) -> CmsResult<&Arc<WidgetDefinition>> {
        self.widgets
            .get(type_name)
            .ok_or_else(|| CmsError::UnknownWidget(type_name.to_string()))
    }

    /// Options of `field` as seen when walking nested fields.
    ///
    /// Fields of a widget that reuses a built-in control read as that
    /// built-in's options, so a custom `list` has items and a custom
    /// `relation` has a target. Other fields are returned as declared.
    #[must_use]
    pub fn options<'f>(&self, field: &'f FieldSchema) -> &'f WidgetOptions {
        let WidgetOptions::Custom {
            widget,
            options,
            reused,
        } = &field.options
        else {
            return &field.options;
        };
        let Some(base) = self.widgets.get(widget).and_then(|d| d.base.as_deref()) else {
            return &field.options;
        };
        reused
            .get_or_init(|| WidgetOptions::from_parts(&field.name, base, options.clone()).ok())
            .unwrap_or(&field.options)
    }

    /// Find the field addressed by `path`, stepping through custom widgets
    /// that reuse the `list` or `object` control.
    #[must_use]
    pub fn find_field<'f>(&self, fields: &'f [FieldSchema], path: &FieldPath) -> Option<&'f FieldSchema> {
        find_field_with(fields, path, |field: &'f FieldSchema| self.options(field))
    }

    /// Whether a widget is registered under `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.widgets.contains_key(type_name)
    }

    /// Registered widget names, sorted.
    #[must_use]
    pub fn widget_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.widgets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Preview template of a collection.
    #[must_use]
    pub fn template(&self, collection: &str) -> Option<&Arc<dyn PreviewTemplate>> {
        self.templates.get(collection)
    }

    /// Preview card of a collection.
    #[must_use]
    pub fn card(&self, collection: &str) -> Option<&PreviewCard> {
        self.cards.get(collection)
    }

    /// Preview override of one field of a collection.
    #[must_use]
    pub fn field_preview(&self, collection: &str, field: &str) -> Option<&Arc<dyn Preview>> {
        self.field_previews
            .get(&(collection.to_string(), field.to_string()))
    }

    /// Registered shortcodes.
    #[must_use]
    pub fn shortcodes(&self) -> &Shortcodes {
        &self.shortcodes
    }

    /// Additional navigation links, in registration order.
    #[must_use]
    pub fn additional_links(&self) -> &[AdditionalLink] {
        &self.links
    }

    /// Check every field of a collection against its widget.
    ///
    /// Returns all problems found; an empty list means the collection is
    /// usable.
    #[must_use]
    pub fn validate_schema(&self, collection: &Collection) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        self.check_fields(&collection.fields, &mut errors);
        for file in &collection.files {
            self.check_fields(&file.fields, &mut errors);
        }
        errors
    }

    /// Check every collection, plus relation targets.
    #[must_use]
    pub fn validate_config(&self, config: &CmsConfig) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        for collection in &config.collections {
            errors.extend(self.validate_schema(collection));
            let files = collection.files.iter().flat_map(|f| f.fields.iter());
            for field in collection.fields.iter().chain(files) {
                self.check_relation_targets(config, field, &mut errors);
            }
        }
        errors
    }

    fn check_fields(&self, fields: &[FieldSchema], errors: &mut Vec<SchemaError>) {
        for field in fields {
            match self.resolve(field.widget()) {
                Ok(definition) => {
                    if let (WidgetOptions::Custom { options, .. }, Some(base)) =
                        (&field.options, definition.base.as_deref())
                    {
                        if let Err(e) = WidgetOptions::from_parts(&field.name, base, options.clone()) {
                            errors.push(e);
                        }
                    }
                    if let Err(e) = (definition.schema_validator)(field) {
                        errors.push(e);
                    }
                }
                Err(_) => errors.push(SchemaError::new(
                    &field.name,
                    format!("no widget registered for type '{}'", field.widget()),
                )),
            }
            match self.options(field) {
                WidgetOptions::Object(object) => self.check_fields(&object.fields, errors),
                WidgetOptions::List(list) => {
                    self.check_fields(&list.fields, errors);
                    if let Some(item) = &list.field {
                        self.check_fields(std::slice::from_ref(item.as_ref()), errors);
                    }
                }
                _ => {}
            }
        }
    }

    fn check_relation_targets(&self, config: &CmsConfig, field: &FieldSchema, errors: &mut Vec<SchemaError>) {
        match self.options(field) {
            WidgetOptions::Relation(relation) if config.collection(&relation.collection).is_err() => {
                errors.push(SchemaError::new(
                    &field.name,
                    format!("relation target collection '{}' does not exist", relation.collection),
                ));
            }
            WidgetOptions::Object(object) => {
                for child in &object.fields {
                    self.check_relation_targets(config, child, errors);
                }
            }
            WidgetOptions::List(list) => {
                for child in list.fields.iter().chain(list.field.as_deref()) {
                    self.check_relation_targets(config, child, errors);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets", &self.widget_names())
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("cards", &self.cards.keys().collect::<Vec<_>>())
            .field("shortcodes", &self.shortcodes.names().collect::<Vec<_>>())
            .field("links", &self.links.len())
            .finish_non_exhaustive()
    }
}

/// Control given to [`RegistryBuilder::register_widget`].
#[derive(Clone)]
pub enum ControlSource {
    /// Reuse the control and validators of an already registered widget.
    Reuse(String),
    /// A dedicated control implementation.
    Control(Arc<dyn Control>),
}

impl ControlSource {
    /// Wrap a control implementation.
    pub fn control(control: impl Control + 'static) -> Self {
        Self::Control(Arc::new(control))
    }
}

impl From<&str> for ControlSource {
    fn from(name: &str) -> Self {
        Self::Reuse(name.to_string())
    }
}

impl From<String> for ControlSource {
    fn from(name: String) -> Self {
        Self::Reuse(name)
    }
}

impl From<Arc<dyn Control>> for ControlSource {
    fn from(control: Arc<dyn Control>) -> Self {
        Self::Control(control)
    }
}

struct PendingReuse {
    type_name: String,
    control_name: String,
    preview: Arc<dyn Preview>,
}

/// Collects registrations during startup.
#[derive(Default)]
pub struct RegistryBuilder {
    registry: WidgetRegistry,
    pending: Vec<PendingReuse>,
}

impl RegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder holding the built-in widgets and shortcodes.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for definition in crate::widgets::builtins() {
            builder.register(definition);
        }
        if let Err(e) = builder
            .registry
            .shortcodes
            .insert("youtube", crate::shortcode::youtube())
        {
            warn!("Built-in shortcode skipped: {e}");
        }
        builder
    }

    /// Register a full widget definition.
    pub fn register(&mut self, definition: WidgetDefinition) -> Option<DuplicateRegistrationWarning> {
        debug!(widget = %definition.type_name, "Registering widget");
        self.registry.register(definition)
    }

    /// Register a widget from a control and a preview.
    ///
    /// A [`ControlSource::Reuse`] name is resolved when the registry is
    /// built, so it may refer to a widget registered later.
    pub fn register_widget(
        &mut self,
        type_name: impl Into<String>,
        control: impl Into<ControlSource>,
        preview: impl Preview + 'static,
    ) -> Option<DuplicateRegistrationWarning> {
        let type_name = type_name.into();
        match control.into() {
            ControlSource::Control(control) => {
                self.register(WidgetDefinition::from_parts(type_name, control, Arc::new(preview)))
            }
            ControlSource::Reuse(control_name) => {
                self.pending.push(PendingReuse {
                    type_name,
                    control_name,
                    preview: Arc::new(preview),
                });
                None
            }
        }
    }

    /// Register the whole-entry preview of a collection.
    pub fn register_preview_template(
        &mut self,
        collection: impl Into<String>,
        template: impl PreviewTemplate + 'static,
    ) {
        self.registry
            .templates
            .insert(collection.into(), Arc::new(template));
    }

    /// Register the listing card of a collection.
    pub fn register_preview_card<H>(
        &mut self,
        collection: impl Into<String>,
        template: impl PreviewTemplate + 'static,
        height: H,
    ) where
        H: Fn(&Value) -> u32 + Send + Sync + 'static,
    {
        self.registry.cards.insert(
            collection.into(),
            PreviewCard {
                template: Arc::new(template),
                height: Arc::new(height),
            },
        );
    }

    /// Override the preview of one field of a collection.
    pub fn register_field_preview(
        &mut self,
        collection: impl Into<String>,
        field: impl Into<String>,
        preview: impl Preview + 'static,
    ) {
        self.registry
            .field_previews
            .insert((collection.into(), field.into()), Arc::new(preview));
    }

    /// Register a shortcode, replacing any earlier one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Shortcode`] if the definition's tags cannot form
    /// a pattern.
    pub fn register_shortcode(
        &mut self,
        name: impl Into<String>,
        definition: ShortcodeDefinition,
    ) -> CmsResult<Option<DuplicateRegistrationWarning>> {
        let name = name.into();
        let replaced = self.registry.shortcodes.insert(name.clone(), definition)?;
        Ok(replaced.map(|_| {
            let warning = DuplicateRegistrationWarning {
                kind: "shortcode",
                name,
            };
            warn!("{warning}");
            warning
        }))
    }

    /// Add a navigation link, replacing one with the same id.
    pub fn register_additional_link(&mut self, link: AdditionalLink) {
        if let Some(existing) = self.registry.links.iter_mut().find(|l| l.id == link.id) {
            warn!(id = %link.id, "Additional link registered more than once");
            *existing = link;
        } else {
            self.registry.links.push(link);
        }
    }

    /// Freeze the registrations.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::UnknownControl`] if a widget reuses a control that
    /// was never registered.
    pub fn build(mut self) -> CmsResult<WidgetRegistry> {
        for pending in std::mem::take(&mut self.pending) {
            let base = Arc::clone(
                self.registry
                    .resolve(&pending.control_name)
                    .map_err(|_| CmsError::UnknownControl(pending.control_name.clone()))?,
            );
            self.registry.register(WidgetDefinition {
                type_name: pending.type_name,
                control: Arc::clone(&base.control),
                preview: pending.preview,
                validator: Arc::clone(&base.validator),
                schema_validator: Arc::clone(&base.schema_validator),
                base: Some(base.base.clone().unwrap_or_else(|| base.type_name.clone())),
            });
        }
        Ok(self.registry)
    }

    /// Freeze the registrations into the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::RegistryAlreadyInstalled`] on a second install,
    /// or any error of [`RegistryBuilder::build`].
    pub fn install(self) -> CmsResult<&'static WidgetRegistry> {
        let registry = self.build()?;
        if GLOBAL.set(registry).is_err() {
            warn!("Widget registry already installed; ignoring second install");
            return Err(CmsError::RegistryAlreadyInstalled);
        }
        GLOBAL.get().ok_or(CmsError::RegistryAlreadyInstalled)
    }
}
