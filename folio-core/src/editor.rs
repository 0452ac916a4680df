//! Editor session.
//!
//! An [`EditorSession`] owns the [`EntryDraft`] of one entry. Controls send
//! their propagated values here; every change re-runs validation so that
//! publish eligibility and the toolbar always reflect the current draft.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::draft::EntryDraft;
use crate::path::FieldPath;
use crate::reconcile::{Propagation, ValueController};
use crate::registry::{ControlProps, WidgetRegistry};
use crate::resolver::PreviewContext;
use crate::schema::{CmsConfig, Collection, FieldSchema, I18nMode};
use crate::validation::{FieldsErrors, ValidationRouter};
use crate::widgets::scalar_text;
use crate::{CmsError, CmsResult};

/// Toolbar action offered for the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Publish the draft.
    PublishNow,
    /// Publish, then open a new empty entry.
    PublishAndCreateNew,
    /// Publish, then open a copy of the entry.
    PublishAndDuplicate,
    /// Open a copy of the published entry.
    Duplicate,
}

/// Toolbar contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    /// Whether the draft matches a published entry.
    pub is_published: bool,
    /// Offered actions.
    pub actions: Vec<ToolbarAction>,
    /// Whether the entry may be deleted.
    pub can_delete: bool,
}

/// An entry written by a publish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Published {
    /// Collection name.
    pub collection: String,
    /// Entry slug.
    pub slug: String,
    /// Whether the entry was created by this publish.
    pub created: bool,
    /// Default-locale data.
    pub data: Value,
}

/// Editing state of one entry.
pub struct EditorSession<'r> {
    registry: &'r WidgetRegistry,
    config: &'r CmsConfig,
    collection: &'r Collection,
    fields: &'r [FieldSchema],
    draft: EntryDraft,
}

impl<'r> EditorSession<'r> {
    /// Open a new entry filled with the widgets' default values.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::CollectionNotFound`] for an unknown collection.
    pub fn open_new(
        registry: &'r WidgetRegistry,
        config: &'r CmsConfig,
        collection: &str,
    ) -> CmsResult<Self> {
        let collection = config.collection(collection)?;
        let mut data = Map::new();
        for field in &collection.fields {
            let Ok(definition) = registry.resolve(field.widget()) else {
                continue;
            };
            let value = definition.default_value(field);
            if !value.is_null() {
                data.insert(field.name.clone(), value);
            }
        }
        let data = Value::Object(data);

        let mut draft = EntryDraft::new(&collection.name, data.clone());
        if let Some(i18n) = &config.i18n {
            for locale in i18n.other_locales() {
                draft = draft.with_locale(locale, data.clone());
            }
        }
        debug!(collection = %collection.name, "Opened new entry");
        Ok(Self::with_draft(registry, config, collection, &collection.fields, draft))
    }

    /// Open a published entry. For file collections `slug` names the file.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::CollectionNotFound`] for an unknown collection
    /// and [`CmsError::FieldNotFound`] for an unknown file.
    pub fn open_existing(
        registry: &'r WidgetRegistry,
        config: &'r CmsConfig,
        collection: &str,
        slug: &str,
        data: Value,
    ) -> CmsResult<Self> {
        let collection = config.collection(collection)?;
        let fields = if collection.is_folder() {
            collection.fields.as_slice()
        } else {
            collection
                .fields_for(Some(slug))
                .ok_or_else(|| CmsError::FieldNotFound(slug.to_string()))?
        };
        debug!(collection = %collection.name, slug, "Opened entry");
        let draft = EntryDraft::existing(&collection.name, slug, data);
        Ok(Self::with_draft(registry, config, collection, fields, draft))
    }

    fn with_draft(
        registry: &'r WidgetRegistry,
        config: &'r CmsConfig,
        collection: &'r Collection,
        fields: &'r [FieldSchema],
        draft: EntryDraft,
    ) -> Self {
        Self {
            registry,
            config,
            collection,
            fields,
            draft,
        }
    }

    /// Add stored data of a non-default locale.
    #[must_use]
    pub fn with_locale(mut self, locale: &str, data: Value) -> Self {
        self.draft = self.draft.with_locale(locale, data);
        self
    }

    /// The draft.
    #[must_use]
    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    /// The collection being edited.
    #[must_use]
    pub fn collection(&self) -> &'r Collection {
        self.collection
    }

    /// Props for mounting the control of a field.
    ///
    /// `locale` selects a non-default locale; duplicated fields are then
    /// controlled mirrors of the default locale.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::FieldNotFound`] if the path names no field.
    pub fn control_props(&self, field_path: &FieldPath, locale: Option<&str>) -> CmsResult<ControlProps<'r>> {
        let field = self.field(field_path)?;
        let locale = locale.filter(|l| Some(*l) != self.default_locale());
        let data = match locale {
            Some(locale) => self.draft.locale_data(locale),
            None => Some(self.draft.data()),
        };
        let value = data
            .and_then(|data| crate::path::get(data, field_path))
            .cloned()
            .unwrap_or(Value::Null);

        let mut props = ControlProps::new(field_path.clone(), field, value);
        props.errors = self.draft.fields_errors().get(field_path).to_vec();
        props.has_errors = !props.errors.is_empty();
        props.duplicate = locale.is_some() && self.is_duplicated(field_path);
        props.locale = locale.map(str::to_string);
        Ok(props)
    }

    /// A controller for the control of a field.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::FieldNotFound`] for an unknown path and
    /// [`CmsError::UnknownWidget`] if the field's widget is not registered.
    pub fn controller(&self, field_path: &FieldPath, locale: Option<&str>) -> CmsResult<ValueController> {
        let props = self.control_props(field_path, locale)?;
        let definition = self.registry.resolve(props.field.widget())?;
        Ok(ValueController::new(definition, &props))
    }

    /// Mount the control of every top-level field, applying values that
    /// mount hooks replace.
    pub fn mount(&mut self) -> Vec<Propagation> {
        let mut propagations = Vec::new();
        let fields = self.fields;
        for field in fields {
            let Ok(mut controller) = self.controller(&FieldPath::parse(&field.name), None) else {
                continue;
            };
            if let Some(propagation) = controller.mount() {
                propagations.push(propagation);
            }
        }
        for propagation in &propagations {
            self.on_change(propagation.clone());
        }
        propagations
    }

    /// Apply a propagated default-locale value and revalidate.
    ///
    /// Values of duplicated i18n fields are copied to every other locale.
    pub fn on_change(&mut self, propagation: Propagation) {
        let Propagation { path, value } = propagation;
        if self.is_duplicated(&path) {
            let locales: Vec<String> = self.draft.locales().map(str::to_string).collect();
            for locale in locales {
                self.draft.set_localized(&locale, &path, value.clone());
            }
        }
        if self.draft.set(&path, value) {
            debug!(path = %path, "Draft updated");
        }
        self.validate();
    }

    /// Apply a propagated value of `locale` and revalidate.
    ///
    /// Duplicated fields are owned by the default locale and ignore
    /// localized writes.
    pub fn on_change_localized(&mut self, locale: &str, propagation: Propagation) {
        if Some(locale) == self.default_locale() {
            self.on_change(propagation);
            return;
        }
        if self.is_duplicated(&propagation.path) {
            debug!(path = %propagation.path, locale, "Ignoring write to duplicated field");
            return;
        }
        self.draft
            .set_localized(locale, &propagation.path, propagation.value);
        self.validate();
    }

    /// Rebuild the draft's errors.
    pub fn validate(&mut self) -> &FieldsErrors {
        let errors = ValidationRouter::new(self.registry).validate_entry(self.fields, self.draft.data());
        self.draft.set_errors(errors);
        self.draft.fields_errors()
    }

    /// Whether the draft may be published.
    pub fn is_publish_eligible(&mut self) -> bool {
        self.validate().is_empty()
    }

    /// Publish the draft.
    ///
    /// New entries take their slug from the collection's identifier field.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::PublishBlocked`] while any field has errors, and
    /// [`CmsError::FieldNotFound`] if a new entry has no identifier value.
    pub fn publish(&mut self) -> CmsResult<Published> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(CmsError::PublishBlocked {
                summary: errors.summary(),
            });
        }

        let created = self.draft.is_new();
        let slug = match self.draft.slug() {
            Some(slug) => slug.to_string(),
            None => self.new_slug()?,
        };
        self.draft.mark_published(&slug);
        info!(collection = %self.collection.name, %slug, created, "Published entry");
        Ok(Published {
            collection: self.collection.name.clone(),
            slug,
            created,
            data: self.draft.data().clone(),
        })
    }

    /// Throw away unpublished edits.
    pub fn discard(&mut self) {
        debug!(collection = %self.collection.name, "Discarding draft");
        self.draft.discard();
    }

    /// Toolbar for the current draft.
    ///
    /// Publish actions are offered only for new or changed entries.
    #[must_use]
    pub fn toolbar(&self) -> ToolbarState {
        let is_published = !self.draft.is_new() && !self.draft.has_changed();
        let can_create = self.collection.can_create();
        let actions = match (is_published, can_create) {
            (false, true) => vec![
                ToolbarAction::PublishNow,
                ToolbarAction::PublishAndCreateNew,
                ToolbarAction::PublishAndDuplicate,
            ],
            (false, false) => vec![ToolbarAction::PublishNow],
            (true, true) => vec![ToolbarAction::Duplicate],
            (true, false) => Vec::new(),
        };
        ToolbarState {
            is_published,
            actions,
            can_delete: !self.draft.is_new() && self.collection.allows_deletion(),
        }
    }

    /// Preview context over the draft.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::CollectionNotFound`] if the collection left the
    /// configuration.
    pub fn preview(&self) -> CmsResult<PreviewContext<'_>> {
        let context = PreviewContext::new(self.registry, self.config, &self.collection.name, self.draft.data())?;
        match self.draft.slug() {
            Some(file) if !self.collection.is_folder() => context.for_file(file),
            _ => Ok(context),
        }
    }

    fn default_locale(&self) -> Option<&'r str> {
        self.config.i18n.as_ref().and_then(|i18n| i18n.default_locale())
    }

    fn field(&self, field_path: &FieldPath) -> CmsResult<&'r FieldSchema> {
        self.registry
            .find_field(self.fields, field_path)
            .ok_or_else(|| CmsError::FieldNotFound(field_path.to_string()))
    }

    // i18n mode is set on top-level fields and covers everything below them.
    fn is_duplicated(&self, field_path: &FieldPath) -> bool {
        let Some(name) = field_path.segments().next() else {
            return false;
        };
        self.fields
            .iter()
            .find(|f| f.name == name)
            .is_some_and(|f| f.i18n == I18nMode::Duplicate)
    }

    fn new_slug(&self) -> CmsResult<String> {
        let identifier = &self.collection.identifier_field;
        let text = self
            .draft
            .get(&FieldPath::parse(identifier))
            .map(scalar_text)
            .unwrap_or_default();
        let slug = slugify(&text);
        if slug.is_empty() {
            return Err(CmsError::FieldNotFound(identifier.clone()));
        }
        Ok(slug)
    }
}

/// Lowercase slug: runs of Unicode alphanumerics joined by `-`.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::validation::FieldErrorKind;
    use serde_json::json;

    fn config() -> CmsConfig {
        CmsConfig::from_json(
            r#"{
                "i18n": {"locales": ["en", "de"], "default_locale": "en"},
                "collections": [
                    {"name": "posts", "folder": "content/posts", "create": true, "fields": [
                        {"name": "title", "label": "Title", "widget": "string", "i18n": "translate"},
                        {"name": "id", "widget": "uuid", "prefix": "post-", "i18n": "duplicate"},
                        {"name": "draft", "widget": "boolean", "required": false},
                        {"name": "rating", "widget": "number", "min": 1, "max": 5, "required": false,
                         "i18n": "duplicate"}
                    ]},
                    {"name": "settings", "files": [
                        {"name": "site", "file": "site.json", "fields": [
                            {"name": "title", "widget": "string"}
                        ]}
                    ]}
                ]
            }"#,
        )
        .expect("config")
    }

    fn registry() -> WidgetRegistry {
        RegistryBuilder::with_builtins().build().expect("build")
    }

    fn change(path: &str, value: Value) -> Propagation {
        Propagation {
            path: FieldPath::parse(path),
            value,
        }
    }

    // ========================================================================
    // Opening & mounting
    // ========================================================================

    #[test]
    fn test_open_new_uses_widget_defaults() {
        let (registry, config) = (registry(), config());
        let session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        assert_eq!(session.draft().data()["draft"], json!(false));
        assert!(session.draft().is_new());
        assert!(session.draft().locale_data("de").is_some());
    }

    #[test]
    fn test_open_unknown_collection() {
        let (registry, config) = (registry(), config());
        assert!(matches!(
            EditorSession::open_new(&registry, &config, "pages"),
            Err(CmsError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_mount_generates_uuid_in_every_locale() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        let propagations = session.mount();
        assert_eq!(propagations.len(), 1);
        assert_eq!(propagations[0].path, FieldPath::parse("id"));

        let id = session.draft().data()["id"].as_str().expect("id").to_string();
        assert!(id.starts_with("post-"));
        assert_eq!(session.draft().locale_data("de").expect("de")["id"], json!(id));
    }

    #[test]
    fn test_duplicate_fields_are_controlled_in_other_locales() {
        let (registry, config) = (registry(), config());
        let session = EditorSession::open_new(&registry, &config, "posts").expect("open");

        let props = session
            .control_props(&FieldPath::parse("rating"), Some("de"))
            .expect("props");
        assert!(props.duplicate);
        assert!(props.is_controlled());

        let default = session
            .control_props(&FieldPath::parse("rating"), Some("en"))
            .expect("props");
        assert!(!default.is_controlled());

        let translated = session
            .control_props(&FieldPath::parse("title"), Some("de"))
            .expect("props");
        assert!(!translated.is_controlled());
        assert!(session.control_props(&FieldPath::parse("nope"), None).is_err());
    }

    // ========================================================================
    // Changes & validation
    // ========================================================================

    #[test]
    fn test_on_change_revalidates() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        session.mount();
        assert!(!session.is_publish_eligible());
        assert!(session
            .draft()
            .fields_errors()
            .has_errors(&FieldPath::parse("title")));

        session.on_change(change("rating", json!(9)));
        let errors = session.draft().fields_errors().get(&FieldPath::parse("rating"));
        assert_eq!(errors[0].kind, FieldErrorKind::Range);

        session.on_change(change("title", json!("Hello World")));
        session.on_change(change("rating", json!(4)));
        assert!(session.is_publish_eligible());
        assert!(session.draft().has_changed());
    }

    #[test]
    fn test_localized_writes() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        session.on_change_localized("de", change("title", json!("Hallo")));
        session.on_change_localized("de", change("rating", json!(2)));
        session.on_change(change("rating", json!(3)));

        let de = session.draft().locale_data("de").expect("de");
        assert_eq!(de["title"], json!("Hallo"));
        assert_eq!(de["rating"], json!(3));
        assert_eq!(session.draft().data().get("title"), None);
    }

    // ========================================================================
    // Publishing & toolbar
    // ========================================================================

    #[test]
    fn test_publish_blocked_lists_paths() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        let Err(CmsError::PublishBlocked { summary }) = session.publish() else {
            panic!("Expected PublishBlocked");
        };
        assert!(summary.contains("title: Title is required."), "{summary}");
    }

    #[test]
    fn test_publish_new_entry_and_toolbar() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        session.mount();
        session.on_change(change("title", json!("Hello, World!")));

        let toolbar = session.toolbar();
        assert!(!toolbar.is_published);
        assert_eq!(
            toolbar.actions,
            vec![
                ToolbarAction::PublishNow,
                ToolbarAction::PublishAndCreateNew,
                ToolbarAction::PublishAndDuplicate
            ]
        );
        assert!(!toolbar.can_delete);

        let published = session.publish().expect("publish");
        assert_eq!(published.slug, "hello-world");
        assert!(published.created);

        let toolbar = session.toolbar();
        assert!(toolbar.is_published);
        assert_eq!(toolbar.actions, vec![ToolbarAction::Duplicate]);
        assert!(toolbar.can_delete);
    }

    #[test]
    fn test_discard_restores_published_state() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_existing(
            &registry,
            &config,
            "posts",
            "hello",
            json!({"title": "Hello", "id": "post-6f1b0a52-7c3e-4b8e-9d2a-1f0e3c5b7a90"}),
        )
        .expect("open");
        session.on_change(change("title", json!("")));
        assert!(session.draft().has_changed());
        session.discard();
        assert_eq!(session.draft().data()["title"], json!("Hello"));
        assert!(session.toolbar().is_published);
    }

    #[test]
    fn test_file_collection_toolbar() {
        let (registry, config) = (registry(), config());
        let mut session =
            EditorSession::open_existing(&registry, &config, "settings", "site", json!({})).expect("open");
        session.on_change(change("title", json!("Site")));
        let toolbar = session.toolbar();
        assert_eq!(toolbar.actions, vec![ToolbarAction::PublishNow]);
        assert!(!toolbar.can_delete);
    }

    #[test]
    fn test_preview_reads_draft() {
        let (registry, config) = (registry(), config());
        let mut session = EditorSession::open_new(&registry, &config, "posts").expect("open");
        session.on_change(change("title", json!("Live")));
        let preview = session.preview().expect("preview");
        assert_eq!(
            preview.widget_for("title"),
            Some(crate::preview::PreviewNode::text("Live"))
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Hello, World! "), "hello-world");
        assert_eq!(slugify("Ünïcode 2"), "ünïcode-2");
        assert_eq!(slugify("!!!"), "");
    }
}
