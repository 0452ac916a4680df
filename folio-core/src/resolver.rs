//! Preview composition.
//!
//! A [`PreviewContext`] binds the draft of one entry to the registry and
//! renders its fields. Related entries come from an [`EntryArena`] of
//! already fetched entries; resolution goes exactly one level deep, and
//! anything missing degrades to `None` or an empty list.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::asset::AssetStore;
use crate::path::{self, FieldPath};
use crate::preview::PreviewNode;
use crate::registry::{render_field, PreviewEnv, PreviewProps, WidgetRegistry};
use crate::schema::{CmsConfig, Collection, FieldSchema, WidgetOptions};
use crate::widgets::relation::referenced_values;
use crate::widgets::scalar_text;
use crate::CmsResult;

/// Relation `value_field` that refers to the entry slug.
const SLUG_FIELD: &str = "{{slug}}";

/// A fetched entry.
#[derive(Debug, Clone, Copy)]
pub struct ArenaEntry<'a> {
    /// Collection name.
    pub collection: &'a str,
    /// Entry slug.
    pub slug: &'a str,
    /// Entry data.
    pub data: &'a Value,
}

/// Fetched entries indexed by collection and slug.
#[derive(Debug, Clone, Default)]
pub struct EntryArena {
    entries: BTreeMap<(String, String), Value>,
}

impl EntryArena {
    /// An empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, collection: impl Into<String>, slug: impl Into<String>, data: Value) {
        self.entries.insert((collection.into(), slug.into()), data);
    }

    /// Data of one entry.
    #[must_use]
    pub fn get(&self, collection: &str, slug: &str) -> Option<&Value> {
        self.entries.get(&(collection.to_string(), slug.to_string()))
    }

    /// Every entry of a collection, in slug order.
    #[must_use]
    pub fn entries(&self, collection: &str) -> Vec<ArenaEntry<'_>> {
        self.entries
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((collection, slug), data)| ArenaEntry {
                collection,
                slug,
                data,
            })
            .collect()
    }

    /// The entry of `collection` whose `value_field` equals `value`.
    ///
    /// `{{slug}}` matches the slug itself; anything else is a dotted path
    /// into the entry data.
    #[must_use]
    pub fn find_by_field(&self, collection: &str, value_field: &str, value: &str) -> Option<ArenaEntry<'_>> {
        let field_path = FieldPath::parse(value_field);
        self.entries(collection).into_iter().find(|entry| {
            if value_field == SLUG_FIELD {
                entry.slug == value
            } else {
                path::get(entry.data, &field_path).is_some_and(|found| scalar_text(found) == value)
            }
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Data and rendered field previews of one object, list item or entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetGroup {
    /// Raw data.
    pub data: Value,
    /// Field previews keyed by field name.
    pub widgets: BTreeMap<String, PreviewNode>,
}

/// Rendered listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCard {
    /// Card content.
    pub node: PreviewNode,
    /// Card height in pixels.
    pub height: u32,
}

/// Renders previews of one entry draft.
#[derive(Clone, Copy)]
pub struct PreviewContext<'a> {
    registry: &'a WidgetRegistry,
    config: &'a CmsConfig,
    collection: &'a Collection,
    fields: &'a [FieldSchema],
    data: &'a Value,
    arena: Option<&'a EntryArena>,
    assets: Option<&'a AssetStore>,
}

impl<'a> PreviewContext<'a> {
    /// Context for an entry of `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CmsError::CollectionNotFound`] if the collection is
    /// not configured.
    pub fn new(
        registry: &'a WidgetRegistry,
        config: &'a CmsConfig,
        collection: &str,
        data: &'a Value,
    ) -> CmsResult<Self> {
        let collection = config.collection(collection)?;
        Ok(Self {
            registry,
            config,
            collection,
            fields: &collection.fields,
            data,
            arena: None,
            assets: None,
        })
    }

    /// Use the fields of one file of a file collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CmsError::FieldNotFound`] if the collection has no
    /// such file.
    pub fn for_file(mut self, file: &str) -> CmsResult<Self> {
        self.fields = self
            .collection
            .fields_for(Some(file))
            .ok_or_else(|| crate::CmsError::FieldNotFound(file.to_string()))?;
        Ok(self)
    }

    /// Resolve relations from `arena`.
    #[must_use]
    pub fn with_arena(mut self, arena: &'a EntryArena) -> Self {
        self.arena = Some(arena);
        self
    }

    /// Show resolved asset URLs from `assets`.
    #[must_use]
    pub fn with_assets(mut self, assets: &'a AssetStore) -> Self {
        self.assets = Some(assets);
        self
    }

    /// The collection being previewed.
    #[must_use]
    pub fn collection(&self) -> &'a Collection {
        self.collection
    }

    /// Entry data.
    #[must_use]
    pub fn entry(&self) -> &'a Value {
        self.data
    }

    /// Raw value at a field path.
    #[must_use]
    pub fn value(&self, field_path: &str) -> Option<&'a Value> {
        path::get(self.data, &FieldPath::parse(field_path))
    }

    /// Preview of one field bound to the draft value.
    ///
    /// A field preview registered for the collection takes precedence over
    /// the widget preview. Unknown fields yield `None`; fields of
    /// unregistered widgets yield a fallback node.
    #[must_use]
    pub fn widget_for(&self, field_name: &str) -> Option<PreviewNode> {
        let field_path = FieldPath::parse(field_name);
        let field = self.registry.find_field(self.fields, &field_path)?;
        let value = path::get(self.data, &field_path).unwrap_or(&Value::Null);

        let node = match self.registry.field_preview(&self.collection.name, field_name) {
            Some(preview) => preview.render(&PreviewProps {
                value,
                field,
                env: self,
            }),
            None => render_field(self, field, value),
        };
        Some(node)
    }

    /// Data and field previews of the entries nested under a field.
    ///
    /// Object fields yield one group, list fields one group per item and
    /// relation fields one group per referenced entry found in the arena.
    /// Custom widgets reusing one of those controls behave the same.
    /// Referenced entries are not resolved any further.
    #[must_use]
    pub fn widgets_for(&self, field_name: &str) -> Vec<WidgetGroup> {
        let field_path = FieldPath::parse(field_name);
        let Some(field) = self.registry.find_field(self.fields, &field_path) else {
            return Vec::new();
        };
        let Some(value) = path::get(self.data, &field_path) else {
            return Vec::new();
        };

        match self.registry.options(field) {
            WidgetOptions::Object(object) if value.is_object() => {
                vec![self.group(&object.fields, value)]
            }
            WidgetOptions::List(list) => value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| match &list.field {
                            Some(item_field) => self.group_single(item_field, item),
                            None => self.group(&list.fields, item),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            WidgetOptions::Relation(relation) => {
                self.related(&relation.collection, &relation.value_field, value)
            }
            _ => Vec::new(),
        }
    }

    /// Data and field previews of every arena entry of a collection.
    #[must_use]
    pub fn widgets_for_collection(&self, collection: &str) -> Vec<WidgetGroup> {
        let (Some(arena), Ok(target)) = (self.arena, self.config.collection(collection)) else {
            return Vec::new();
        };
        arena
            .entries(collection)
            .into_iter()
            .map(|entry| self.group(&target.fields, entry.data))
            .collect()
    }

    /// Whole-entry preview.
    ///
    /// Uses the collection's registered template, else lists every visible
    /// field preview.
    #[must_use]
    pub fn render(&self) -> PreviewNode {
        match self.registry.template(&self.collection.name) {
            Some(template) => template.render(self),
            None => self.default_template(),
        }
    }

    /// Listing card of the entry, if the collection registered one.
    #[must_use]
    pub fn render_card(&self) -> Option<RenderedCard> {
        let card = self.registry.card(&self.collection.name)?;
        Some(RenderedCard {
            node: card.template.render(self),
            height: card.height(self.data),
        })
    }

    fn default_template(&self) -> PreviewNode {
        let children = self
            .fields
            .iter()
            .filter(|field| !matches!(field.options, WidgetOptions::Hidden))
            .filter_map(|field| {
                let child = self.widget_for(&field.name)?;
                Some(PreviewNode::Field {
                    name: field.name.clone(),
                    label: field.display_label().to_string(),
                    child: Box::new(child),
                })
            })
            .collect();
        PreviewNode::Container {
            label: Some(
                self.collection
                    .label
                    .clone()
                    .unwrap_or_else(|| self.collection.name.clone()),
            ),
            children,
        }
    }

    fn related(&self, collection: &str, value_field: &str, value: &Value) -> Vec<WidgetGroup> {
        let (Some(arena), Ok(target)) = (self.arena, self.config.collection(collection)) else {
            return Vec::new();
        };
        referenced_values(value)
            .iter()
            .filter_map(|reference| arena.find_by_field(collection, value_field, reference))
            .map(|entry| self.group(&target.fields, entry.data))
            .collect()
    }

    fn group(&self, fields: &[FieldSchema], data: &Value) -> WidgetGroup {
        let widgets = fields
            .iter()
            .map(|field| {
                let value = data.get(&field.name).unwrap_or(&Value::Null);
                (field.name.clone(), render_field(self, field, value))
            })
            .collect();
        WidgetGroup {
            data: data.clone(),
            widgets,
        }
    }

    fn group_single(&self, field: &FieldSchema, item: &Value) -> WidgetGroup {
        let mut widgets = BTreeMap::new();
        widgets.insert(field.name.clone(), render_field(self, field, item));
        WidgetGroup {
            data: item.clone(),
            widgets,
        }
    }
}

impl PreviewEnv for PreviewContext<'_> {
    fn registry(&self) -> &WidgetRegistry {
        self.registry
    }

    fn asset_url(&self, path: &str) -> Option<Url> {
        self.assets.and_then(|assets| assets.get(path)).cloned()
    }
}
