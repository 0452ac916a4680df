//! Asset resolution for previews.
//!
//! Asset fields store repository paths; previews need URLs. Resolution is
//! asynchronous and may race with further edits, so each field instance owns
//! an [`AssetSlot`] that hands out monotonic request tokens and only accepts
//! the result of the latest request.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::registry::WidgetRegistry;
use crate::schema::{FieldSchema, WidgetOptions};
use crate::widgets::file::asset_paths;

/// Errors raised while resolving assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The backend has no asset at the path.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The path cannot be turned into a URL.
    #[error("Invalid asset URL for {path}: {source}")]
    InvalidUrl {
        /// Asset path.
        path: String,
        /// Parse error.
        source: url::ParseError,
    },

    /// A newer request superseded this one; its result was not applied.
    #[error("Stale asset resolution discarded (token {token})")]
    StaleAssetResolutionDiscarded {
        /// Token of the discarded request.
        token: RequestToken,
    },

    /// Backend failure.
    #[error("Asset backend error: {0}")]
    Backend(String),
}

/// Turns asset paths into URLs.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Resolve the asset at `path` for `field`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the asset cannot be resolved.
    async fn get_asset(&self, path: &str, field: &FieldSchema) -> Result<Url, AssetError>;
}

/// Resolved asset URLs keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStore {
    urls: HashMap<String, Url>,
}

impl AssetStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the URL of a path.
    pub fn insert(&mut self, path: impl Into<String>, url: Url) {
        self.urls.insert(path.into(), url);
    }

    /// URL of a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Url> {
        self.urls.get(path)
    }

    /// Number of resolved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether nothing is resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Add every entry of `other`.
    pub fn merge(&mut self, other: AssetStore) {
        self.urls.extend(other.urls);
    }
}

#[async_trait]
impl AssetResolver for AssetStore {
    async fn get_asset(&self, path: &str, _field: &FieldSchema) -> Result<Url, AssetError> {
        self.get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

/// Identifies one resolution request of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latest resolved assets of one field instance.
#[derive(Debug, Default)]
pub struct AssetSlot {
    issued: u64,
    latest: Option<RequestToken>,
    current: AssetStore,
}

impl AssetSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Earlier in-flight requests become stale.
    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.latest = Some(token);
        token
    }

    /// Apply the result of a request.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::StaleAssetResolutionDiscarded`] and leaves the
    /// slot unchanged if `token` is not the latest request.
    pub fn complete(&mut self, token: RequestToken, assets: AssetStore) -> Result<(), AssetError> {
        if self.latest != Some(token) {
            warn!(%token, "Discarding stale asset resolution");
            return Err(AssetError::StaleAssetResolutionDiscarded { token });
        }
        self.latest = None;
        self.current = assets;
        Ok(())
    }

    /// Invalidate every in-flight request.
    pub fn abandon(&mut self) {
        self.latest = None;
    }

    /// Assets of the latest completed request.
    #[must_use]
    pub fn current(&self) -> &AssetStore {
        &self.current
    }
}

/// Resolves the assets of one field instance into its [`AssetSlot`].
#[derive(Clone)]
pub struct AssetLoader {
    resolver: Arc<dyn AssetResolver>,
    slot: Arc<Mutex<AssetSlot>>,
}

impl AssetLoader {
    /// A loader with an empty slot.
    #[must_use]
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self {
            resolver,
            slot: Arc::new(Mutex::new(AssetSlot::new())),
        }
    }

    /// Resolve every path of `value`, one request per array element.
    ///
    /// Paths that fail to resolve are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::StaleAssetResolutionDiscarded`] if another load
    /// started, or the slot was abandoned, before this one finished.
    pub async fn load(&self, value: &Value, field: &FieldSchema) -> Result<(), AssetError> {
        let token = self.lock().begin();
        let paths: Vec<String> = asset_paths(value).into_iter().map(str::to_string).collect();
        let assets = resolve_paths(self.resolver.as_ref(), &paths, field).await;
        self.lock().complete(token, assets)
    }

    /// Assets of the latest completed load.
    #[must_use]
    pub fn current(&self) -> AssetStore {
        self.lock().current().clone()
    }

    /// Invalidate in-flight loads, e.g. when the field unmounts.
    pub fn abandon(&self) {
        self.lock().abandon();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AssetSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn resolve_paths(resolver: &dyn AssetResolver, paths: &[String], field: &FieldSchema) -> AssetStore {
    let results = join_all(paths.iter().map(|path| resolver.get_asset(path, field))).await;
    let mut store = AssetStore::new();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(url) => store.insert(path.clone(), url),
            Err(e) => warn!(%path, "Asset resolution failed: {e}"),
        }
    }
    store
}

/// Resolve the assets of every image and file field of an entry,
/// nested object and list fields included.
///
/// Fields are read through `registry`, so custom widgets reusing the
/// `image` or `file` control are resolved too.
pub async fn resolve_entry_assets(
    resolver: &dyn AssetResolver,
    registry: &WidgetRegistry,
    fields: &[FieldSchema],
    data: &Value,
) -> AssetStore {
    let mut requests = Vec::new();
    let walk = Walk { resolver, registry };
    walk.fields(fields, data, &mut requests);
    let mut store = AssetStore::new();
    for assets in join_all(requests).await {
        store.merge(assets);
    }
    debug!(resolved = store.len(), "Resolved entry assets");
    store
}

#[derive(Clone, Copy)]
struct Walk<'a> {
    resolver: &'a dyn AssetResolver,
    registry: &'a WidgetRegistry,
}

impl<'a> Walk<'a> {
    fn fields(self, fields: &'a [FieldSchema], value: &'a Value, requests: &mut Vec<BoxFuture<'a, AssetStore>>) {
        for field in fields {
            if let Some(child) = value.get(&field.name) {
                self.field(field, child, requests);
            }
        }
    }

    fn field(self, field: &'a FieldSchema, value: &'a Value, requests: &mut Vec<BoxFuture<'a, AssetStore>>) {
        match self.registry.options(field) {
            WidgetOptions::Image(_) | WidgetOptions::File(_) => {
                let paths: Vec<String> = asset_paths(value).into_iter().map(str::to_string).collect();
                let resolver = self.resolver;
                requests.push(async move { resolve_paths(resolver, &paths, field).await }.boxed());
            }
            WidgetOptions::Object(object) => self.fields(&object.fields, value, requests),
            WidgetOptions::List(list) => {
                for item in value.as_array().into_iter().flatten() {
                    match &list.field {
                        Some(item_field) => self.field(item_field, item, requests),
                        None => self.fields(&list.fields, item, requests),
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
    use crate::preview::PreviewNode;
    use crate::registry::{PreviewProps, RegistryBuilder};
    use crate::schema::FileOptions;
    use serde_json::json;
    use tokio::sync::Notify;

    fn image_field() -> FieldSchema {
        FieldSchema::new(
            "gallery",
            WidgetOptions::Image(FileOptions {
                multiple: true,
                ..FileOptions::default()
            }),
        )
    }

    fn url(path: &str) -> Url {
        Url::parse("https://cdn.example.com/")
            .and_then(|base| base.join(path))
            .expect("url")
    }

    /// Resolves `slow` only after `release` is notified.
    struct GatedResolver {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl AssetResolver for GatedResolver {
        async fn get_asset(&self, path: &str, _field: &FieldSchema) -> Result<Url, AssetError> {
            if path == "slow.png" {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(url(path))
        }
    }

    // ========================================================================
    // Slot
    // ========================================================================

    #[test]
    fn test_slot_tokens_are_monotonic() {
        let mut slot = AssetSlot::new();
        let a = slot.begin();
        let b = slot.begin();
        assert!(b > a);
    }

    #[test]
    fn test_slot_rejects_stale_completion() {
        let mut slot = AssetSlot::new();
        let a = slot.begin();
        let b = slot.begin();

        let mut fresh = AssetStore::new();
        fresh.insert("y.png", url("y.png"));
        slot.complete(b, fresh.clone()).expect("latest");

        let mut stale = AssetStore::new();
        stale.insert("x.png", url("x.png"));
        let err = slot.complete(a, stale).expect_err("stale");
        assert!(matches!(err, AssetError::StaleAssetResolutionDiscarded { token } if token == a));
        assert_eq!(slot.current(), &fresh);
    }

    #[test]
    fn test_abandon_invalidates_in_flight() {
        let mut slot = AssetSlot::new();
        let token = slot.begin();
        slot.abandon();
        assert!(slot.complete(token, AssetStore::new()).is_err());
    }

    // ========================================================================
    // Loader
    // ========================================================================

    #[tokio::test]
    async fn test_load_fans_out_array_values() {
        let mut backend = AssetStore::new();
        backend.insert("a.png", url("a.png"));
        backend.insert("b.png", url("b.png"));
        let loader = AssetLoader::new(Arc::new(backend));

        loader
            .load(&json!(["a.png", "b.png", "missing.png"]), &image_field())
            .await
            .expect("latest");

        let current = loader.current();
        assert_eq!(current.len(), 2);
        assert_eq!(current.get("b.png"), Some(&url("b.png")));
    }

    #[tokio::test]
    async fn test_late_stale_result_does_not_overwrite_newer() {
        let resolver = Arc::new(GatedResolver {
            started: Notify::new(),
            release: Notify::new(),
        });
        let loader = AssetLoader::new(resolver.clone());
        let field = image_field();

        let first = tokio::spawn({
            let loader = loader.clone();
            let field = field.clone();
            async move { loader.load(&json!("slow.png"), &field).await }
        });
        resolver.started.notified().await;

        loader.load(&json!("fast.png"), &field).await.expect("latest");
        resolver.release.notify_one();

        let stale = first.await.expect("task");
        assert!(matches!(
            stale,
            Err(AssetError::StaleAssetResolutionDiscarded { .. })
        ));
        let current = loader.current();
        assert!(current.get("fast.png").is_some());
        assert!(current.get("slow.png").is_none());
    }

    #[tokio::test]
    async fn test_resolve_entry_assets_walks_nested_fields() {
        let fields: Vec<FieldSchema> = serde_json::from_value(json!([
            {"name": "cover", "widget": "image"},
            {"name": "sections", "widget": "list", "fields": [
                {"name": "photo", "widget": "image"}
            ]},
            {"name": "downloads", "widget": "list", "field": {"name": "doc", "widget": "file"}}
        ]))
        .expect("fields");
        let data = json!({
            "cover": "cover.png",
            "sections": [{"photo": "one.png"}, {"photo": "two.png"}],
            "downloads": ["guide.pdf"]
        });

        let mut backend = AssetStore::new();
        for path in ["cover.png", "one.png", "two.png", "guide.pdf"] {
            backend.insert(path, url(path));
        }

        let registry = RegistryBuilder::with_builtins().build().expect("build");
        let store = resolve_entry_assets(&backend, &registry, &fields, &data).await;
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_resolve_entry_assets_sees_reused_image_widget() {
        let mut builder = RegistryBuilder::with_builtins();
        builder.register_widget("hero", "image", |_: &PreviewProps<'_>| PreviewNode::Empty);
        let registry = builder.build().expect("build");
        let fields: Vec<FieldSchema> = serde_json::from_value(json!([
            {"name": "banner", "widget": "hero", "multiple": true}
        ]))
        .expect("fields");

        let mut backend = AssetStore::new();
        backend.insert("wide.png", url("wide.png"));
        backend.insert("tall.png", url("tall.png"));

        let data = json!({"banner": ["wide.png", "tall.png"]});
        let store = resolve_entry_assets(&backend, &registry, &fields, &data).await;
        assert_eq!(store.get("tall.png"), Some(&url("tall.png")));
        assert_eq!(store.len(), 2);
    }
}
