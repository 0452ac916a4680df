//! Asset URLs for entries on disk.

use async_trait::async_trait;
use folio_core::{AssetError, AssetResolver, FieldSchema, WidgetOptions};
use serde_json::Value;
use url::Url;

/// Resolves asset paths against a base URL, inside the field's media folder
/// when it has one. Absolute URLs pass through unchanged.
#[derive(Debug, Clone)]
pub struct FileAssetResolver {
    base: Url,
}

impl FileAssetResolver {
    /// Resolver rooted at `base`.
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    /// Base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl AssetResolver for FileAssetResolver {
    async fn get_asset(&self, path: &str, field: &FieldSchema) -> Result<Url, AssetError> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        let media_folder = match &field.options {
            WidgetOptions::Image(options) | WidgetOptions::File(options) => options.media_folder.as_deref(),
            WidgetOptions::Custom { options, .. } => options.get("media_folder").and_then(Value::as_str),
            _ => None,
        };
        let relative = match media_folder {
            Some(folder) if !path.starts_with('/') => {
                format!("{}/{path}", folder.trim_matches('/'))
            }
            _ => path.trim_start_matches('/').to_string(),
        };
        self.base.join(&relative).map_err(|source| AssetError::InvalidUrl {
            path: path.to_string(),
            source,
        })
    }
}
