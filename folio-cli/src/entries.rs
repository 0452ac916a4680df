//! Configuration and entry files on disk.
//!
//! Entries are stored as `<entries_dir>/<collection>/<slug>.json`.

use std::path::{Path, PathBuf};

use folio_core::{CmsConfig, EntryArena};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for its purpose.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The entry file name cannot serve as a slug.
    #[error("Entry file has no usable name: {}", .0.display())]
    Slug(PathBuf),
}

/// Load a CMS configuration.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is unreadable or malformed.
pub async fn load_config(path: &Path) -> Result<CmsConfig, LoadError> {
    let text = read(path).await?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load one entry; its slug is the file stem.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is unreadable or malformed.
pub async fn load_entry(path: &Path) -> Result<(String, Value), LoadError> {
    let slug = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| LoadError::Slug(path.to_path_buf()))?
        .to_string();
    let text = read(path).await?;
    let data = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((slug, data))
}

/// Load every stored entry of every configured collection.
///
/// Collections without a directory are skipped.
///
/// # Errors
///
/// Returns a [`LoadError`] if a directory cannot be listed or an entry file
/// is malformed.
pub async fn load_arena(dir: &Path, config: &CmsConfig) -> Result<EntryArena, LoadError> {
    let mut arena = EntryArena::new();
    for collection in &config.collections {
        let collection_dir = dir.join(&collection.name);
        if !tokio::fs::try_exists(&collection_dir).await.unwrap_or(false) {
            debug!(collection = %collection.name, "No stored entries");
            continue;
        }

        let mut listing = tokio::fs::read_dir(&collection_dir)
            .await
            .map_err(|source| LoadError::Io {
                path: collection_dir.clone(),
                source,
            })?;
        loop {
            let next = listing.next_entry().await.map_err(|source| LoadError::Io {
                path: collection_dir.clone(),
                source,
            })?;
            let Some(file) = next else { break };
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                warn!(path = %path.display(), "Skipping non-JSON file");
                continue;
            }
            let (slug, data) = load_entry(&path).await?;
            arena.insert(&collection.name, slug, data);
        }
    }
    debug!(entries = arena.len(), "Loaded entry arena");
    Ok(arena)
}

async fn read(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_entry_slug_from_stem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hello-world.json");
        std::fs::write(&path, r#"{"title": "Hello"}"#).expect("write");

        let (slug, data) = load_entry(&path).await.expect("load");
        assert_eq!(slug, "hello-world");
        assert_eq!(data, json!({"title": "Hello"}));
    }

    #[tokio::test]
    async fn test_load_entry_reports_bad_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").expect("write");
        assert!(matches!(load_entry(&path).await, Err(LoadError::Json { .. })));
    }

    #[tokio::test]
    async fn test_load_arena_reads_collection_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let authors = dir.path().join("authors");
        std::fs::create_dir(&authors).expect("mkdir");
        std::fs::write(authors.join("ada.json"), r#"{"name": "Ada"}"#).expect("write");
        std::fs::write(authors.join("notes.txt"), "ignored").expect("write");

        let config: CmsConfig = serde_json::from_value(json!({
            "collections": [
                {"name": "authors", "folder": "authors", "fields": [{"name": "name", "widget": "string"}]},
                {"name": "posts", "folder": "posts", "fields": [{"name": "title", "widget": "string"}]}
            ]
        }))
        .expect("config");

        let arena = load_arena(dir.path(), &config).await.expect("arena");
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get("authors", "ada"), Some(&json!({"name": "Ada"})));
    }
}
