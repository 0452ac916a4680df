//! # Folio CLI
//!
//! Checks a Folio content configuration and the entries stored next to it.
//!
//! ## Usage
//!
//! ```bash
//! folio --config folio.json check
//! folio --config folio.json validate posts content/posts/hello.json
//! folio --config folio.json preview posts content/posts/hello.json --entries-dir content
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `entries` - Loading the configuration and entry files
//! - `FileAssetResolver` - Asset URLs relative to a media base URL
//! - `run` - Executes a command against a widget registry

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod assets;
pub mod entries;

pub use assets::FileAssetResolver;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_core::{
    resolve_entry_assets, AssetStore, CmsConfig, EditorSession, EntryArena, FieldsErrors,
    PreviewContext, PreviewNode, RenderedCard, ToolbarState, WidgetRegistry,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

/// Command-line arguments for folio.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio")]
#[command(about = "Check Folio content configurations and entries")]
#[command(version)]
pub struct CliArgs {
    /// CMS configuration file
    #[arg(long, env = "FOLIO_CONFIG", default_value = "folio.json")]
    pub config: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Folio commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check every collection against the registered widgets
    Check,

    /// Validate an entry file and report whether it can be published
    Validate {
        /// Collection the entry belongs to
        collection: String,
        /// Entry JSON file; its stem is the slug
        entry: PathBuf,
    },

    /// Print the preview tree of an entry as JSON
    Preview {
        /// Collection the entry belongs to
        collection: String,
        /// Entry JSON file; its stem is the slug
        entry: PathBuf,
        /// Directory of stored entries used to resolve relations
        #[arg(long, env = "FOLIO_ENTRIES_DIR")]
        entries_dir: Option<PathBuf>,
        /// Base URL that asset paths resolve against
        #[arg(long)]
        media_base: Option<Url>,
    },
}

/// Initialize tracing with environment-based configuration.
///
/// Set `RUST_LOG` to control log levels (default: `info,folio_core=debug`).
/// Set `RUST_LOG_FORMAT=json` for JSON output. Logs go to stderr so that
/// command output stays parseable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,folio_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    ok: bool,
    collections: usize,
    errors: Vec<String>,
    widgets: Vec<&'a str>,
}

#[derive(Serialize)]
struct ValidateReport<'a> {
    collection: &'a str,
    slug: &'a str,
    publish_eligible: bool,
    errors: &'a FieldsErrors,
    toolbar: ToolbarState,
}

#[derive(Serialize)]
struct PreviewReport {
    preview: PreviewNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<RenderedCard>,
}

/// Run a command, writing its JSON report to `out`.
///
/// Returns `false` when the command found problems: schema errors for
/// `check`, a blocked publish for `validate`.
///
/// # Errors
///
/// Returns an error if files cannot be loaded or the collection is unknown.
pub async fn run(args: &CliArgs, registry: &WidgetRegistry, out: &mut impl Write) -> anyhow::Result<bool> {
    let config = entries::load_config(&args.config).await?;
    debug!(collections = config.collections.len(), "Loaded configuration");

    match &args.command {
        Command::Check => check(&config, registry, out),
        Command::Validate { collection, entry } => {
            let (slug, data) = entries::load_entry(entry).await?;
            let mut session = EditorSession::open_existing(registry, &config, collection, &slug, data)?;
            let publish_eligible = session.is_publish_eligible();
            info!(%collection, %slug, publish_eligible, "Validated entry");
            let report = ValidateReport {
                collection,
                slug: &slug,
                publish_eligible,
                errors: session.draft().fields_errors(),
                toolbar: session.toolbar(),
            };
            write_json(out, &report)?;
            Ok(publish_eligible)
        }
        Command::Preview {
            collection,
            entry,
            entries_dir,
            media_base,
        } => {
            let (slug, data) = entries::load_entry(entry).await?;
            let arena = match entries_dir {
                Some(dir) => entries::load_arena(dir, &config).await?,
                None => EntryArena::new(),
            };

            let mut context = PreviewContext::new(registry, &config, collection, &data)?;
            if !context.collection().is_folder() {
                context = context.for_file(&slug)?;
            }
            let assets = match media_base {
                Some(base) => {
                    let resolver = FileAssetResolver::new(base.clone());
                    let fields = context.collection().fields_for(
                        (!context.collection().is_folder()).then_some(slug.as_str()),
                    );
                    resolve_entry_assets(&resolver, registry, fields.unwrap_or_default(), &data).await
                }
                None => AssetStore::new(),
            };
            let context = context.with_arena(&arena).with_assets(&assets);

            let report = PreviewReport {
                preview: context.render(),
                card: context.render_card(),
            };
            write_json(out, &report)?;
            Ok(true)
        }
    }
}

fn check(config: &CmsConfig, registry: &WidgetRegistry, out: &mut impl Write) -> anyhow::Result<bool> {
    let errors: Vec<String> = registry
        .validate_config(config)
        .iter()
        .map(ToString::to_string)
        .collect();
    let ok = errors.is_empty();
    info!(ok, problems = errors.len(), "Checked configuration");
    let report = CheckReport {
        ok,
        collections: config.collections.len(),
        errors,
        widgets: registry.widget_names(),
    };
    write_json(out, &report)?;
    Ok(ok)
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to write report")?;
    writeln!(out).context("Failed to write report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preview_args() {
        let args = CliArgs::try_parse_from([
            "folio",
            "--config",
            "cms.json",
            "preview",
            "posts",
            "content/posts/a.json",
            "--media-base",
            "https://cdn.example.com/",
        ])
        .expect("parse");
        assert_eq!(args.config, PathBuf::from("cms.json"));
        let Command::Preview {
            collection,
            media_base,
            ..
        } = args.command
        else {
            panic!("Expected preview command");
        };
        assert_eq!(collection, "posts");
        assert_eq!(
            media_base.map(String::from).as_deref(),
            Some("https://cdn.example.com/")
        );
    }

    #[test]
    fn test_parse_rejects_missing_entry() {
        assert!(CliArgs::try_parse_from(["folio", "validate", "posts"]).is_err());
    }
}
