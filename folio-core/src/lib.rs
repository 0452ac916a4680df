//! # Folio Core
//!
//! Entry editing logic for structured content: field schemas, a registry of
//! typed widgets, per-field value reconciliation, validation routing and
//! preview composition.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 folio-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Field Schema    │  Widget Registry         │
//! │  - Collections   │  - Controls / Previews   │
//! │  - Widget opts   │  - Templates, shortcodes │
//! ├─────────────────────────────────────────────┤
//! │  Editor Session  │  Preview Composition     │
//! │  - Entry draft   │  - widget_for            │
//! │  - Debounce      │  - widgets_for           │
//! │  - Validation    │  - Asset resolution      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flows from a [`FieldSchema`] through a registry lookup to a
//! [`ValueController`]; propagated edits land in the [`EntryDraft`] owned by
//! an [`EditorSession`], which re-runs validation, and the
//! [`PreviewContext`] reads the draft to build preview trees.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod asset;
pub mod cursor;
pub mod draft;
pub mod editor;
pub mod error;
pub mod path;
pub mod preview;
pub mod reconcile;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod shortcode;
pub mod validation;
pub mod widgets;

pub use asset::{
    resolve_entry_assets, AssetError, AssetLoader, AssetResolver, AssetSlot, AssetStore, RequestToken,
};
pub use cursor::{Cursor, CursorAction, EntryListing, ListingView};
pub use draft::EntryDraft;
pub use editor::{EditorSession, Published, ToolbarAction, ToolbarState};
pub use error::{CmsError, CmsResult};
pub use path::FieldPath;
pub use preview::{MarkdownSegment, PreviewNode};
pub use reconcile::{
    ControlFlags, DebouncedControl, Debouncer, Propagation, ValueController, DEBOUNCE_WINDOW,
};
pub use registry::{
    AdditionalLink, Control, ControlProps, ControlSource, DetachedEnv, DuplicateRegistrationWarning,
    LinkOptions, LinkTarget, Preview, PreviewCard, PreviewEnv, PreviewProps, PreviewTemplate,
    RegistryBuilder, ValueType, WidgetDefinition, WidgetRegistry,
};
pub use resolver::{ArenaEntry, EntryArena, PreviewContext, RenderedCard, WidgetGroup};
pub use schema::{CmsConfig, Collection, FieldSchema, I18nConfig, I18nMode, WidgetOptions};
pub use shortcode::{ShortcodeDefinition, ShortcodeError, Shortcodes};
pub use validation::{ErrorEntry, FieldErrorKind, FieldsErrors, ValidationRouter};

/// Folio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
