//! Error types for entry editing operations.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::shortcode::ShortcodeError;

/// Result type for entry editing operations.
pub type CmsResult<T> = Result<T, CmsError>;

/// Errors that can occur while configuring widgets or editing entries.
#[derive(Debug, Error)]
pub enum CmsError {
    /// No widget is registered under the requested type name.
    #[error("No widget registered for type: {0}")]
    UnknownWidget(String),

    /// A widget asked to reuse a control that was never registered.
    #[error("Cannot reuse unknown control: {0}")]
    UnknownControl(String),

    /// The process-wide registry was installed more than once.
    #[error("Widget registry already installed")]
    RegistryAlreadyInstalled,

    /// A field schema failed to load or validate.
    #[error("Invalid field schema: {0}")]
    Schema(#[from] SchemaError),

    /// A shortcode could not be registered or serialised.
    #[error("Shortcode error: {0}")]
    Shortcode(#[from] ShortcodeError),

    /// Collection not found in the configuration.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Field path does not resolve to a field of the collection.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// The draft still has validation errors.
    #[error("Publish blocked: {summary}")]
    PublishBlocked {
        /// Human-readable summary of the offending fields.
        summary: String,
    },

    /// Configuration or entry serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
