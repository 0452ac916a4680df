//! Shortcodes embedded in markdown values.
//!
//! A shortcode is written as `[name|arg1|arg2]` (tags and separator are
//! configurable per definition). Definitions convert positional arguments to
//! a props object and back, and render a preview for the props.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;

use crate::preview::{MarkdownSegment, PreviewNode};
use crate::schema::{FieldSchema, StringOptions, WidgetOptions};

/// Errors raised while registering or serialising shortcodes.
#[derive(Debug, Error)]
pub enum ShortcodeError {
    /// No shortcode is registered under the name.
    #[error("Unknown shortcode: {0}")]
    Unknown(String),

    /// The tags and separator do not form a usable pattern.
    #[error("Invalid shortcode pattern for {name}: {source}")]
    Pattern {
        /// Shortcode name.
        name: String,
        /// Regex compilation error.
        source: regex::Error,
    },
}

type ToProps = Arc<dyn Fn(&[String]) -> Value + Send + Sync>;
type ToArgs = Arc<dyn Fn(&Value) -> Vec<String> + Send + Sync>;
type RenderPreview = Arc<dyn Fn(&Value) -> PreviewNode + Send + Sync>;

/// How one shortcode is written, converted and previewed.
#[derive(Clone)]
pub struct ShortcodeDefinition {
    /// Label shown in the editor's insert menu.
    pub label: String,
    /// Opening tag.
    pub open_tag: String,
    /// Closing tag.
    pub close_tag: String,
    /// Argument separator.
    pub separator: String,
    /// Fields used to edit the props.
    pub fields: Vec<FieldSchema>,
    to_props: ToProps,
    to_args: ToArgs,
    preview: RenderPreview,
}

impl ShortcodeDefinition {
    /// Create a definition written as `[name|args...]`.
    pub fn new<P, A, R>(label: impl Into<String>, to_props: P, to_args: A, preview: R) -> Self
    where
        P: Fn(&[String]) -> Value + Send + Sync + 'static,
        A: Fn(&Value) -> Vec<String> + Send + Sync + 'static,
        R: Fn(&Value) -> PreviewNode + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            open_tag: "[".to_string(),
            close_tag: "]".to_string(),
            separator: "|".to_string(),
            fields: Vec::new(),
            to_props: Arc::new(to_props),
            to_args: Arc::new(to_args),
            preview: Arc::new(preview),
        }
    }

    /// Use different tags and separator.
    #[must_use]
    pub fn with_tags(
        mut self,
        open_tag: impl Into<String>,
        close_tag: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        self.open_tag = open_tag.into();
        self.close_tag = close_tag.into();
        self.separator = separator.into();
        self
    }

    /// Set the fields used to edit the props.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldSchema>) -> Self {
        self.fields = fields;
        self
    }

    /// Convert positional arguments to props.
    #[must_use]
    pub fn to_props(&self, args: &[String]) -> Value {
        (self.to_props)(args)
    }

    /// Convert props back to positional arguments.
    #[must_use]
    pub fn to_args(&self, props: &Value) -> Vec<String> {
        (self.to_args)(props)
    }

    /// Render the preview for props.
    #[must_use]
    pub fn preview(&self, props: &Value) -> PreviewNode {
        (self.preview)(props)
    }

    fn pattern(&self, name: &str) -> Result<Regex, ShortcodeError> {
        let source = format!(
            "{open}{name}(?:{sep}(?P<args>.*?))?{close}",
            open = regex::escape(&self.open_tag),
            name = regex::escape(name),
            sep = regex::escape(&self.separator),
            close = regex::escape(&self.close_tag),
        );
        Regex::new(&source).map_err(|source| ShortcodeError::Pattern {
            name: name.to_string(),
            source,
        })
    }
}

impl fmt::Debug for ShortcodeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcodeDefinition")
            .field("label", &self.label)
            .field("open_tag", &self.open_tag)
            .field("close_tag", &self.close_tag)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

/// A shortcode occurrence found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch {
    /// Shortcode name.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Byte range of the occurrence.
    pub range: Range<usize>,
}

#[derive(Debug, Clone)]
struct Registered {
    definition: ShortcodeDefinition,
    pattern: Regex,
}

/// Registered shortcodes keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Shortcodes {
    entries: BTreeMap<String, Registered>,
}

impl Shortcodes {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a shortcode, returning the definition it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::Pattern`] if the tags cannot form a pattern.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: ShortcodeDefinition,
    ) -> Result<Option<ShortcodeDefinition>, ShortcodeError> {
        let name = name.into();
        let pattern = definition.pattern(&name)?;
        Ok(self
            .entries
            .insert(
                name,
                Registered {
                    definition,
                    pattern,
                },
            )
            .map(|old| old.definition))
    }

    /// Look up a shortcode by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShortcodeDefinition> {
        self.entries.get(name).map(|r| &r.definition)
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether no shortcodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find every shortcode occurrence, in document order.
    ///
    /// Overlapping matches keep the one starting first.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<ShortcodeMatch> {
        let mut found: Vec<ShortcodeMatch> = self
            .entries
            .iter()
            .flat_map(|(name, registered)| {
                registered.pattern.captures_iter(text).filter_map(move |caps| {
                    let whole = caps.get(0)?;
                    let args = caps
                        .name("args")
                        .map(|m| {
                            m.as_str()
                                .split(registered.definition.separator.as_str())
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                    Some(ShortcodeMatch {
                        name: name.clone(),
                        args,
                        range: whole.range(),
                    })
                })
            })
            .collect();

        found.sort_by_key(|m| (m.range.start, std::cmp::Reverse(m.range.end)));
        let mut end = 0;
        found.retain(|m| {
            let keep = m.range.start >= end;
            if keep {
                end = m.range.end;
            }
            keep
        });
        found
    }

    /// Convert the arguments of an occurrence to props.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::Unknown`] if the shortcode is not registered.
    pub fn to_props(&self, name: &str, args: &[String]) -> Result<Value, ShortcodeError> {
        self.get(name)
            .map(|d| d.to_props(args))
            .ok_or_else(|| ShortcodeError::Unknown(name.to_string()))
    }

    /// Write props back as shortcode text.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::Unknown`] if the shortcode is not registered.
    pub fn serialize(&self, name: &str, props: &Value) -> Result<String, ShortcodeError> {
        let definition = self
            .get(name)
            .ok_or_else(|| ShortcodeError::Unknown(name.to_string()))?;
        let mut out = format!("{}{name}", definition.open_tag);
        for arg in definition.to_args(props) {
            out.push_str(&definition.separator);
            out.push_str(&arg);
        }
        out.push_str(&definition.close_tag);
        Ok(out)
    }

    /// Split markdown into text and rendered shortcode segments.
    #[must_use]
    pub fn render_markdown(&self, text: &str) -> Vec<MarkdownSegment> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in self.find_all(text) {
            let Some(definition) = self.get(&found.name) else {
                continue;
            };
            if found.range.start > cursor {
                segments.push(MarkdownSegment::Text {
                    text: text[cursor..found.range.start].to_string(),
                });
            }
            let props = definition.to_props(&found.args);
            segments.push(MarkdownSegment::Shortcode {
                preview: definition.preview(&props),
                name: found.name,
            });
            cursor = found.range.end;
        }
        if cursor < text.len() {
            segments.push(MarkdownSegment::Text {
                text: text[cursor..].to_string(),
            });
        }
        segments
    }
}

/// The YouTube embed shortcode: `[youtube|<video id>]`.
#[must_use]
pub fn youtube() -> ShortcodeDefinition {
    ShortcodeDefinition::new(
        "YouTube",
        |args: &[String]| json!({ "src": args.first().cloned().unwrap_or_default() }),
        |props: &Value| {
            vec![props
                .get("src")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()]
        },
        |props: &Value| match props.get("src").and_then(Value::as_str) {
            Some(src) if !src.is_empty() => PreviewNode::Frame {
                src: format!("https://www.youtube.com/embed/{src}"),
                width: 420,
                height: 315,
            },
            _ => PreviewNode::Empty,
        },
    )
    .with_fields(vec![FieldSchema::new(
        "src",
        WidgetOptions::String(StringOptions::default()),
    )
    .with_label("YouTube Video ID")])
}
