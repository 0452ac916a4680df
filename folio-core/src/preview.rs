//! Preview tree produced by widget previews and preview templates.
//!
//! Previews are pure: they read a value and return a serialisable tree that
//! a front end turns into markup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of a rendered preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PreviewNode {
    /// Nothing to show.
    Empty,
    /// Plain text.
    Text {
        /// Text content.
        text: String,
    },
    /// Section heading.
    Heading {
        /// Heading level, 1 to 6.
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Ordered group of nodes.
    Container {
        /// Optional caption.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        /// Child nodes.
        children: Vec<PreviewNode>,
    },
    /// A labelled field preview.
    Field {
        /// Field name.
        name: String,
        /// Field label.
        label: String,
        /// The widget preview.
        child: Box<PreviewNode>,
    },
    /// One or more images.
    Image {
        /// Resolved image URLs.
        sources: Vec<String>,
    },
    /// Hyperlink.
    Link {
        /// Target URL.
        href: String,
        /// Link text.
        text: String,
    },
    /// Markdown text with embedded shortcode previews.
    Markdown {
        /// Text and shortcode segments in document order.
        segments: Vec<MarkdownSegment>,
    },
    /// Color swatch.
    Color {
        /// Hex color value.
        value: String,
    },
    /// Map geometry.
    Map {
        /// GeoJSON geometry.
        geometry: Value,
        /// CSS height of the map.
        height: String,
    },
    /// Embedded frame, e.g. a video player.
    Frame {
        /// Frame source URL.
        src: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Shown when a widget or template cannot render.
    Fallback {
        /// Explanation for editors.
        message: String,
    },
}

impl PreviewNode {
    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A fallback node.
    pub fn fallback(message: impl Into<String>) -> Self {
        Self::Fallback {
            message: message.into(),
        }
    }

    /// An unlabelled container.
    #[must_use]
    pub fn container(children: Vec<PreviewNode>) -> Self {
        Self::Container {
            label: None,
            children,
        }
    }

    /// Whether this node renders nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text } | Self::Heading { text, .. } | Self::Link { text, .. } => {
                out.push_str(text);
            }
            Self::Container { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Self::Field { child, .. } => child.collect_text(out),
            Self::Markdown { segments } => {
                for segment in segments {
                    match segment {
                        MarkdownSegment::Text { text } => out.push_str(text),
                        MarkdownSegment::Shortcode { preview, .. } => preview.collect_text(out),
                    }
                }
            }
            Self::Color { value } => out.push_str(value),
            Self::Fallback { message } => out.push_str(message),
            Self::Empty | Self::Image { .. } | Self::Map { .. } | Self::Frame { .. } => {}
        }
    }
}

/// Part of a markdown preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkdownSegment {
    /// Literal markdown text.
    Text {
        /// Markdown source.
        text: String,
    },
    /// A shortcode rendered by its preview.
    Shortcode {
        /// Shortcode name.
        name: String,
        /// Rendered shortcode.
        preview: PreviewNode,
    },
}
