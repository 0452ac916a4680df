//! `markdown` widget.

use super::BasicControl;
use crate::preview::PreviewNode;
use crate::registry::{PreviewProps, ValueType, WidgetDefinition};

/// Rich text. The preview splits out registered shortcodes.
#[must_use]
pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("markdown", BasicControl(ValueType::String), preview)
}

fn preview(props: &PreviewProps<'_>) -> PreviewNode {
    match props.value.as_str() {
        Some(text) if !text.is_empty() => PreviewNode::Markdown {
            segments: props.env.registry().shortcodes().render_markdown(text),
        },
        _ => PreviewNode::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::MarkdownSegment;
    use crate::widgets::test_support::{field, render};
    use serde_json::json;

    #[test]
    fn test_preview_renders_shortcodes() {
        let body = field(json!({"name": "body", "widget": "markdown"}));
        let node = render(&body, &json!("Intro\n\n[youtube|abc123]"));
        match node {
            PreviewNode::Markdown { segments } => {
                assert_eq!(segments.len(), 2);
                assert!(matches!(
                    &segments[1],
                    MarkdownSegment::Shortcode { name, .. } if name == "youtube"
                ));
            }
            other => panic!("Expected markdown node, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body() {
        let body = field(json!({"name": "body", "widget": "markdown"}));
        assert!(render(&body, &json!("")).is_empty());
    }
}
