//! Inline rich text runs, decoded straight from the API's wire shape.

use super::Color;
use serde::{Deserialize, Serialize};

/// One inline run: text, mention or equation, plus its annotations.
///
/// `plain_text` is the API's own flattening of the run and is what mentions
/// and equations render from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(flatten)]
    pub text_type: RichTextType,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextType {
    Text { text: TextContent },
    Mention { mention: MentionType },
    Equation { equation: EquationData },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default)]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationData {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// The entity a mention points at. Kinds the renderer has no rule for
/// (link previews, templates, ...) decode as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MentionType {
    User { user: PartialUser },
    Page { page: ObjectReference },
    Database { database: ObjectReference },
    Date { date: DateValue },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

impl RichTextItem {
    /// A plain, unannotated text run.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                text: TextContent {
                    content: text.to_string(),
                    link: None,
                },
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// A text run carrying a hyperlink, as the API reports it (both `text.link` and `href`).
    pub fn link(text: &str, url: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                text: TextContent {
                    content: text.to_string(),
                    link: Some(Link {
                        url: url.to_string(),
                    }),
                },
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: Some(url.to_string()),
        }
    }

    pub fn equation(expression: &str) -> Self {
        Self {
            text_type: RichTextType::Equation {
                equation: EquationData {
                    expression: expression.to_string(),
                },
            },
            annotations: Annotations::default(),
            plain_text: expression.to_string(),
            href: None,
        }
    }

    pub fn mention(mention: MentionType, plain_text: &str, href: Option<&str>) -> Self {
        Self {
            text_type: RichTextType::Mention { mention },
            annotations: Annotations::default(),
            plain_text: plain_text.to_string(),
            href: href.map(str::to_string),
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_text_run() {
        let json = r#"{
            "type": "text",
            "text": { "content": "x", "link": { "url": "http://e" } },
            "annotations": {
                "bold": true, "italic": true, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": "x",
            "href": "http://e"
        }"#;

        let item: RichTextItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item,
            RichTextItem::link("x", "http://e").with_annotations(Annotations {
                bold: true,
                italic: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_decode_page_mention() {
        let json = r#"{
            "type": "mention",
            "mention": { "type": "page", "page": { "id": "550e8400-e29b-41d4-a716-446655440000" } },
            "annotations": {
                "bold": false, "italic": false, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": "Roadmap",
            "href": "https://www.notion.so/550e8400e29b41d4a716446655440000"
        }"#;

        let item: RichTextItem = serde_json::from_str(json).unwrap();
        match item.text_type {
            RichTextType::Mention {
                mention: MentionType::Page { page },
            } => assert_eq!(page.id, "550e8400-e29b-41d4-a716-446655440000"),
            other => panic!("expected page mention, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mention_kind_decodes_as_other() {
        let json = r#"{
            "type": "mention",
            "mention": { "type": "link_preview", "link_preview": { "url": "https://x.dev" } },
            "plain_text": "https://x.dev",
            "href": "https://x.dev"
        }"#;

        let item: RichTextItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.text_type,
            RichTextType::Mention {
                mention: MentionType::Other
            }
        );
    }
}
