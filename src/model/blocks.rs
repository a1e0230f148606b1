use super::common::BlockCommon;
use crate::types::{BlockId, Color, RichTextItem};
use serde::{Deserialize, Serialize};

/// Rich text plus block color, shared by every text-bearing kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
    pub color: Color,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self {
            rich_text,
            color: Color::Default,
        }
    }
}

/// Paragraph, headings, quote, toggle and list items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub icon: Option<Icon>,
    pub content: TextBlockContent,
}

/// Page and callout icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Icon {
    Emoji(String),
    External { url: String },
    File { url: String },
}

impl Icon {
    /// The glyph shown before a callout. Image icons have none.
    pub fn glyph(&self) -> &str {
        match self {
            Icon::Emoji(emoji) => emoji,
            Icon::External { .. } | Icon::File { .. } => "",
        }
    }
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub language: String,
    pub caption: Vec<RichTextItem>,
}

/// Embed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub common: BlockCommon,
    pub url: String,
}

/// Hosted or external file reference.
///
/// Both variants resolve identically; Notion-hosted URLs merely expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileObject {
    External { url: String },
    File { url: String, expiry_time: Option<String> },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { url } | FileObject::File { url, .. } => url,
        }
    }
}

/// Image block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub common: BlockCommon,
    pub image: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// File block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBlock {
    pub common: BlockCommon,
    pub file: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// Bookmark block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkBlock {
    pub common: BlockCommon,
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Block-level equation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationBlock {
    pub common: BlockCommon,
    pub expression: String,
}

/// Blocks whose kind is their only content: divider, column list, column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerBlock {
    pub common: BlockCommon,
}

/// Table block; its rows arrive as children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Synced block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedBlock {
    pub common: BlockCommon,
    /// Set on copies; `None` on the original.
    pub synced_from: Option<BlockId>,
}

/// Child page block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// A block whose type tag is outside the closed kind set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}

/// A block of a known kind whose payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedBlock {
    pub common: BlockCommon,
    pub block_type: String,
    pub reason: String,
}
