// src/api/responses.rs
//! Wire shapes of the Notion API responses this client consumes.
//!
//! Blocks are decoded in two steps: the envelope (`WireBlock`) first, keeping
//! every payload as raw JSON, then the payload named by the type tag. That
//! split lets an unknown tag survive as `Block::Unsupported` instead of
//! failing the whole page of results.

use crate::types::{Color, RichTextItem};
use serde::Deserialize;
use serde_json::{Map, Value};

pub use notion_client::objects::{error::Error as NotionError, page::Page as NotionPage};

/// Block children listing.
pub type RetrieveBlockChildrenResponse = super::types::PaginatedResponse<WireBlock>;

/// Trait for converting wire types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, crate::error::AppError>;
}

/// A block envelope with its payload still undecoded.
#[derive(Debug, Clone, Deserialize)]
pub struct WireBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub archived: bool,
    /// Every other field, including the one named by `block_type`.
    #[serde(flatten)]
    pub payloads: Map<String, Value>,
}

impl WireBlock {
    /// Removes and returns the payload object for this block's kind.
    /// Kinds like `divider` send `{}`; a missing key is read the same way.
    pub fn take_payload(&mut self) -> Value {
        self.payloads
            .remove(&self.block_type)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

#[derive(Debug, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Deserialize)]
pub struct ToDoPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct CalloutPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub icon: Option<WireIcon>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireIcon {
    Emoji { emoji: String },
    External { external: WireUrl },
    File { file: WireUrl },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct WireUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CodePayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedPayload {
    #[serde(default)]
    pub url: String,
}

/// Shared by `image` and `file` blocks.
#[derive(Debug, Deserialize)]
pub struct FilePayload {
    #[serde(flatten)]
    pub source: WireFile,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireFile {
    External {
        external: WireUrl,
    },
    File {
        file: WireHostedFile,
    },
}

#[derive(Debug, Deserialize)]
pub struct WireHostedFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Deserialize)]
pub struct EquationPayload {
    pub expression: String,
}

#[derive(Debug, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

#[derive(Debug, Deserialize)]
pub struct TableRowPayload {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextItem>>,
}

#[derive(Debug, Deserialize)]
pub struct SyncedPayload {
    #[serde(default)]
    pub synced_from: Option<SyncedSource>,
}

#[derive(Debug, Deserialize)]
pub struct SyncedSource {
    pub block_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChildPagePayload {
    #[serde(default)]
    pub title: String,
}
