// src/formatting/fields.rs
//! Per-kind field records: everything a block's rendering rule needs, with
//! rich text already rendered and assets already resolved.
//!
//! `normalize` is where the suspension points live (page mentions, asset
//! downloads). Rendering a record is pure.

use super::rich_text::RichTextRenderer;
use crate::assets::{AssetReference, AssetResolver};
use crate::model::Block;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRecord {
    Paragraph { text: String },
    Heading { level: u8, text: String },
    Callout { icon: String, text: String },
    Quote { text: String },
    Toggle { text: String },
    BulletedListItem { text: String },
    NumberedListItem { text: String },
    ToDo { checked: bool, text: String },
    Code { language: String, text: String },
    Embed { url: String },
    Image { asset: AssetReference, caption: String },
    File { asset: AssetReference },
    Bookmark { url: String, caption: String },
    Equation { expression: String },
    Divider,
    TableRow { cells: Vec<String> },
    ColumnList,
    Column,
    Synced,
}

/// Builds the record for `block`, or `None` for kinds with no rendering
/// rule (tables, child pages and anything unrecognized).
pub async fn normalize(
    block: &Block,
    rich_text: &RichTextRenderer,
    assets: &AssetResolver,
) -> Option<FieldRecord> {
    let record = match block {
        Block::Paragraph(b) => FieldRecord::Paragraph {
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Heading1(b) => FieldRecord::Heading {
            level: 1,
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Heading2(b) => FieldRecord::Heading {
            level: 2,
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Heading3(b) => FieldRecord::Heading {
            level: 3,
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Callout(b) => FieldRecord::Callout {
            icon: b
                .icon
                .as_ref()
                .map(|icon| icon.glyph().to_string())
                .unwrap_or_default(),
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Quote(b) => FieldRecord::Quote {
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Toggle(b) => FieldRecord::Toggle {
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::BulletedListItem(b) => FieldRecord::BulletedListItem {
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::NumberedListItem(b) => FieldRecord::NumberedListItem {
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::ToDo(b) => FieldRecord::ToDo {
            checked: b.checked,
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Code(b) => FieldRecord::Code {
            language: b.language.clone(),
            text: rich_text.render_sequence(&b.content.rich_text).await,
        },
        Block::Embed(b) => FieldRecord::Embed { url: b.url.clone() },
        Block::Image(b) => FieldRecord::Image {
            asset: assets.resolve(b.image.url()).await,
            caption: rich_text.render_sequence(&b.caption).await,
        },
        Block::File(b) => FieldRecord::File {
            asset: assets.resolve(b.file.url()).await,
        },
        Block::Bookmark(b) => FieldRecord::Bookmark {
            url: b.url.clone(),
            caption: rich_text.render_sequence(&b.caption).await,
        },
        Block::Equation(b) => FieldRecord::Equation {
            expression: b.expression.clone(),
        },
        Block::Divider(_) => FieldRecord::Divider,
        Block::TableRow(b) => {
            let mut cells = Vec::with_capacity(b.cells.len());
            for cell in &b.cells {
                cells.push(rich_text.render_sequence(cell).await);
            }
            FieldRecord::TableRow { cells }
        }
        Block::ColumnList(_) => FieldRecord::ColumnList,
        Block::Column(_) => FieldRecord::Column,
        Block::Synced(_) => FieldRecord::Synced,
        Block::Table(_) | Block::ChildPage(_) | Block::Unsupported(_) | Block::Malformed(_) => {
            return None
        }
    };
    Some(record)
}
