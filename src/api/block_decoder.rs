// src/api/block_decoder.rs
//! Turns a wire block envelope into the typed `Block` union.

use super::responses::*;
use crate::error::AppError;
use crate::model::*;
use crate::types::BlockId;
use serde::de::DeserializeOwned;
use serde_json::Value;

impl ToDomain<Block> for WireBlock {
    fn to_domain(self) -> Result<Block, AppError> {
        decode_block(self)
    }
}

/// Decodes one block.
///
/// Only an unparseable id is an error. An unknown type tag yields
/// `Block::Unsupported`, and a known tag with a payload that does not decode
/// yields `Block::Malformed`, so one bad block never poisons its siblings.
pub fn decode_block(mut wire: WireBlock) -> Result<Block, AppError> {
    let id = BlockId::parse(&wire.id)?;
    let common = BlockCommon {
        id,
        has_children: wire.has_children,
        archived: wire.archived,
    };
    let payload = wire.take_payload();
    let tag = wire.block_type;

    match decode_known(&tag, common.clone(), payload) {
        Some(Ok(block)) => Ok(block),
        Some(Err(e)) => {
            log::debug!("Payload of {} block {} did not decode: {}", tag, common.id, e);
            Ok(Block::Malformed(MalformedBlock {
                common,
                block_type: tag,
                reason: e.to_string(),
            }))
        }
        None => Ok(Block::Unsupported(UnsupportedBlock {
            common,
            block_type: tag,
        })),
    }
}

fn payload<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

fn text_block(common: BlockCommon, value: Value) -> Result<TextBlock, serde_json::Error> {
    let p: TextPayload = payload(value)?;
    Ok(TextBlock {
        common,
        content: TextBlockContent {
            rich_text: p.rich_text,
            color: p.color,
        },
    })
}

fn file_object(source: WireFile) -> FileObject {
    match source {
        WireFile::External { external } => FileObject::External { url: external.url },
        WireFile::File { file } => FileObject::File {
            url: file.url,
            expiry_time: file.expiry_time,
        },
    }
}

/// `None` when the tag is outside the closed kind set.
fn decode_known(
    tag: &str,
    common: BlockCommon,
    value: Value,
) -> Option<Result<Block, serde_json::Error>> {
    let block = match tag {
        "paragraph" => text_block(common, value).map(Block::Paragraph),
        "heading_1" => text_block(common, value).map(Block::Heading1),
        "heading_2" => text_block(common, value).map(Block::Heading2),
        "heading_3" => text_block(common, value).map(Block::Heading3),
        "quote" => text_block(common, value).map(Block::Quote),
        "toggle" => text_block(common, value).map(Block::Toggle),
        "bulleted_list_item" => text_block(common, value).map(Block::BulletedListItem),
        "numbered_list_item" => text_block(common, value).map(Block::NumberedListItem),
        "to_do" => payload::<ToDoPayload>(value).map(|p| {
            Block::ToDo(ToDoBlock {
                common,
                content: TextBlockContent {
                    rich_text: p.rich_text,
                    color: p.color,
                },
                checked: p.checked,
            })
        }),
        "callout" => payload::<CalloutPayload>(value).map(|p| {
            let icon = p.icon.and_then(|icon| match icon {
                WireIcon::Emoji { emoji } => Some(Icon::Emoji(emoji)),
                WireIcon::External { external } => Some(Icon::External { url: external.url }),
                WireIcon::File { file } => Some(Icon::File { url: file.url }),
                WireIcon::Other => None,
            });
            Block::Callout(CalloutBlock {
                common,
                icon,
                content: TextBlockContent {
                    rich_text: p.rich_text,
                    color: p.color,
                },
            })
        }),
        "code" => payload::<CodePayload>(value).map(|p| {
            Block::Code(CodeBlock {
                common,
                content: TextBlockContent::new(p.rich_text),
                language: p.language,
                caption: p.caption,
            })
        }),
        "embed" => {
            payload::<EmbedPayload>(value).map(|p| Block::Embed(EmbedBlock { common, url: p.url }))
        }
        "image" => payload::<FilePayload>(value).map(|p| {
            Block::Image(ImageBlock {
                common,
                image: file_object(p.source),
                caption: p.caption,
            })
        }),
        "file" => payload::<FilePayload>(value).map(|p| {
            Block::File(FileBlock {
                common,
                file: file_object(p.source),
                caption: p.caption,
            })
        }),
        "bookmark" => payload::<BookmarkPayload>(value).map(|p| {
            Block::Bookmark(BookmarkBlock {
                common,
                url: p.url,
                caption: p.caption,
            })
        }),
        "equation" => payload::<EquationPayload>(value).map(|p| {
            Block::Equation(EquationBlock {
                common,
                expression: p.expression,
            })
        }),
        "divider" => Ok(Block::Divider(MarkerBlock { common })),
        "column_list" => Ok(Block::ColumnList(MarkerBlock { common })),
        "column" => Ok(Block::Column(MarkerBlock { common })),
        "table" => payload::<TablePayload>(value).map(|p| {
            Block::Table(TableBlock {
                common,
                table_width: p.table_width,
                has_column_header: p.has_column_header,
                has_row_header: p.has_row_header,
            })
        }),
        "table_row" => payload::<TableRowPayload>(value).map(|p| {
            Block::TableRow(TableRowBlock {
                common,
                cells: p.cells,
            })
        }),
        "synced_block" => payload::<SyncedPayload>(value).map(|p| {
            // An unparseable source id only loses provenance; the block still renders.
            let synced_from = p
                .synced_from
                .and_then(|source| BlockId::parse(&source.block_id).ok());
            Block::Synced(SyncedBlock {
                common,
                synced_from,
            })
        }),
        "child_page" => payload::<ChildPagePayload>(value).map(|p| {
            Block::ChildPage(ChildPageBlock {
                common,
                title: p.title,
            })
        }),
        _ => return None,
    };
    Some(block)
}
