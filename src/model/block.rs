use super::blocks::*;
use super::common::BlockCommon;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Embed($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::File($pattern) => $result,
            Block::Bookmark($pattern) => $result,
            Block::Equation($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::ColumnList($pattern) => $result,
            Block::Column($pattern) => $result,
            Block::Synced($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::Unsupported($pattern) => $result,
            Block::Malformed($pattern) => $result,
        }
    };
}

/// A typed node of the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    Callout(CalloutBlock),
    Quote(TextBlock),
    Toggle(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Code(CodeBlock),
    Embed(EmbedBlock),
    Image(ImageBlock),
    File(FileBlock),
    Bookmark(BookmarkBlock),
    Equation(EquationBlock),
    Divider(MarkerBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ColumnList(MarkerBlock),
    Column(MarkerBlock),
    Synced(SyncedBlock),
    ChildPage(ChildPageBlock),
    Unsupported(UnsupportedBlock),
    /// A known kind whose payload failed to decode.
    Malformed(MalformedBlock),
}

impl Block {
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// The API type tag of this block. Unsupported blocks report the tag
    /// they arrived with.
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::Callout(_) => "callout",
            Block::Quote(_) => "quote",
            Block::Toggle(_) => "toggle",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Code(_) => "code",
            Block::Embed(_) => "embed",
            Block::Image(_) => "image",
            Block::File(_) => "file",
            Block::Bookmark(_) => "bookmark",
            Block::Equation(_) => "equation",
            Block::Divider(_) => "divider",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::ColumnList(_) => "column_list",
            Block::Column(_) => "column",
            Block::Synced(_) => "synced_block",
            Block::ChildPage(_) => "child_page",
            Block::Unsupported(b) => &b.block_type,
            Block::Malformed(b) => &b.block_type,
        }
    }

    /// A paragraph with no children and no rich text renders as a line break.
    pub fn is_blank(&self) -> bool {
        match self {
            Block::Paragraph(b) => !b.common.has_children && b.content.rich_text.is_empty(),
            _ => false,
        }
    }
}
