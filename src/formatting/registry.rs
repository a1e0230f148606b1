// src/formatting/registry.rs
//! The block type registry: one pure rendering rule per supported kind.

use super::fields::FieldRecord;
use crate::constants::TABLE_SEPARATOR_CELL;

/// Output of a rule: a Markdown fragment, or the cells of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Line(String),
    Cells(Vec<String>),
}

impl Rendered {
    /// Flattens to text. A row outside any table renders as a lone row.
    pub fn into_fragment(self) -> String {
        match self {
            Rendered::Line(line) => line,
            Rendered::Cells(cells) => table_line(&cells),
        }
    }

    /// Cells for table assembly; a non-row becomes a single cell.
    pub fn into_cells(self) -> Vec<String> {
        match self {
            Rendered::Line(line) => vec![line],
            Rendered::Cells(cells) => cells,
        }
    }
}

/// Comment marker emitted for kinds without a rule.
pub fn unsupported_comment(block_type: &str) -> String {
    format!("[//]: # ({} is not supported)", block_type)
}

fn with_caption(head: String, caption: &str) -> String {
    if caption.is_empty() {
        head
    } else {
        format!("{}\n\n{}", head, caption)
    }
}

pub fn render(record: &FieldRecord) -> Rendered {
    let line = match record {
        FieldRecord::Paragraph { text } => text.clone(),
        FieldRecord::Heading { level, text } => {
            format!("{} {}", "#".repeat(*level as usize), text)
        }
        FieldRecord::Callout { icon, text } => format!("{} {}", icon, text),
        FieldRecord::Quote { text } => format!("> {}", text),
        FieldRecord::Toggle { text } | FieldRecord::BulletedListItem { text } => {
            format!("- {}", text)
        }
        FieldRecord::NumberedListItem { text } => format!("1. {}", text),
        FieldRecord::ToDo { checked, text } => {
            format!("- {} {}", if *checked { "[x]" } else { "[ ]" }, text)
        }
        FieldRecord::Code { language, text } => format!("\n```{}\n{}\n```", language, text),
        FieldRecord::Embed { url } => format!("[{}]({})", url, url),
        FieldRecord::Image { asset, caption } => with_caption(
            format!("![{}]({})", asset.display_name, asset.location),
            caption,
        ),
        FieldRecord::File { asset } => format!("[{}]({})", asset.display_name, asset.location),
        FieldRecord::Bookmark { url, caption } => {
            with_caption(format!("[{}]({})", url, url), caption)
        }
        FieldRecord::Equation { expression } => format!(" $${}$$ ", expression),
        FieldRecord::Divider => "---".to_string(),
        FieldRecord::TableRow { cells } => return Rendered::Cells(cells.clone()),
        FieldRecord::ColumnList => "[//]: # column_list".to_string(),
        FieldRecord::Column => "[//]: # column".to_string(),
        FieldRecord::Synced => "[//]: # (Synced Block)".to_string(),
    };
    Rendered::Line(line)
}

/// `| a | b | ` (trailing space, no newline).
pub fn table_line(cells: &[String]) -> String {
    format!("| {} | ", cells.join(" | "))
}

/// Header row, dash separator sized to the header, then the body rows.
/// Column count is fixed by the first row; later rows are not padded.
pub fn assemble_table(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let mut table = String::new();
    table.push_str(&table_line(header));
    table.push('\n');
    table.push_str(&table_line(&vec![TABLE_SEPARATOR_CELL.to_string(); header.len()]));
    table.push('\n');
    for row in body {
        table.push_str(&table_line(row));
        table.push('\n');
    }
    table
}

/// One synthetic row holding every column, then a separator row.
pub fn assemble_columns(columns: &[String]) -> String {
    let separators = vec![TABLE_SEPARATOR_CELL; columns.len()];
    format!(
        "| {} |\n| {} |\n\n",
        columns.join(" | "),
        separators.join(" | ")
    )
}
