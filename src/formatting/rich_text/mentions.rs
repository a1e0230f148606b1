// src/formatting/rich_text/mentions.rs
//! Label and link selection for mention runs.

use crate::constants::{PUBLIC_PAGE_MARKER, UNTITLED_MENTION};
use crate::types::{PageSummary, RichTextItem};

/// What a mention shows and where it points, before its kind is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionInfo {
    pub content: String,
    pub url: Option<String>,
}

impl MentionInfo {
    /// Mentions of inaccessible objects come back as "Untitled"; the link
    /// is more useful than that label.
    pub fn from_run(run: &RichTextItem) -> Self {
        match &run.href {
            Some(href) => Self {
                content: if run.plain_text == UNTITLED_MENTION {
                    href.clone()
                } else {
                    run.plain_text.clone()
                },
                url: Some(href.clone()),
            },
            None => Self {
                content: run.plain_text.clone(),
                url: None,
            },
        }
    }
}

pub fn markdown_link(content: &str, url: &str) -> String {
    format!("[{}]({})", content, url)
}

/// `(content)`, used for users and dates.
pub fn parenthesized(info: &MentionInfo) -> String {
    format!("({})", info.content)
}

/// Database mentions link to their href, or to the object itself when the
/// API sent none.
pub fn database_link(info: &MentionInfo, database_id: &str) -> String {
    match &info.url {
        Some(url) => markdown_link(&info.content, url),
        None => markdown_link(
            &info.content,
            &format!("https://www.notion.so/{}", database_id.replace('-', "")),
        ),
    }
}

/// A public URL property wins over the page's own link and is flagged with
/// the marker glyph.
pub fn page_link(info: &MentionInfo, page: &PageSummary) -> String {
    match &page.public_url {
        Some(public_url) => markdown_link(
            &format!("{}{}", PUBLIC_PAGE_MARKER, info.content),
            public_url,
        ),
        None => markdown_link(&info.content, info.url.as_deref().unwrap_or(&page.url)),
    }
}
