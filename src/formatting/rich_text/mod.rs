// src/formatting/rich_text/mod.rs
//! Renders rich text runs into inline Markdown.
//!
//! Text and equation runs are pure string work. Page mentions are the one
//! exception: they ask the document source for the target page, so the
//! renderer is async and holds a handle to it.

mod annotations;
mod mentions;

pub use annotations::MarkdownStyleRenderer;
pub use mentions::MentionInfo;

use crate::api::DocumentSource;
use crate::error::{AppError, ConversionError};
use crate::error_recovery::with_timeout;
use crate::types::{MentionType, PageId, PageSummary, RichTextItem, RichTextType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Inline equation: single math delimiters padded with spaces.
pub fn inline_equation(expression: &str) -> String {
    format!(" ${}$ ", expression)
}

/// Renders a text run: link first, then annotations, then color.
pub fn render_text_run(run: &RichTextItem) -> String {
    let content = match (&run.text_type, &run.href) {
        (RichTextType::Text { text }, Some(href)) => {
            let target = text.link.as_ref().map_or(href.as_str(), |l| l.url.as_str());
            mentions::markdown_link(&text.content, target)
        }
        _ => run.plain_text.clone(),
    };
    MarkdownStyleRenderer::apply_styles(&content, &run.annotations)
}

#[derive(Clone)]
pub struct RichTextRenderer {
    source: Arc<dyn DocumentSource>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl RichTextRenderer {
    pub fn new(source: Arc<dyn DocumentSource>, permits: Arc<Semaphore>, timeout: Duration) -> Self {
        Self {
            source,
            permits,
            timeout,
        }
    }

    /// Concatenates every run in order. Empty input renders empty.
    pub async fn render_sequence(&self, runs: &[RichTextItem]) -> String {
        let mut out = String::new();
        for run in runs {
            out.push_str(&self.render_one(run).await);
        }
        out
    }

    pub async fn render_one(&self, run: &RichTextItem) -> String {
        match &run.text_type {
            RichTextType::Equation { .. } => inline_equation(&run.plain_text),
            RichTextType::Mention { mention } => self.render_mention(mention, run).await,
            RichTextType::Text { .. } => render_text_run(run),
        }
    }

    async fn render_mention(&self, mention: &MentionType, run: &RichTextItem) -> String {
        let info = MentionInfo::from_run(run);
        match mention {
            MentionType::User { .. } | MentionType::Date { .. } => mentions::parenthesized(&info),
            MentionType::Database { database } => mentions::database_link(&info, &database.id),
            MentionType::Page { page } => match self.lookup_page(&page.id).await {
                Ok(summary) => mentions::page_link(&info, &summary),
                Err(source) => {
                    let failure = ConversionError::MentionResolutionFailure {
                        page_id: page.id.clone(),
                        source,
                    };
                    log::error!("{}", failure);
                    String::new()
                }
            },
            MentionType::Other => {
                log::debug!("No rule for mention {:?}, dropping it", run.plain_text);
                String::new()
            }
        }
    }

    async fn lookup_page(&self, raw_id: &str) -> Result<PageSummary, AppError> {
        let page_id = PageId::parse(raw_id)?;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Permit pool closed: {}", e),
            })?;
        with_timeout(
            "page mention lookup",
            self.timeout,
            self.source.resolve_page(&page_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::types::{Annotations, BlockId, ObjectReference, PartialUser};
    use pretty_assertions::assert_eq;

    struct OnePage(Option<PageSummary>);

    #[async_trait::async_trait]
    impl DocumentSource for OnePage {
        async fn fetch_children(&self, _: &BlockId) -> Result<Vec<Block>, AppError> {
            Ok(Vec::new())
        }

        async fn resolve_page(&self, page_id: &PageId) -> Result<PageSummary, AppError> {
            self.0
                .clone()
                .ok_or_else(|| AppError::InvalidId(page_id.to_string()))
        }
    }

    fn renderer(page: Option<PageSummary>) -> RichTextRenderer {
        RichTextRenderer::new(
            Arc::new(OnePage(page)),
            Arc::new(Semaphore::new(2)),
            Duration::from_secs(5),
        )
    }

    const PAGE_ID: &str = "59833787-2cf9-4fdf-8782-e53db20768a5";

    fn page_mention(plain_text: &str, href: Option<&str>) -> RichTextItem {
        RichTextItem::mention(
            MentionType::Page {
                page: ObjectReference {
                    id: PAGE_ID.to_string(),
                },
            },
            plain_text,
            href,
        )
    }

    #[test]
    fn test_link_then_bold_then_italic() {
        let run = RichTextItem::link("x", "http://e").with_annotations(Annotations {
            bold: true,
            italic: true,
            ..Annotations::default()
        });
        assert_eq!(render_text_run(&run), "***[x](http://e)***");
    }

    #[tokio::test]
    async fn test_sequence_concatenates_in_order() {
        let r = renderer(None);
        let runs = vec![
            RichTextItem::plain_text("a "),
            RichTextItem::equation("E=mc^2"),
            RichTextItem::plain_text(" b"),
        ];
        assert_eq!(r.render_sequence(&runs).await, "a  $E=mc^2$  b");
        assert_eq!(r.render_sequence(&[]).await, "");
    }

    #[tokio::test]
    async fn test_user_and_date_mentions() {
        let r = renderer(None);
        let user = RichTextItem::mention(
            MentionType::User {
                user: PartialUser {
                    id: "u1".to_string(),
                    name: Some("Ada".to_string()),
                },
            },
            "@Ada",
            None,
        );
        assert_eq!(r.render_one(&user).await, "(@Ada)");
    }

    #[tokio::test]
    async fn test_page_mention_with_public_url() {
        let r = renderer(Some(PageSummary {
            title: "Notes".to_string(),
            url: "https://www.notion.so/Notes".to_string(),
            public_url: Some("https://blog.example.com/notes".to_string()),
        }));
        let run = page_mention("Notes", Some("https://www.notion.so/598337872cf94fdf8782e53db20768a5"));
        assert_eq!(
            r.render_one(&run).await,
            "[📑Notes](https://blog.example.com/notes)"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_page_mention_renders_empty() {
        let r = renderer(None);
        let runs = vec![
            RichTextItem::plain_text("see "),
            page_mention("Gone", Some("https://www.notion.so/gone")),
            RichTextItem::plain_text("."),
        ];
        assert_eq!(r.render_sequence(&runs).await, "see .");
    }

    #[tokio::test]
    async fn test_unknown_mention_kind_renders_empty() {
        let r = renderer(None);
        let run = RichTextItem::mention(MentionType::Other, "preview", Some("https://x"));
        assert_eq!(r.render_one(&run).await, "");
    }
}
