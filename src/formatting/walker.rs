// src/formatting/walker.rs
//! Recursive descent over the block tree.
//!
//! Each block becomes a fragment ending in a blank line. Children are
//! fetched lazily from the document source, converted concurrently, and
//! joined back in source order. A failure inside one block empties that
//! block's fragment and nothing else. A pagination overrun empties the
//! block whose child list overran, or fails the whole document under
//! `OverrunScope::Document`.

use super::dispatcher::map_ordered;
use super::fields::normalize;
use super::registry::{self, assemble_columns, assemble_table, unsupported_comment};
use super::rich_text::RichTextRenderer;
use crate::api::DocumentSource;
use crate::assets::{AssetResolver, AssetStore, ResolverOptions};
use crate::constants::{
    BLOCK_SEPARATOR, CHARS_PER_BLOCK_ESTIMATE, INDENT_UNIT, LINE_BREAK_MARKER,
    MAX_CONCURRENCY, MAX_DEFAULT_CONCURRENCY, MIN_DEFAULT_CONCURRENCY,
    NETWORK_CALL_TIMEOUT_SECS,
};
use crate::error::{AppError, ConversionError};
use crate::error_recovery::{retry_budget, with_timeout};
use crate::model::{Block, MalformedBlock};
use crate::types::{BlockId, PageId};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// How far a pagination overrun unwinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrunScope {
    /// The block whose child list overran renders empty; siblings and
    /// ancestors are kept.
    #[default]
    Block,
    /// The conversion fails and no document is produced.
    Document,
}

/// Library-level conversion settings.
#[derive(Debug, Clone, Copy)]
pub struct ConverterOptions {
    /// Size of the permit pool shared by every network call of one conversion.
    pub concurrency: usize,
    /// Deadline for one network call as seen by the walker, retries included.
    pub call_timeout: Duration,
    pub overrun_scope: OverrunScope,
}

impl ConverterOptions {
    pub fn default_concurrency() -> usize {
        num_cpus::get().clamp(MIN_DEFAULT_CONCURRENCY, MAX_DEFAULT_CONCURRENCY)
    }
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            concurrency: Self::default_concurrency(),
            call_timeout: retry_budget(Duration::from_secs(NETWORK_CALL_TIMEOUT_SECS)),
            overrun_scope: OverrunScope::default(),
        }
    }
}

/// Converts block trees into Markdown.
pub struct Converter {
    source: Arc<dyn DocumentSource>,
    rich_text: RichTextRenderer,
    assets: AssetResolver,
    permits: Arc<Semaphore>,
    options: ConverterOptions,
}

impl Converter {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn AssetStore>,
        assets: ResolverOptions,
        options: ConverterOptions,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(options.concurrency.clamp(1, MAX_CONCURRENCY)));
        Self {
            rich_text: RichTextRenderer::new(
                Arc::clone(&source),
                Arc::clone(&permits),
                options.call_timeout,
            ),
            assets: AssetResolver::new(store, assets, Arc::clone(&permits)),
            source,
            permits,
            options,
        }
    }

    /// Converts an ordered block list (a page's top level) into one document.
    pub async fn convert(&self, blocks: &[Block]) -> Result<String, ConversionError> {
        self.convert_at(blocks, 0).await
    }

    /// Fetches a page's blocks from the source and converts them.
    pub async fn convert_page(&self, page_id: &PageId) -> Result<String, ConversionError> {
        let root: BlockId = page_id.cast();
        let blocks = self
            .fetch_children(&root)
            .await
            .map_err(|e| ConversionError::from_block_failure("page", root.as_str(), e))?;
        log::info!("Converting {} top-level blocks of {}", blocks.len(), page_id);
        self.convert(&blocks).await
    }

    async fn convert_at(&self, blocks: &[Block], depth: usize) -> Result<String, ConversionError> {
        let fragments = map_ordered(blocks, move |block| self.convert_block(block, depth)).await;

        let mut out = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
        for fragment in fragments {
            out.push_str(&fragment?);
        }
        Ok(out)
    }

    /// Converts one block and its subtree into a fragment.
    ///
    /// Returns `Ok("")` when the block failed; the failure has been logged.
    /// Only an overrun under `OverrunScope::Document` is returned as `Err`.
    pub fn convert_block<'a>(
        &'a self,
        block: &'a Block,
        depth: usize,
    ) -> BoxFuture<'a, Result<String, ConversionError>> {
        async move {
            match self.render_subtree(block, depth).await {
                Ok(fragment) => Ok(fragment),
                Err(e) if e.is_fatal() && self.options.overrun_scope == OverrunScope::Document => {
                    Err(e)
                }
                Err(e) => {
                    log::error!("{}", e);
                    Ok(String::new())
                }
            }
        }
        .boxed()
    }

    async fn render_subtree(&self, block: &Block, depth: usize) -> Result<String, ConversionError> {
        if block.is_blank() {
            return Ok(format!("{}{}", LINE_BREAK_MARKER, BLOCK_SEPARATOR));
        }

        // Composite layouts replace the block's own rendering entirely.
        if block.has_children() {
            match block {
                Block::Table(_) => {
                    let rows = self.children_of(block).await?;
                    return self.render_table(&rows).await;
                }
                Block::ColumnList(_) => {
                    let columns = self.children_of(block).await?;
                    return self.render_columns(&columns).await;
                }
                _ => {}
            }
        }

        let mut out = self.render_own(block).await?;
        // Nested pages are separate documents.
        if !block.has_children() || matches!(block, Block::ChildPage(_)) {
            return Ok(out);
        }

        let children = self.children_of(block).await?;
        let indent = INDENT_UNIT.repeat(depth + 1);
        let fragments =
            map_ordered(&children, move |child| self.convert_block(child, depth + 1)).await;

        for fragment in fragments {
            let fragment = fragment?;
            if !fragment.is_empty() {
                out.push_str(&indent);
                out.push_str(&fragment);
            }
        }
        Ok(out)
    }

    /// The block's own fragment, ignoring its children.
    async fn render_own(&self, block: &Block) -> Result<String, ConversionError> {
        if let Block::Malformed(b) = block {
            return Err(malformed(b));
        }

        let body = match normalize(block, &self.rich_text, &self.assets).await {
            Some(record) => registry::render(&record).into_fragment(),
            None => {
                let unsupported = ConversionError::UnsupportedBlockType {
                    block_type: block.block_type().to_string(),
                };
                log::info!("{} ({})", unsupported, block.id());
                unsupported_comment(block.block_type())
            }
        };
        Ok(body + BLOCK_SEPARATOR)
    }

    async fn render_table(&self, rows: &[Block]) -> Result<String, ConversionError> {
        let cells: Vec<Vec<String>> = map_ordered(rows, move |row| async move {
            if let Block::Malformed(b) = row {
                log::error!("{}", malformed(b));
                return None;
            }
            Some(match normalize(row, &self.rich_text, &self.assets).await {
                Some(record) => registry::render(&record).into_cells(),
                None => vec![unsupported_comment(row.block_type())],
            })
        })
        .await
        .into_iter()
        .flatten()
        .collect();

        let table = assemble_table(&cells);
        if table.is_empty() {
            return Ok(table);
        }
        Ok(table + "\n")
    }

    async fn render_columns(&self, columns: &[Block]) -> Result<String, ConversionError> {
        let contents = map_ordered(columns, move |column| async move {
            let inner = match column {
                Block::Column(_) if column.has_children() => {
                    let children = self.children_of(column).await?;
                    self.convert_at(&children, 0).await?
                }
                Block::Column(_) => String::new(),
                other => self.convert_block(other, 0).await?,
            };
            Ok::<_, ConversionError>(inner.replace(BLOCK_SEPARATOR, LINE_BREAK_MARKER))
        })
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        if contents.is_empty() {
            return Ok(String::new());
        }
        Ok(assemble_columns(&contents))
    }

    async fn children_of(&self, block: &Block) -> Result<Vec<Block>, ConversionError> {
        self.fetch_children(block.id())
            .await
            .map_err(|e| ConversionError::from_block_failure(block.block_type(), block.id().as_str(), e))
    }

    /// One permit per call, released before the children fan out.
    async fn fetch_children(&self, id: &BlockId) -> Result<Vec<Block>, AppError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Permit pool closed: {}", e),
            })?;
        log::debug!("Fetching children of {}", id);
        with_timeout(
            "children fetch",
            self.options.call_timeout,
            self.source.fetch_children(id),
        )
        .await
    }
}

fn malformed(block: &MalformedBlock) -> ConversionError {
    ConversionError::RenderFailure {
        block_type: block.block_type.clone(),
        block_id: block.common.id.to_string(),
        source: AppError::MalformedResponse(block.reason.clone()),
    }
}
