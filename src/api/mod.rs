// src/api/mod.rs
//! Notion API interaction: the ability to retrieve a page's block tree.
//!
//! The converter depends only on `DocumentSource`; HTTP, pagination and
//! wire decoding stay behind it.

mod block_decoder;
pub mod client;
pub mod parser;
mod responses;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::model::Block;
use crate::types::{BlockId, PageId, PageSummary};

/// Where block trees come from.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// The ordered children of a block (or of a page, by its id), fully
    /// paginated. Exceeding the page cap is `AppError::PaginationOverrun`.
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, AppError>;

    /// Title, URL and public URL of a mentioned page.
    async fn resolve_page(&self, page_id: &PageId) -> Result<PageSummary, AppError>;
}

pub use block_decoder::decode_block;
pub use client::{ClientOptions, NotionHttpClient};
pub use types::PageLimit;
