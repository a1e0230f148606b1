// src/lib.rs
//! notion2md library: converts a Notion block tree into one Markdown document
//! with locally stored assets.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ConversionError`, `ValidationError`
//! - **Configuration**: `config::ConvertConfig`, `ConverterOptions`
//! - **Domain model**: `Block` and its per-kind payloads
//! - **Domain types**: `BlockId`, `PageId`, `ApiKey`, rich text runs
//! - **Collaborators**: `DocumentSource`, `AssetStore` and their HTTP implementations
//! - **Conversion**: `Converter`, the block registry and the ordered dispatcher

pub mod api;
pub mod assets;
pub mod config;
pub mod constants;
mod error;
mod error_recovery;
pub mod formatting;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ConversionError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, BookmarkBlock, CalloutBlock, ChildPageBlock, CodeBlock, EmbedBlock,
    EquationBlock, FileBlock, FileObject, Icon, ImageBlock, MalformedBlock, MarkerBlock,
    SyncedBlock, TableBlock, TableRowBlock, TextBlock, TextBlockContent, ToDoBlock,
    UnsupportedBlock,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, Id, MentionType, PageId, PageSummary,
    RichTextItem, RichTextType,
};

// --- Collaborators ---
pub use crate::api::{
    decode_block,
    parser::{parse_block_list, parse_blocks_pagination, parse_page_summary},
    ClientOptions, DocumentSource, NotionHttpClient, PageLimit,
};
pub use crate::assets::{
    AssetReference, AssetResolver, AssetStore, HttpAssetStore, ResolverOptions,
};

// --- Conversion ---
pub use crate::formatting::dispatcher::map_ordered;
pub use crate::formatting::registry::{render as render_record, Rendered};
pub use crate::formatting::{
    Converter, ConverterOptions, FieldRecord, OverrunScope, RichTextRenderer,
};
