// src/constants.rs
//! Domain constants that define the operational boundaries of the converter.
//!
//! Each constant is named for the domain concept it constrains. The marker
//! strings are part of the output format: changing one changes every
//! document this tool has ever produced.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many children the Notion API returns per page of results (its maximum).
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Default cap on result pages fetched for one block's child list.
///
/// 100 pages of 100 children is 10,000 siblings under a single block,
/// far beyond any hand-written page. Exceeding it is treated as a malformed
/// document and escalates as `PaginationOverrun`.
pub const CHILDREN_MAX_PAGES: u32 = 100;

/// Default deadline for any single network call, in seconds.
pub const NETWORK_CALL_TIMEOUT_SECS: u64 = 30;

/// Attempts made for retryable network failures before giving up.
pub const NETWORK_RETRY_ATTEMPTS: u32 = 3;

/// First backoff delay between retries, in milliseconds.
pub const NETWORK_RETRY_INITIAL_DELAY_MS: u64 = 500;

/// Ceiling for the exponential backoff delay, in milliseconds.
pub const NETWORK_RETRY_MAX_DELAY_MS: u64 = 8_000;

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Lower bound of the default permit pool (network calls are I/O bound).
pub const MIN_DEFAULT_CONCURRENCY: usize = 4;

/// Upper bound of the default permit pool.
pub const MAX_DEFAULT_CONCURRENCY: usize = 24;

/// Hard ceiling on user-requested concurrency.
pub const MAX_CONCURRENCY: usize = 32;

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

/// Appended after every rendered block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// One level of child indentation.
pub const INDENT_UNIT: &str = "\t";

/// Rendered for blank paragraphs, and for blank lines inside a column cell.
pub const LINE_BREAK_MARKER: &str = "<br/>";

/// Dash placeholder used for every cell of a table separator row.
pub const TABLE_SEPARATOR_CELL: &str = "----";

/// Prefixed to a page mention's label when it links to the page's public URL.
pub const PUBLIC_PAGE_MARKER: &str = "📑";

/// Name of the page property holding a page's public URL.
pub const PUBLIC_URL_PROPERTY: &str = "URL";

/// Plain text Notion reports for mentions of untitled or inaccessible objects.
pub const UNTITLED_MENTION: &str = "Untitled";

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Hex characters of the URL-path digest used to tag downloaded files.
pub const ASSET_TAG_LEN: usize = 8;

/// Suffix of a download in progress; renamed away once the body is complete.
pub const PARTIAL_DOWNLOAD_SUFFIX: &str = ".part";

/// File name of the optional raw block dump written next to the assets.
pub const RAW_DUMP_FILE_NAME: &str = "notion_data.json";

// ---------------------------------------------------------------------------
// String capacity hints (performance, not correctness)
// ---------------------------------------------------------------------------

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
