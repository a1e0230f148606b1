// src/error.rs
//! Error types for the converter.
//!
//! `AppError` covers infrastructure: configuration, transport, decoding and
//! filesystem failures. `ConversionError` is the vocabulary of the tree
//! walk itself, where every failure but one is contained at the smallest
//! scope that produced it.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded — back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "validation_error" => Self::ValidationFailed,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: u16,
    },

    #[error("Notion API error {status} ({code}): {message}")]
    NotionApi {
        status: u32,
        code: NotionErrorCode,
        message: String,
        request_id: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("Child list of block {block_id} exceeds {max_pages} pages")]
    PaginationOverrun { block_id: String, max_pages: u32 },

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Output delivery failed: {}", failures.join("; "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Transient failures that a retry may clear.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NotionService { code, .. } | AppError::NotionApi { code, .. } => {
                code.is_retryable()
            }
            AppError::NetworkFailure(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status()
                        .map(|s| s.as_u16() == 429 || s.is_server_error())
                        .unwrap_or(false)
            }
            AppError::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Failures of the block tree conversion.
///
/// Only `PaginationOverrun` is fatal: it signals a malformed or
/// adversarially large document and unwinds past the failed call, as far as
/// the converter's `OverrunScope` allows. Everything else is logged where it happens and replaced by an empty
/// fragment, an empty inline run, or the unresolved remote link.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("{block_type} is not supported")]
    UnsupportedBlockType { block_type: String },

    #[error("Failed to render {block_type} block {block_id}: {source}")]
    RenderFailure {
        block_type: String,
        block_id: String,
        #[source]
        source: AppError,
    },

    #[error("Failed to fetch asset {url}: {source}")]
    AssetFetchFailure {
        url: String,
        #[source]
        source: AppError,
    },

    #[error("Failed to resolve mentioned page {page_id}: {source}")]
    MentionResolutionFailure {
        page_id: String,
        #[source]
        source: AppError,
    },

    #[error("Child list of block {block_id} exceeds {max_pages} pages")]
    PaginationOverrun { block_id: String, max_pages: u32 },
}

impl ConversionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConversionError::PaginationOverrun { .. })
    }

    /// Classifies a failure raised while converting one block. Pagination
    /// overruns keep their identity so they escalate.
    pub fn from_block_failure(block_type: &str, block_id: &str, source: AppError) -> Self {
        match source {
            AppError::PaginationOverrun {
                block_id,
                max_pages,
            } => ConversionError::PaginationOverrun {
                block_id,
                max_pages,
            },
            source => ConversionError::RenderFailure {
                block_type: block_type.to_string(),
                block_id: block_id.to_string(),
                source,
            },
        }
    }
}
