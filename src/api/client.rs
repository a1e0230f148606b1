// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! Handles authentication, query strings, per-attempt deadlines and retries.
//! Parsing lives in `parser`; this module only moves bytes.

use super::simple_pagination::fetch_all_pages;
use super::types::PageLimit;
use super::DocumentSource;
use crate::constants::{
    NETWORK_CALL_TIMEOUT_SECS, NETWORK_RETRY_ATTEMPTS, NETWORK_RETRY_INITIAL_DELAY_MS,
    NETWORK_RETRY_MAX_DELAY_MS,
};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::Block;
use crate::types::{ApiKey, BlockId, PageId, PageSummary};
use reqwest::{header, Client, Response};
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// Knobs for one client instance.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Deadline for each request attempt.
    pub timeout: Duration,
    pub page_limit: PageLimit,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(NETWORK_CALL_TIMEOUT_SECS),
            page_limit: PageLimit::default(),
        }
    }
}

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    options: ClientOptions,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey, options: ClientOptions) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(options.timeout)
            .build()?;
        Ok(Self { client, options })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to `endpoint` (a path below the API base URL).
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("GET {} {:?}", url, query);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// GET, read and parse one response, retried while the failure is
    /// transient. The reqwest client bounds each attempt.
    async fn get_parsed<T, P>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        parse: P,
    ) -> Result<T, AppError>
    where
        P: Fn(ApiResponse<String>) -> Result<T, AppError> + Sync,
        T: Send,
    {
        let parse = &parse;
        retry_with_backoff(
            move || async move {
                let response = self.get(endpoint, query).await?;
                parse(extract_response_text(response).await?)
            },
            NETWORK_RETRY_ATTEMPTS,
            Duration::from_millis(NETWORK_RETRY_INITIAL_DELAY_MS),
            Duration::from_millis(NETWORK_RETRY_MAX_DELAY_MS),
        )
        .await
    }
}

#[async_trait::async_trait]
impl DocumentSource for NotionHttpClient {
    async fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", block_id.to_dashed());
        let endpoint = endpoint.as_str();

        let result = fetch_all_pages(
            move |page_size, cursor| async move {
                let mut query = vec![("page_size", page_size.to_string())];
                if let Some(cursor) = cursor {
                    query.push(("start_cursor", cursor));
                }
                self.get_parsed(endpoint, &query, super::parser::parse_blocks_pagination)
                    .await
            },
            self.options.page_limit,
            block_id.as_str(),
        )
        .await?;

        log::debug!(
            "Fetched {} children of {} in {} page(s)",
            result.items.len(),
            block_id,
            result.pages_fetched
        );
        Ok(result.items)
    }

    async fn resolve_page(&self, page_id: &PageId) -> Result<PageSummary, AppError> {
        let endpoint = format!("pages/{}", page_id.to_dashed());
        self.get_parsed(&endpoint, &[], super::parser::parse_page_summary)
            .await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
