// src/api/parser.rs
//! Response parsing: status triage, typed error bodies and domain decoding.

use super::client::ApiResponse;
use super::responses::{NotionError, NotionPage, RetrieveBlockChildrenResponse, ToDomain};
use super::types::PaginatedResponse;
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, PUBLIC_URL_PROPERTY};
use crate::error::{AppError, NotionErrorCode};
use crate::model::Block;
use crate::types::PageSummary;
use notion_client::objects::page::PageProperty;
use notion_client::objects::rich_text::RichText as NcRichText;
use serde_json::Value;

/// Parse any Notion API response: success bodies through serde, error
/// bodies through notion-client's error object, anything else by status.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} in body: {}", e, preview(body)))
    })
}

fn parse_error<T>(body: &str, status: reqwest::StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return Err(AppError::NotionApi {
            status: notion_error.status,
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            request_id: notion_error.request_id,
        });
    }

    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status: status.as_u16(),
    })
}

fn preview(body: &str) -> String {
    if body.len() > ERROR_BODY_PREVIEW_LENGTH {
        let mut end = ERROR_BODY_PREVIEW_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

/// One page of a block's child listing, decoded into domain blocks.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    Ok(PaginatedResponse {
        results: response
            .results
            .into_iter()
            .map(ToDomain::to_domain)
            .collect::<Result<_, _>>()?,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Decodes a JSON array of blocks, as found in a child listing's `results`
/// or a raw dump.
pub fn parse_block_list(json: &str) -> Result<Vec<Block>, AppError> {
    let wire: Vec<super::responses::WireBlock> = serde_json::from_str(json)?;
    wire.into_iter().map(ToDomain::to_domain).collect()
}

/// Decodes a page object into what a page mention needs.
///
/// Typed decoding through notion-client is tried first. Its property model
/// rejects some property kinds newer than the crate, so a page that fails it
/// is read again as plain JSON.
pub fn parse_page_summary(result: ApiResponse<String>) -> Result<PageSummary, AppError> {
    let value: Value = parse_api_response(result)?;
    match serde_json::from_value::<NotionPage>(value.clone()) {
        Ok(page) => Ok(page.to_domain()?),
        Err(e) => {
            log::debug!("Typed page decode failed ({}), reading raw properties", e);
            summary_from_value(&value)
        }
    }
}

impl ToDomain<PageSummary> for NotionPage {
    fn to_domain(self) -> Result<PageSummary, AppError> {
        let mut title = None;
        let mut public_url = None;

        for (name, property) in self.properties {
            match property {
                PageProperty::Title { title: runs, .. } => {
                    title = Some(runs.iter().map(run_text).collect::<String>());
                }
                PageProperty::Url { url, .. } if name == PUBLIC_URL_PROPERTY => {
                    public_url = url.filter(|u| !u.is_empty());
                }
                _ => {}
            }
        }

        Ok(PageSummary {
            title: title.unwrap_or_default(),
            url: self.url,
            public_url,
        })
    }
}

fn run_text(run: &NcRichText) -> &str {
    match run {
        NcRichText::Text { plain_text, .. } => plain_text.as_deref().unwrap_or(""),
        NcRichText::Mention { plain_text, .. } | NcRichText::Equation { plain_text, .. } => {
            plain_text.as_str()
        }
        _ => "",
    }
}

fn summary_from_value(value: &Value) -> Result<PageSummary, AppError> {
    let url = value
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("Page has no 'url' field".to_string()))?
        .to_string();

    let properties = value.get("properties").and_then(Value::as_object);

    let title = properties
        .and_then(|props| {
            props
                .values()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
        })
        .and_then(|p| p.get("title"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|r| r.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    let public_url = properties
        .and_then(|props| props.get(PUBLIC_URL_PROPERTY))
        .filter(|p| p.get("type").and_then(Value::as_str) == Some("url"))
        .and_then(|p| p.get("url"))
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    Ok(PageSummary {
        title,
        url,
        public_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/test".to_string(),
        }
    }

    #[test]
    fn test_typed_error_body() {
        let body = r#"{
            "object": "error",
            "status": 429,
            "code": "rate_limited",
            "message": "Slow down",
            "request_id": "req_123"
        }"#;

        let result: Result<Value, _> =
            parse_api_response(response(StatusCode::TOO_MANY_REQUESTS, body));
        match result {
            Err(err @ AppError::NotionApi { .. }) => {
                assert!(err.is_retryable());
                if let AppError::NotionApi { code, .. } = err {
                    assert_eq!(code, NotionErrorCode::RateLimited);
                }
            }
            other => panic!("expected NotionApi error, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_error_falls_back_to_status() {
        let result: Result<Value, _> =
            parse_api_response(response(StatusCode::BAD_GATEWAY, "<html>oops</html>"));
        match result {
            Err(AppError::NotionService { code, status, .. }) => {
                assert_eq!(code, NotionErrorCode::HttpStatus(502));
                assert_eq!(status, 502);
            }
            other => panic!("expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn test_blocks_pagination() {
        let body = r#"{
            "object": "list",
            "results": [
                { "object": "block", "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
                  "type": "divider", "divider": {} },
                { "object": "block", "id": "59833787-2cf9-4fdf-8782-e53db20768a6",
                  "type": "breadcrumb", "breadcrumb": {} }
            ],
            "next_cursor": "cursor-2",
            "has_more": true,
            "type": "block",
            "block": {}
        }"#;

        let page = parse_blocks_pagination(response(StatusCode::OK, body)).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].block_type(), "divider");
        assert_eq!(page.results[1].block_type(), "breadcrumb");
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    }

    #[test]
    fn test_page_summary_from_raw_properties() {
        let value = serde_json::json!({
            "object": "page",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "url": "https://www.notion.so/Target-598337872cf94fdf8782e53db20768a5",
            "properties": {
                "Name": { "id": "title", "type": "title",
                          "title": [{ "plain_text": "Tar" }, { "plain_text": "get" }] },
                "URL": { "id": "abc", "type": "url", "url": "https://example.com/public" }
            }
        });

        let summary = summary_from_value(&value).unwrap();
        assert_eq!(
            summary,
            PageSummary {
                title: "Target".to_string(),
                url: "https://www.notion.so/Target-598337872cf94fdf8782e53db20768a5".to_string(),
                public_url: Some("https://example.com/public".to_string()),
            }
        );
    }

    #[test]
    fn test_page_summary_empty_url_property_is_absent() {
        let value = serde_json::json!({
            "url": "https://www.notion.so/x",
            "properties": { "URL": { "type": "url", "url": "" } }
        });
        assert_eq!(summary_from_value(&value).unwrap().public_url, None);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let body = "é".repeat(ERROR_BODY_PREVIEW_LENGTH);
        let shown = preview(&body);
        assert!(shown.ends_with("..."));
        assert!(shown.len() <= ERROR_BODY_PREVIEW_LENGTH + 3);
    }
}
