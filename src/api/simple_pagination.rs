// src/api/simple_pagination.rs
//! Cursor pagination with an explicit page cap.

use super::types::{PageLimit, PaginatedResponse, PaginationResult};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Fetches every page of a cursor-paginated listing, in order.
///
/// Fails with `AppError::PaginationOverrun` when the listing still reports
/// more results after `limit` pages have been consumed. `owner` names the
/// block whose children are being listed and only feeds the error.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    limit: PageLimit,
    owner: &str,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    while pages_fetched < limit.max_pages() {
        let response = fetch_fn(NOTION_API_PAGE_SIZE as u32, cursor).await?;
        pages_fetched += 1;
        all_items.extend(response.results);

        cursor = if response.has_more {
            response.next_cursor
        } else {
            None
        };

        if cursor.is_none() {
            return Ok(PaginationResult {
                items: all_items,
                pages_fetched,
            });
        }
    }

    log::error!(
        "Child list of {} still has more results after {} pages",
        owner,
        limit.max_pages()
    );
    Err(AppError::PaginationOverrun {
        block_id: owner.to_string(),
        max_pages: limit.max_pages(),
    })
}
