//! Listing helpers shared by every `get` command

use std::future::Future;

use tracing::debug;

use crate::constants::ALL_PAGES_PER_PAGE;

/// Position in a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    pub page: u32,
    pub per_page: u32,
}

impl ListCursor {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// One page of results plus whether the server has more
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub is_last: bool,
}

impl<T> Page<T> {
    /// A page is the last one when it holds fewer items than were asked for
    pub fn from_items(items: Vec<T>, per_page: u32) -> Self {
        let is_last = items.len() < per_page as usize;
        Self { items, is_last }
    }
}

/// Fetch one page, or every page when `all` is set
///
/// Without `all`, exactly one call is made with the given cursor. With `all`,
/// listing restarts at page 1 with the maximum page size and keeps going until
/// a page reports itself as the last one. Any failed call aborts the whole
/// listing; partial results are dropped.
pub async fn paginate<T, E, F, Fut>(all: bool, cursor: ListCursor, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(ListCursor) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    if !all {
        return Ok(fetch(cursor).await?.items);
    }

    let mut cursor = ListCursor::new(1, ALL_PAGES_PER_PAGE);
    let mut acc = Vec::new();
    loop {
        let page = fetch(cursor).await?;
        debug!(page = cursor.page, items = page.items.len(), "fetched page");
        let done = page.is_last || page.items.is_empty();
        acc.extend(page.items);
        if done {
            break;
        }
        cursor.page += 1;
    }
    Ok(acc)
}
