use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::{AppError, Result};

pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("pagination");

/// One page of results plus the totals needed to page through the rest.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: i64, current_page: u32, page_size: u32) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            let pages = (total_count.max(0) as u64).div_ceil(u64::from(page_size));
            u32::try_from(pages).unwrap_or(u32::MAX)
        };

        Self {
            items,
            current_page,
            page_size,
            total_count,
            total_pages,
        }
    }

    pub fn map<U, F>(self, f: F) -> PagedList<U>
    where
        F: FnMut(T) -> U,
    {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl<T> From<&PagedList<T>> for PaginationHeader {
    fn from(list: &PagedList<T>) -> Self {
        Self {
            current_page: list.current_page,
            items_per_page: list.page_size,
            total_items: list.total_count,
            total_pages: list.total_pages,
        }
    }
}

/// Headers carrying the page metadata as JSON. The CORS layer exposes it to
/// browser clients.
pub fn pagination_headers<T>(list: &PagedList<T>) -> Result<HeaderMap> {
    let json = serde_json::to_string(&PaginationHeader::from(list))
        .map_err(|e| AppError::InternalError(format!("Failed to encode pagination: {}", e)))?;
    let value = HeaderValue::from_str(&json)
        .map_err(|e| AppError::InternalError(format!("Invalid pagination header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(PAGINATION_HEADER, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_total_pages_up() {
        let list = PagedList::new(vec![1, 2, 3], 23, 1, 10);
        assert_eq!(list.total_pages, 3);

        let list = PagedList::<u8>::new(vec![], 0, 1, 10);
        assert_eq!(list.total_pages, 0);

        let list = PagedList::new(vec![1; 10], 20, 2, 10);
        assert_eq!(list.total_pages, 2);
    }

    #[test]
    fn total_pages_saturates_instead_of_truncating() {
        let list = PagedList::<u8>::new(vec![], i64::MAX, 1, 50);
        assert_eq!(list.total_pages, u32::MAX);

        let list = PagedList::<u8>::new(vec![], u32::MAX as i64 * 50 + 1, 1, 50);
        assert_eq!(list.total_pages, u32::MAX);

        let list = PagedList::<u8>::new(vec![], -3, 1, 10);
        assert_eq!(list.total_pages, 0);
    }

    #[test]
    fn map_keeps_metadata() {
        let list = PagedList::new(vec![1, 2], 12, 2, 5).map(|n| n * 10);

        assert_eq!(list.items, vec![10, 20]);
        assert_eq!(list.current_page, 2);
        assert_eq!(list.total_pages, 3);
    }

    #[test]
    fn header_is_camel_case_json() {
        let list = PagedList::new(vec!['a'], 11, 2, 5);
        let headers = pagination_headers(&list).unwrap();

        let raw = headers.get(PAGINATION_HEADER).unwrap().to_str().unwrap();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["itemsPerPage"], 5);
        assert_eq!(value["totalItems"], 11);
        assert_eq!(value["totalPages"], 3);
    }
}
