//! Page descriptors for server-paged listings and client-side slicing.

use serde::{Deserialize, Serialize};

/// Posts shown per page in the public blog listing.
pub const BLOG_POSTS_PER_PAGE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let info = PageInfo::new(total, page, limit);
        Self {
            data,
            total,
            page: info.page,
            limit: info.limit,
            total_pages: info.total_pages,
            has_next_page: info.has_next_page,
            has_prev_page: info.has_prev_page,
        }
    }

    pub fn empty(limit: u32) -> Self {
        Self::new(Vec::new(), 0, 1, limit)
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}

/// Pagination arithmetic without the page contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit));
        Self {
            total,
            page,
            limit,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            has_next_page: u64::from(page) * u64::from(limit) < total,
            has_prev_page: page > 1,
        }
    }

    /// Recompute for a new total, keeping page and limit.
    pub fn with_total(&self, total: u64) -> Self {
        Self::new(total, self.page, self.limit)
    }
}

/// Slice a fully-loaded collection client-side. Out-of-range pages are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page);
    let data = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect::<Vec<_>>();

    let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    Page::new(data, items.len() as u64, to_u32(page), to_u32(per_page))
}
