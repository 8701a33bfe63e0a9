use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Validated page coordinates: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Number of rows to skip before the first row of this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Row window handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: Option<u64>,
}

impl Window {
    pub const ALL: Window = Window {
        offset: 0,
        limit: None,
    };
}

impl From<PageRequest> for Window {
    fn from(page: PageRequest) -> Self {
        Self {
            offset: page.skip(),
            limit: Some(u64::from(page.limit)),
        }
    }
}

/// A validated list request: page coordinates plus resource-specific filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery<F> {
    pub page: PageRequest,
    pub filter: F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl PaginationMeta {
    pub fn new(page: PageRequest, total_items: u64) -> Self {
        // limit is only zero on hand-built requests
        let per_page = u64::from(page.limit.max(1));
        Self {
            current_page: page.page,
            total_pages: total_items.div_ceil(per_page),
            total_items,
            items_per_page: page.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            pagination: PaginationMeta::new(page, total_items),
        }
    }
}
