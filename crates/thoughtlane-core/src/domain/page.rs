use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u64 = 5;
pub const MAX_PAGE_SIZE: u64 = 50;

/// Largest offset a store can bind; Postgres takes OFFSET as a signed bigint.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-indexed page request. Page 1 starts at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Build a page from raw query values. Missing or non-positive values
    /// fall back to page 1 and the default size; the size is capped.
    pub fn new(number: Option<i64>, size: Option<i64>) -> Self {
        let number = number.filter(|n| *n > 0).map_or(1, |n| n as u64);
        let size = size
            .filter(|s| *s > 0)
            .map_or(DEFAULT_PAGE_SIZE, |s| (s as u64).min(MAX_PAGE_SIZE));
        Self { number, size }
    }

    pub fn limit(&self) -> u64 {
        self.size
    }

    /// Rows to skip. Pages past the end of any real table clamp to
    /// `i64::MAX` and simply come back empty.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size).min(MAX_OFFSET)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// `?limit=&page=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(query.page, query.limit)
    }
}
