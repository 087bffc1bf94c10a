//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Paging request carried by every store query.
///
/// With `pagination` off the full result set is returned; `only_count`
/// skips loading rows and fills only `PageResult::total`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParam {
    pub pagination: bool,
    pub only_count: bool,
    pub current: u32,
    pub page_size: u32,
}

impl PaginationParam {
    pub fn count_only() -> Self {
        Self { only_count: true, ..Default::default() }
    }

    pub fn page(current: u32, page_size: u32) -> Self {
        Self { pagination: true, only_count: false, current, page_size }
    }

    /// Page number, 1-based
    pub fn current(&self) -> u32 {
        self.current.max(1)
    }

    pub fn page_size(&self) -> u32 {
        match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.current() - 1) * u64::from(self.page_size())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub total: u64,
    pub current: u32,
    pub page_size: u32,
}

/// Rows plus the paging summary of a store query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult<T> {
    pub data: Vec<T>,
    pub page_result: Option<PageResult>,
}

impl<T> QueryResult<T> {
    pub fn total(&self) -> u64 {
        self.page_result
            .as_ref()
            .map(|p| p.total)
            .unwrap_or(self.data.len() as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderField {
    pub key: String,
    pub direction: OrderDirection,
}

impl OrderField {
    pub fn new(key: &str, direction: OrderDirection) -> Self {
        Self { key: key.to_string(), direction }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResult {
    pub id: u64,
}

impl IdResult {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(PaginationParam::page(1, 0).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(PaginationParam::page(1, 1000).page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParam::page(0, 20).offset(), 0);
        assert_eq!(PaginationParam::page(3, 20).offset(), 40);
    }
}
