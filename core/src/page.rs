//! Filters, page windows and the signed page result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assemble::{assemble, ListPolicy};
use crate::model::{AssetId, AssetRow, SignedAsset};
use crate::signature::sign;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_MAX_LIMIT: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page must be >= 1, got {0}")]
    Page(u32),
    #[error("limit must be between 1 and {max}, got {got}")]
    Limit { got: u32, max: u32 },
}

/// Selection predicate shared by the count and page queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilter {
    pub id: Option<AssetId>,
    /// Substring match on host.
    pub host: Option<String>,
}

impl AssetFilter {
    pub fn new(id: Option<AssetId>, host: Option<String>) -> Self {
        AssetFilter { id, host: host.filter(|h| !h.is_empty()) }
    }
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::Page(page));
        }
        if limit == 0 || limit > max_limit {
            return Err(PageError::Limit { got: limit, max: max_limit });
        }
        Ok(PageRequest { page, limit })
    }

    pub fn window(&self) -> Window {
        let limit = u64::from(self.limit);
        Window { offset: u64::from(self.page.saturating_sub(1)) * limit, limit }
    }
}

/// Row-skip and row-take pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Signed assets for one page plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPage {
    pub assets: Vec<SignedAsset>,
    pub total: u64,
}

pub fn build_page(rows: Vec<AssetRow>, total: u64, policy: ListPolicy) -> AssetPage {
    let assets = rows.into_iter().map(|r| sign(assemble(r, policy))).collect();
    AssetPage { assets, total }
}

pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_of_ten() {
        let w = PageRequest::new(2, 10, 100).unwrap().window();
        assert_eq!(w, Window { offset: 10, limit: 10 });
    }

    #[test]
    fn first_page_has_zero_offset() {
        assert_eq!(PageRequest::default().window(), Window { offset: 0, limit: DEFAULT_LIMIT as u64 });
    }

    #[test]
    fn large_pages_do_not_overflow() {
        let w = PageRequest::new(u32::MAX, 100, 100).unwrap().window();
        assert_eq!(w.offset, (u32::MAX as u64 - 1) * 100);
    }

    #[test]
    fn rejects_bad_page_and_limit() {
        assert_eq!(PageRequest::new(0, 10, 100), Err(PageError::Page(0)));
        assert_eq!(PageRequest::new(1, 0, 100), Err(PageError::Limit { got: 0, max: 100 }));
        assert_eq!(PageRequest::new(1, 101, 100), Err(PageError::Limit { got: 101, max: 100 }));
    }

    #[test]
    fn empty_host_filter_is_absent() {
        assert_eq!(AssetFilter::new(None, Some(String::new())), AssetFilter::default());
        assert_eq!(AssetFilter::new(Some(4), Some("web".into())).host.as_deref(), Some("web"));
    }

    #[test]
    fn build_page_keeps_order_and_total() {
        let rows = (1..=3)
            .map(|i| AssetRow { id: i, host: format!("h{i}"), ip_csv: "10.0.0.1".into(), port_csv: "22".into(), ..Default::default() })
            .collect();
        let page = build_page(rows, 25, ListPolicy::Legacy);
        assert_eq!(page.total, 25);
        assert_eq!(page.assets.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(page.assets.iter().all(|a| a.verify()));
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
    }
}
