use std::ops::Range;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&page_size=` on listing endpoints. Pages start at 1.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: first_page(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page starts at 1".to_string());
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        Ok(())
    }

    /// Index range of this page within `len` ordered items, clamped to the list.
    pub fn window(&self, len: usize) -> Range<usize> {
        let size = self.page_size as usize;
        let start = (self.page.saturating_sub(1) as usize)
            .saturating_mul(size)
            .min(len);
        start..start.saturating_add(size).min(len)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    fn for_params(params: &PaginationParams, total_items: usize) -> Self {
        let total_pages = total_items.div_ceil(params.page_size.max(1) as usize);
        Self {
            page: params.page,
            page_size: params.page_size,
            total_items: total_items as i64,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

/// One page of an ordered listing plus where it sits in the whole.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Cuts one page out of an already ordered list.
    pub fn from_ordered(mut items: Vec<T>, params: &PaginationParams) -> Self {
        let pagination = PaginationMeta::for_params(params, items.len());
        let window = params.window(items.len());
        items.truncate(window.end);
        let data = items.split_off(window.start);
        Self { data, pagination }
    }
}
