//! Pagination for list endpoints

use serde::{Deserialize, Serialize};

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

/// Query parameters for paginated list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageParams {
    /// Clamp page to >= 1 and limit to 1..=max
    pub fn clamped(&self, max_limit: u64) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit),
        }
    }

    /// Offset for database queries
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit
    }
}

/// Generic paginated response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        let total_pages = if params.limit == 0 {
            0
        } else {
            total.div_ceil(params.limit)
        };

        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }

    /// Map items to a different representation, keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let params = PageParams { page: 1, limit: 20 };
        assert_eq!(params.offset(), 0);

        let params = PageParams { page: 3, limit: 20 };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_clamping() {
        let params = PageParams { page: 0, limit: 500 }.clamped(100);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 100);

        let params = PageParams { page: 2, limit: 0 }.clamped(100);
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn test_total_pages_ceiling() {
        let params = PageParams { page: 1, limit: 20 };
        assert_eq!(Paginated::new(vec![0u8; 20], 41, params).total_pages, 3);
        assert_eq!(Paginated::new(vec![0u8; 20], 40, params).total_pages, 2);
        assert_eq!(Paginated::<u8>::new(vec![], 0, params).total_pages, 0);
    }
}
