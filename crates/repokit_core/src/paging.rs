//! Paging normalization.
//!
//! Caller-owned configuration instead of process-wide mutable values, so
//! concurrent callers with different limits never observe each other.

/// Default rows per page when the requested size is unusable.
pub const DEFAULT_QUERY_SIZE: u32 = 20;
/// Upper bound on rows per page.
pub const MAX_QUERY_SIZE: u32 = 500;

/// Paging limits owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub max_query_size: u32,
    pub default_query_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_query_size: MAX_QUERY_SIZE,
            default_query_size: DEFAULT_QUERY_SIZE,
        }
    }
}

impl PagingConfig {
    /// Maps `(page, size)` to `(offset, limit)`.
    ///
    /// `page <= 0` normalizes to 1; `size <= 0` or `size > max_query_size`
    /// normalizes to `default_query_size`. Pure, no failure mode: an offset
    /// past `u64::MAX` saturates, which reads as an empty page.
    pub fn params(&self, page: i64, size: i64) -> (u64, u64) {
        let page = if page <= 0 { 1 } else { page as u64 };
        let size = if size <= 0 || size as u64 > u64::from(self.max_query_size) {
            u64::from(self.default_query_size)
        } else {
            size as u64
        };
        (page.saturating_sub(1).saturating_mul(size), size)
    }
}
