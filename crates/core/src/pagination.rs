//! "Load more" pagination.
//!
//! The catalog API has no offsets or cursors, only a `limit`. Loading more
//! means asking again for the whole list with a larger limit and replacing
//! what is shown.

/// Base page size on the storefront.
pub const STOREFRONT_PAGE_SIZE: u32 = 12;

/// Base page size in the admin panel.
pub const ADMIN_PAGE_SIZE: u32 = 10;

/// Upper bound on any limit accepted from a query string. The effective cap
/// is the largest multiple of the step at or below this.
pub const MAX_LIMIT: u32 = 500;

/// Cursor for a list that grows by a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMore {
    base: u32,
    limit: u32,
}

impl LoadMore {
    /// Cursor starting at `base`, growing by `base`.
    #[must_use]
    pub const fn new(base: u32) -> Self {
        let base = if base == 0 { 1 } else { base };
        Self { base, limit: base }
    }

    #[must_use]
    pub const fn storefront() -> Self {
        Self::new(STOREFRONT_PAGE_SIZE)
    }

    #[must_use]
    pub const fn admin() -> Self {
        Self::new(ADMIN_PAGE_SIZE)
    }

    /// Rebuild the cursor from a `limit` query parameter.
    ///
    /// Missing or below-base values become the base; others are rounded up
    /// to a multiple of the step and capped at [`Self::cap`].
    #[must_use]
    pub fn from_requested(base: u32, requested: Option<u32>) -> Self {
        let mut cursor = Self::new(base);
        if let Some(requested) = requested.filter(|&r| r > cursor.base) {
            let cap = cursor.cap();
            let steps = requested.min(cap).div_ceil(cursor.base);
            cursor.limit = (steps * cursor.base).min(cap);
        }
        cursor
    }

    /// Same as [`Self::from_requested`] for a raw query string value.
    #[must_use]
    pub fn from_query(base: u32, raw: Option<&str>) -> Self {
        Self::from_requested(base, raw.and_then(|r| r.trim().parse().ok()))
    }

    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Largest limit this cursor will request: the biggest multiple of the
    /// step not above [`MAX_LIMIT`], and never below one step.
    #[must_use]
    pub const fn cap(&self) -> u32 {
        let cap = MAX_LIMIT / self.base * self.base;
        if cap < self.base { self.base } else { cap }
    }

    /// Limit a "Load more" control should request.
    #[must_use]
    pub const fn next_limit(&self) -> u32 {
        self.limit.saturating_add(self.base)
    }

    /// Grow the limit by one step.
    pub const fn load_more(&mut self) {
        self.limit = self.next_limit();
    }

    /// Back to the first page. Any refilter goes through here.
    pub const fn reset(&mut self) {
        self.limit = self.base;
    }

    /// Whether another page may exist after `returned` records came back.
    ///
    /// Always `false` once the cap is reached, since a larger limit would be
    /// normalized back to the same one.
    #[must_use]
    pub const fn has_more(&self, returned: usize) -> bool {
        returned == self.limit as usize && self.limit < self.cap()
    }

    /// Keep at most `limit` records and report whether more may exist.
    #[must_use]
    pub fn clamp<T>(&self, mut records: Vec<T>) -> (Vec<T>, bool) {
        records.truncate(self.limit as usize);
        let has_more = self.has_more(records.len());
        (records, has_more)
    }
}

impl Default for LoadMore {
    fn default() -> Self {
        Self::storefront()
    }
}
