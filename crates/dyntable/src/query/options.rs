use super::FilterItem;
use dyntable_core::stmt::{Direction, Limit};

use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for none.
pub const DEFAULT_LIMIT: u64 = 20;

/// Largest page a caller can ask for.
pub const MAX_LIMIT: u64 = 100;

/// Backends take a signed 64-bit offset. Pages past it are empty anyway.
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordQueryOptions {
    /// 1-based page number. `0` is treated as `1`.
    pub page: u64,

    /// Page size. `0` means [`DEFAULT_LIMIT`]; larger than [`MAX_LIMIT`] is
    /// clamped.
    pub limit: u64,

    /// Field code or system column to sort by. Anything else falls back to
    /// ascending `id` order.
    pub sort: String,

    pub order: Direction,

    /// Conjunction of filters.
    pub filters: Vec<FilterItem>,
}

impl RecordQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort: impl Into<String>, order: Direction) -> Self {
        self.sort = sort.into();
        self.order = order;
        self
    }

    pub fn filter(mut self, filter: FilterItem) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn effective_page(&self) -> u64 {
        self.page.max(1)
    }

    pub fn effective_limit(&self) -> u64 {
        match self.limit {
            0 => DEFAULT_LIMIT,
            limit => limit.min(MAX_LIMIT),
        }
    }

    /// `LIMIT`/`OFFSET` of the requested page.
    pub(crate) fn to_limit(&self) -> Limit {
        let limit = self.effective_limit();
        let offset = (self.effective_page() - 1)
            .saturating_mul(limit)
            .min(MAX_OFFSET);

        Limit {
            limit,
            offset: (offset > 0).then_some(offset),
        }
    }
}
