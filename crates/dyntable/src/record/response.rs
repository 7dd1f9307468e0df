use crate::{RecordQueryOptions, Value};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field code to value, in field order.
pub type Record = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Record key. Managed tables use integer ids; external tables use their
    /// primary key, or null when they have none.
    pub id: Value,

    pub data: Record,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(opts: &RecordQueryOptions, total: u64) -> Pagination {
        let limit = opts.effective_limit();

        Pagination {
            page: opts.effective_page(),
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

impl RecordListResponse {
    pub fn new(
        records: Vec<RecordResponse>,
        total: u64,
        opts: &RecordQueryOptions,
    ) -> RecordListResponse {
        RecordListResponse {
            records,
            pagination: Pagination::new(opts, total),
        }
    }
}
