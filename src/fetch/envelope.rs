//! Response envelope shared by every endpoint, plus pagination.

use serde::{Deserialize, Serialize};

/// `{ success, data?, message? }` returned by every endpoint.
///
/// `data` may be absent even when `success` is true; consumers must check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Server-side verdict.
    #[serde(default)]
    pub success: bool,
    /// Payload, when the server sent one.
    pub data: Option<T>,
    /// Human-readable message (validation or business failure text).
    #[serde(default)]
    pub message: Option<String>,
    /// Pagination sent next to `data` (`pagination` or `meta`).
    #[serde(default, alias = "meta", skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    /// Successful envelope without a payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            pagination: None,
        }
    }

    /// Failed envelope with an optional server message.
    #[must_use]
    pub fn failure(message: impl Into<Option<String>>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            pagination: None,
        }
    }

    /// Server message if it is non-blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// `{ current_page, per_page, total, last_page, from, to }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub current_page: u32,
    /// Page size.
    #[serde(default)]
    pub per_page: u32,
    /// Total item count.
    #[serde(default)]
    pub total: u64,
    /// Last page number (at least 1).
    #[serde(default = "one")]
    pub last_page: u32,
    /// 1-based index of the first item on this page; absent on empty pages.
    #[serde(default)]
    pub from: Option<u64>,
    /// 1-based index of the last item on this page; absent on empty pages.
    #[serde(default)]
    pub to: Option<u64>,
}

const fn one() -> u32 {
    1
}

impl Pagination {
    /// Whether another page follows.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// Paginator payload: `data` items plus the pagination fields at the same level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(rename = "data", default = "Vec::new")]
    pub items: Vec<T>,
    /// Position of this page.
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Payload types a section can hold.
pub trait SectionData: Clone + Send + Sync + 'static {
    /// Pagination embedded in the payload, if any.
    fn pagination(&self) -> Option<Pagination> {
        None
    }
}

impl<T: Clone + Send + Sync + 'static> SectionData for Vec<T> {}

impl<T: Clone + Send + Sync + 'static> SectionData for Page<T> {
    fn pagination(&self) -> Option<Pagination> {
        Some(self.pagination)
    }
}

impl SectionData for serde_json::Value {
    /// Untyped payloads expose pagination when they look like a paginator.
    fn pagination(&self) -> Option<Pagination> {
        let looks_paged = self.get("current_page").is_some()
            && self.get("data").is_some_and(serde_json::Value::is_array);
        if !looks_paged {
            return None;
        }
        Pagination::deserialize(self).ok()
    }
}

impl SectionData for String {}
