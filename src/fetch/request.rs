use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::envelope::ApiEnvelope;
use super::error::FetchError;
use crate::i18n::Locale;

/// Active non-text filters (`category=3`, `status=paid`), ordered for stable keys.
pub type Filters = BTreeMap<String, String>;

/// Query keys the request builder owns; filters may not use them.
pub const RESERVED_QUERY_KEYS: [&str; 3] = ["locale", "search", "page"];

/// Whether `key` names a query parameter set from request state rather than filters.
#[must_use]
pub fn is_reserved_query_key(key: &str) -> bool {
    RESERVED_QUERY_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// What caused a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// First fetch after mounting.
    Mount,
    /// The locale-changed notification reached the section.
    LocaleChanged,
    /// A non-text filter changed.
    Filter,
    /// The debounced search text settled.
    Search,
    /// The page changed.
    Page,
    /// Explicit user retry.
    Retry,
}

impl Trigger {
    /// Label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::LocaleChanged => "locale",
            Self::Filter => "filter",
            Self::Search => "search",
            Self::Page => "page",
            Self::Retry => "retry",
        }
    }
}

/// One dispatched unit of work for a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Section that issued the request.
    pub section: Arc<str>,
    /// Locale read from the locale state at dispatch time.
    pub locale: Locale,
    /// Non-text filters.
    pub filters: Filters,
    /// Settled search text, `None` when empty.
    pub search: Option<String>,
    /// 1-based page (always 1 for unpaginated sections).
    pub page: u32,
    /// Per-section dispatch sequence number; only the latest may commit.
    pub seq: u64,
    /// What caused the dispatch.
    pub trigger: Trigger,
}

impl FetchRequest {
    /// Cache identity of this request for `resource`.
    #[must_use]
    pub fn key(&self, resource: &str) -> FetchKey {
        FetchKey {
            resource: resource.to_string(),
            locale: self.locale,
            filters: self.filters.clone(),
            search: self.search.clone(),
            page: self.page,
        }
    }

    /// What: Query parameters other than `locale` (the API client adds that itself).
    ///
    /// Details:
    /// - Filters named like a reserved key are dropped so `locale`, `search`
    ///   and `page` each appear at most once, with the request's own values
    #[must_use]
    pub fn query_pairs(&self, paginated: bool) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .filters
            .iter()
            .filter(|(k, _)| {
                let reserved = is_reserved_query_key(k);
                if reserved {
                    tracing::debug!(key = %k, "dropping filter that shadows a reserved query key");
                }
                !reserved
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(search) = &self.search {
            out.push(("search".to_string(), search.clone()));
        }
        if paginated {
            out.push(("page".to_string(), self.page.to_string()));
        }
        out
    }
}

/// `{resource, locale, filters, search, page}`: what makes two requests identical.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchKey {
    /// Resource path or section id.
    pub resource: String,
    /// Locale of the request.
    pub locale: Locale,
    /// Non-text filters.
    pub filters: Filters,
    /// Search text.
    pub search: Option<String>,
    /// Page number.
    pub page: u32,
}

/// How a section treats previously loaded data when a fetch fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep the last good data visible next to the error.
    #[default]
    KeepStale,
    /// Drop data so the section shows its empty state with the error.
    Clear,
}

/// Per-section behaviour knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionOptions {
    /// Quiet period after the last search keystroke.
    pub debounce: Duration,
    /// Upper bound on a single fetch.
    pub timeout: Duration,
    /// Whether the section pages (locale changes reset it to page 1).
    pub paginated: bool,
    /// Data handling on failure.
    pub error_policy: ErrorPolicy,
    /// Serve identical requests from cache for this long; `None` disables.
    pub cache_ttl: Option<Duration>,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            paginated: false,
            error_policy: ErrorPolicy::KeepStale,
            cache_ttl: None,
        }
    }
}

impl SectionOptions {
    /// Options for a paginated section.
    #[must_use]
    pub fn paginated() -> Self {
        Self {
            paginated: true,
            ..Self::default()
        }
    }
}

/// Result of one fetch.
pub type FetchResult<T> = Result<ApiEnvelope<T>, FetchError>;

/// Source of a section's data.
///
/// Implemented by the REST adapter and by any `Fn(FetchRequest) -> Future`.
pub trait SectionFetcher<T>: Send + Sync + 'static {
    /// Perform the request. Cancellation happens by dropping the future.
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult<T>> + Send;
}

impl<T, F, Fut> SectionFetcher<T> for F
where
    F: Fn(FetchRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult<T>> + Send + 'static,
{
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult<T>> + Send {
        self(request)
    }
}
