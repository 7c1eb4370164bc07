//! Per-section data fetching: requests, envelopes, errors, and the section driver.
//!
//! A section is mounted from a [`Section`] definition and controlled through
//! the returned [`SectionHandle`]. Fetches run in the background; only the
//! most recent dispatch of a mounted section can reach its state.

mod cache;
mod envelope;
mod error;
mod request;
mod section;

pub use cache::ResponseCache;
pub use envelope::{ApiEnvelope, Page, Pagination, SectionData};
pub use error::FetchError;
pub use request::{
    ErrorPolicy, FetchKey, FetchRequest, FetchResult, Filters, RESERVED_QUERY_KEYS,
    SectionFetcher, SectionOptions, Trigger, is_reserved_query_key,
};
pub use section::{Section, SectionContext, SectionHandle, SectionState};
