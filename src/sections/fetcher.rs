use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::kind::SectionKind;
use crate::api::ApiClient;
use crate::fetch::{FetchRequest, FetchResult, SectionFetcher};

/// Fetches one [`SectionKind`] through the REST client.
///
/// The request's locale (read at dispatch time) is what goes on the wire.
pub struct ApiSectionFetcher<T> {
    client: Arc<ApiClient>,
    kind: SectionKind,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ApiSectionFetcher<T> {
    /// Fetcher for `kind` over `client`.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>, kind: SectionKind) -> Self {
        Self {
            client,
            kind,
            _payload: PhantomData,
        }
    }

    /// Section this fetcher serves.
    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        self.kind
    }
}

impl<T> SectionFetcher<T> for ApiSectionFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult<T>> + Send {
        let client = Arc::clone(&self.client);
        let kind = self.kind;
        async move {
            let query = request.query_pairs(kind.paginated());
            client
                .get(kind.path(), &query, request.locale, kind.requires_auth())
                .await
        }
    }
}
