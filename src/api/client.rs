use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::auth::AuthPolicy;
use crate::fetch::{ApiEnvelope, FetchError, FetchResult};
use crate::i18n::Locale;
use crate::state::LocaleState;

/// HTTP client for the backend REST API.
///
/// Every request carries the locale twice: as the `locale` query parameter
/// and as `Accept-Language`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    locale: Arc<LocaleState>,
    auth: Arc<AuthPolicy>,
}

impl ApiClient {
    /// What: Build a client for `base_url`.
    ///
    /// Inputs:
    /// - `base_url`: API root such as `https://example.com/api`
    /// - `timeout`: Per-request upper bound
    /// - `locale`: Locale state read for requests that do not name a locale
    /// - `auth`: Token source and 401 policy
    ///
    /// # Errors
    /// - `FetchError::Transport` when the HTTP client cannot be constructed
    pub fn new(
        base_url: &str,
        timeout: Duration,
        locale: Arc<LocaleState>,
        auth: Arc<AuthPolicy>,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(15)))
            .timeout(timeout)
            .user_agent(format!("lisan/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            locale,
            auth,
        })
    }

    /// API root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authentication policy shared with the rest of the app.
    #[must_use]
    pub const fn auth(&self) -> &Arc<AuthPolicy> {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// What: `GET <base>/<path>?locale=<code>&...` decoded as an envelope.
    ///
    /// Inputs:
    /// - `locale`: Locale captured by the caller at dispatch time
    /// - `authenticated`: Attach the bearer token
    ///
    /// # Errors
    /// - `Unauthorized` when a token is required but missing, or the server answers 401
    /// - `Timeout` / `Transport` for network failures
    /// - `Status` / `Decode` for unusable responses
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        locale: Locale,
        authenticated: bool,
    ) -> FetchResult<T> {
        let url = self.url(path);
        let builder = self
            .http
            .get(&url)
            .query(&[("locale", locale.code())])
            .query(query);
        let builder = self.prepare(builder, locale, authenticated)?;
        self.execute(builder, &url).await
    }

    /// What: `POST` a JSON body (bookings, reviews, contact forms) in the active locale.
    ///
    /// # Errors
    /// - Same as [`get`](Self::get)
    pub async fn post_json<B, T>(&self, path: &str, body: &B, authenticated: bool) -> FetchResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let locale = self.locale.current();
        let url = self.url(path);
        let builder = self
            .http
            .post(&url)
            .query(&[("locale", locale.code())])
            .json(body);
        let builder = self.prepare(builder, locale, authenticated)?;
        self.execute(builder, &url).await
    }

    fn prepare(
        &self,
        builder: RequestBuilder,
        locale: Locale,
        authenticated: bool,
    ) -> Result<RequestBuilder, FetchError> {
        let builder = builder.header(ACCEPT_LANGUAGE, locale.code());
        if !authenticated {
            return Ok(builder);
        }
        match self.auth.bearer() {
            Some(token) => Ok(builder.bearer_auth(token.as_str())),
            None => {
                tracing::debug!("authenticated request without a session token");
                Err(FetchError::Unauthorized)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> FetchResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&e, url))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.auth.handle_unauthorized();
            return Err(FetchError::Unauthorized);
        }
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e, url))?;
        tracing::debug!(url, status = status.as_u16(), bytes = body.len(), "api response");
        decode_body(status.as_u16(), &body)
    }

    fn transport_error(&self, err: &reqwest::Error, url: &str) -> FetchError {
        tracing::warn!(url, error = %err, "api request failed");
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// What: Turn a status code and body into an envelope.
///
/// Details:
/// - 2xx: the body must be an envelope for `T`; an empty body is an empty success
/// - Other statuses: a JSON object body becomes a failed envelope carrying its
///   `message`; anything else is `FetchError::Status`
pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> FetchResult<T> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(ApiEnvelope::empty());
        }
        return serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()));
    }
    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        Ok(envelope) => Ok(ApiEnvelope::failure(envelope.message)),
        Err(_) => Err(FetchError::Status { status }),
    }
}
