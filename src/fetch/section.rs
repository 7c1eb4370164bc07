//! Per-section fetch driver.
//!
//! Every mounted section owns a small driver task fed by an unbounded command
//! channel. The bridge handler registered at mount time only enqueues a
//! command (notify phase); the driver performs the dispatch (react phase).
//! Each dispatch is tagged with a sequence number, and a result may only be
//! committed while it is still the latest one, the section is mounted, and
//! its locale is still the active locale.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tokio::time::{Instant, sleep_until};

use super::cache::ResponseCache;
use super::envelope::{ApiEnvelope, Pagination, SectionData};
use super::error::FetchError;
use super::request::{
    ErrorPolicy, FetchRequest, FetchResult, Filters, SectionFetcher, SectionOptions, Trigger,
    is_reserved_query_key,
};
use crate::bridge::Subscription;
use crate::i18n::{Catalog, Locale};
use crate::state::LocaleState;

/// Observable state of one section.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionState<T> {
    /// Last committed payload; `None` before the first success or after a clearing error.
    pub data: Option<T>,
    /// A dispatch is outstanding.
    pub loading: bool,
    /// Localized, user-facing error of the last committed failure.
    pub error: Option<String>,
    /// Active non-text filters.
    pub filters: Filters,
    /// Search text as typed (the fetch uses it once the debounce settles).
    pub search: String,
    /// Current 1-based page.
    pub page: u32,
    /// Pagination of the committed payload.
    pub pagination: Option<Pagination>,
    /// Locale the committed payload was fetched in.
    pub locale: Option<Locale>,
    /// Sequence number of the last committed dispatch (0 = none yet).
    pub committed_seq: u64,
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            filters: Filters::new(),
            search: String::new(),
            page: 1,
            pagination: None,
            locale: None,
            committed_seq: 0,
        }
    }
}

impl<T> SectionState<T> {
    /// Nothing to show and nothing on the way.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_none() && !self.loading
    }

    fn search_param(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Stores a section needs from the surrounding application.
#[derive(Clone, Debug)]
pub struct SectionContext {
    /// Source of the active locale and of change notifications.
    pub locale: Arc<LocaleState>,
    /// Messages for localized error fallbacks.
    pub catalog: Arc<Catalog>,
}

impl SectionContext {
    /// Bundle the shared stores.
    #[must_use]
    pub const fn new(locale: Arc<LocaleState>, catalog: Arc<Catalog>) -> Self {
        Self { locale, catalog }
    }
}

#[derive(Debug)]
enum Command {
    Dispatch(Trigger),
    Search,
    Stop,
}

struct Shared<T> {
    id: Arc<str>,
    state: watch::Sender<SectionState<T>>,
    latest_seq: AtomicU64,
    mounted: AtomicBool,
    inflight: Mutex<Option<AbortHandle>>,
    options: SectionOptions,
    cache: Option<ResponseCache<T>>,
    ctx: SectionContext,
}

impl<T: SectionData> Shared<T> {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Flip the mounted flag while holding the state lock so no commit can
    /// be half-way through a write once this returns.
    fn mark_unmounted(&self) -> bool {
        let mut was_mounted = false;
        self.state.send_if_modified(|_| {
            was_mounted = self.mounted.swap(false, Ordering::AcqRel);
            false
        });
        was_mounted
    }

    fn abort_inflight(&self) {
        let previous = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = previous {
            handle.abort();
        }
    }

    fn cache_key_resource(&self) -> &str {
        &self.id
    }
}

/// What: Start a fetch for the section's current parameters.
///
/// Details:
/// - The locale is read from the locale state now, never captured earlier
/// - The sequence number is bumped under the state lock together with
///   `loading = true`, so commits observe a consistent pair
/// - Any previous in-flight task is aborted; its result could not commit anyway
fn dispatch<T, F>(shared: &Arc<Shared<T>>, fetcher: &Arc<F>, trigger: Trigger)
where
    T: SectionData,
    F: SectionFetcher<T>,
{
    if !shared.is_mounted() {
        return;
    }
    let locale = shared.ctx.locale.current();
    let mut request = None;
    shared.state.send_modify(|st| {
        if trigger == Trigger::LocaleChanged && shared.options.paginated {
            st.page = 1;
        }
        let seq = shared.latest_seq.fetch_add(1, Ordering::AcqRel) + 1;
        st.loading = true;
        request = Some(FetchRequest {
            section: Arc::clone(&shared.id),
            locale,
            filters: st.filters.clone(),
            search: st.search_param(),
            page: if shared.options.paginated { st.page } else { 1 },
            seq,
            trigger,
        });
    });
    let Some(request) = request else {
        return;
    };
    tracing::info!(
        section = %shared.id,
        seq = request.seq,
        trigger = trigger.as_str(),
        locale = %locale,
        page = request.page,
        "dispatch"
    );
    shared.abort_inflight();

    if let Some(cache) = &shared.cache
        && let Some(envelope) = cache.get(&request.key(shared.cache_key_resource()))
    {
        tracing::debug!(section = %shared.id, seq = request.seq, "served from response cache");
        commit(shared, &request, Ok(envelope));
        return;
    }

    let task_shared = Arc::clone(shared);
    let task_fetcher = Arc::clone(fetcher);
    let timeout = shared.options.timeout;
    let handle = tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, task_fetcher.fetch(request.clone())).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };
        if let (Some(cache), Ok(envelope)) = (&task_shared.cache, &result) {
            cache.put(request.key(task_shared.cache_key_resource()), envelope);
        }
        commit(&task_shared, &request, result);
    });
    *shared
        .inflight
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(handle.abort_handle());
}

/// What: Apply a finished fetch to the section state if it is still relevant.
///
/// Output:
/// - `true` when the result was committed
///
/// Details:
/// - Dropped silently when unmounted, superseded, or fetched in a locale that
///   is no longer active
fn commit<T: SectionData>(
    shared: &Shared<T>,
    request: &FetchRequest,
    result: FetchResult<T>,
) -> bool {
    let active_locale = shared.ctx.locale.current();
    let mut result = Some(result);
    shared.state.send_if_modified(|st| {
        if !shared.is_mounted() {
            tracing::trace!(section = %shared.id, seq = request.seq, "result after unmount dropped");
            return false;
        }
        let latest = shared.latest_seq.load(Ordering::Acquire);
        if request.seq != latest {
            tracing::trace!(section = %shared.id, seq = request.seq, latest, "stale result dropped");
            return false;
        }
        if request.locale != active_locale {
            tracing::trace!(
                section = %shared.id,
                seq = request.seq,
                fetched = %request.locale,
                active = %active_locale,
                "result for inactive locale dropped"
            );
            return false;
        }
        let Some(result) = result.take() else {
            return false;
        };
        apply(shared, st, request, result);
        true
    })
}

fn apply<T: SectionData>(
    shared: &Shared<T>,
    st: &mut SectionState<T>,
    request: &FetchRequest,
    result: FetchResult<T>,
) {
    st.loading = false;
    st.committed_seq = request.seq;
    match result {
        Ok(ApiEnvelope {
            success: true,
            data,
            pagination,
            ..
        }) => {
            st.pagination = pagination.or_else(|| data.as_ref().and_then(SectionData::pagination));
            st.data = data;
            st.error = None;
            st.locale = Some(request.locale);
            tracing::debug!(
                section = %shared.id,
                seq = request.seq,
                has_data = st.data.is_some(),
                "committed"
            );
        }
        Ok(envelope) => {
            let message = envelope.message().map_or_else(
                || shared.ctx.catalog.t(request.locale, "errors.generic"),
                str::to_string,
            );
            tracing::warn!(section = %shared.id, seq = request.seq, message = %message, "request rejected");
            fail(shared, st, message);
        }
        Err(err) => {
            tracing::warn!(section = %shared.id, seq = request.seq, error = %err, "fetch failed");
            fail(shared, st, err.user_message(&shared.ctx.catalog, request.locale));
        }
    }
}

fn fail<T>(shared: &Shared<T>, st: &mut SectionState<T>, message: String) {
    st.error = Some(message);
    if shared.options.error_policy == ErrorPolicy::Clear {
        st.data = None;
        st.pagination = None;
        st.locale = None;
    }
}

/// Driver: debounces search, forwards immediate triggers.
async fn drive<T, F>(
    shared: Arc<Shared<T>>,
    fetcher: Arc<F>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) where
    T: SectionData,
    F: SectionFetcher<T>,
{
    let mut deadline: Option<Instant> = None;
    loop {
        let next = match deadline {
            Some(at) => select! {
                cmd = commands.recv() => cmd,
                () = sleep_until(at) => {
                    deadline = None;
                    dispatch(&shared, &fetcher, Trigger::Search);
                    continue;
                }
            },
            None => commands.recv().await,
        };
        match next {
            Some(Command::Search) => {
                let now = Instant::now();
                deadline = Some(now.checked_add(shared.options.debounce).unwrap_or(now));
            }
            Some(Command::Dispatch(trigger)) => {
                // The immediate dispatch already carries the pending search text.
                deadline = None;
                dispatch(&shared, &fetcher, trigger);
            }
            Some(Command::Stop) | None => break,
        }
    }
    tracing::debug!(section = %shared.id, "section driver stopped");
}

/// Section definition waiting to be mounted.
pub struct Section<F> {
    id: Arc<str>,
    fetcher: F,
    options: SectionOptions,
}

impl<F> Section<F> {
    /// Section `id` backed by `fetcher`, with default options.
    pub fn new(id: impl Into<Arc<str>>, fetcher: F) -> Self {
        Self {
            id: id.into(),
            fetcher,
            options: SectionOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: SectionOptions) -> Self {
        self.options = options;
        self
    }

    /// What: Mount the section: subscribe to locale changes and dispatch the
    /// initial fetch.
    ///
    /// Output:
    /// - Handle controlling the section; dropping it unmounts
    ///
    /// # Panics
    /// - When called outside a Tokio runtime (the driver task is spawned)
    pub fn mount<T>(self, ctx: &SectionContext) -> SectionHandle<T>
    where
        T: SectionData,
        F: SectionFetcher<T>,
    {
        let (state, _) = watch::channel(SectionState::default());
        let shared = Arc::new(Shared {
            id: Arc::clone(&self.id),
            state,
            latest_seq: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
            inflight: Mutex::new(None),
            cache: self.options.cache_ttl.map(ResponseCache::new),
            options: self.options,
            ctx: ctx.clone(),
        });
        let fetcher = Arc::new(self.fetcher);
        let (tx, rx) = mpsc::unbounded_channel();

        let notify_tx = tx.clone();
        let id = Arc::clone(&self.id);
        let subscription = ctx.locale.subscribe(move |locale| {
            if notify_tx.send(Command::Dispatch(Trigger::LocaleChanged)).is_err() {
                tracing::trace!(section = %id, locale = %locale, "locale change after driver stopped");
            }
        });

        dispatch(&shared, &fetcher, Trigger::Mount);
        tokio::spawn(drive(Arc::clone(&shared), fetcher, rx));
        tracing::debug!(section = %shared.id, "mounted");

        SectionHandle {
            shared,
            commands: tx,
            subscription: Mutex::new(Some(subscription)),
        }
    }
}

/// Control surface of a mounted section.
pub struct SectionHandle<T: SectionData> {
    shared: Arc<Shared<T>>,
    commands: mpsc::UnboundedSender<Command>,
    subscription: Mutex<Option<Subscription>>,
}

impl<T: SectionData> std::fmt::Debug for SectionHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionHandle")
            .field("id", &self.shared.id)
            .field("mounted", &self.shared.is_mounted())
            .finish_non_exhaustive()
    }
}

impl<T: SectionData> SectionHandle<T> {
    /// Section id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.shared.id
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SectionState<T> {
        self.shared.state.borrow().clone()
    }

    /// Change stream; every commit and every dispatch marks it changed.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SectionState<T>> {
        self.shared.state.subscribe()
    }

    /// Whether the section still accepts commits.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    /// Sequence number of the most recent dispatch.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.shared.latest_seq.load(Ordering::Acquire)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::trace!(section = %self.shared.id, "command after driver stopped");
        }
    }

    /// What: Update the search text.
    ///
    /// Details:
    /// - The fetch is debounced: only the last text of a burst is requested,
    ///   one debounce interval after the last call
    /// - Resets the page to 1
    pub fn set_search(&self, text: impl Into<String>) {
        if !self.is_mounted() {
            return;
        }
        let text = text.into();
        self.shared.state.send_modify(|st| {
            st.search = text;
            st.page = 1;
        });
        self.send(Command::Search);
    }

    /// What: Set a non-text filter and refetch immediately (page resets to 1).
    ///
    /// Details:
    /// - Reserved query keys (`locale`, `search`, `page`) are ignored with a
    ///   warning; use the dedicated setters instead
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        if !self.is_mounted() {
            return;
        }
        let (key, value) = (key.into(), value.into());
        if is_reserved_query_key(&key) {
            tracing::warn!(section = %self.shared.id, key = %key, "ignoring filter with a reserved query key");
            return;
        }
        self.shared.state.send_modify(|st| {
            st.filters.insert(key, value);
            st.page = 1;
        });
        self.send(Command::Dispatch(Trigger::Filter));
    }

    /// Remove a filter; refetches only if it was set.
    pub fn clear_filter(&self, key: &str) {
        if !self.is_mounted() {
            return;
        }
        let removed = self.shared.state.send_if_modified(|st| {
            let removed = st.filters.remove(key).is_some();
            if removed {
                st.page = 1;
            }
            removed
        });
        if removed {
            self.send(Command::Dispatch(Trigger::Filter));
        }
    }

    /// Jump to page `page` (clamped to at least 1) and refetch.
    pub fn set_page(&self, page: u32) {
        if !self.is_mounted() {
            return;
        }
        let page = page.max(1);
        self.shared.state.send_modify(|st| st.page = page);
        self.send(Command::Dispatch(Trigger::Page));
    }

    /// Refetch with the current parameters.
    pub fn retry(&self) {
        if self.is_mounted() {
            self.send(Command::Dispatch(Trigger::Retry));
        }
    }

    /// What: Unmount the section.
    ///
    /// Details:
    /// - Unsubscribes from the bridge, aborts the in-flight fetch, stops the driver
    /// - Idempotent; results that land afterwards are discarded
    pub fn unmount(&self) {
        if !self.shared.mark_unmounted() {
            return;
        }
        if let Some(sub) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            sub.unsubscribe();
        }
        self.shared.abort_inflight();
        self.send(Command::Stop);
        tracing::debug!(section = %self.shared.id, "unmounted");
    }
}

impl<T: SectionData> Drop for SectionHandle<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
