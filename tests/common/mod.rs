//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use lisan::bridge::NotificationBridge;
use lisan::config::MemoryPreferences;
use lisan::fetch::{ApiEnvelope, FetchError, FetchRequest, FetchResult, SectionContext};
use lisan::i18n::{Catalog, Locale};
use lisan::state::LocaleState;
use tokio::sync::oneshot;

/// Isolated locale state + catalog starting at `locale`.
pub fn context(locale: Locale) -> SectionContext {
    let state = LocaleState::new(
        locale,
        NotificationBridge::new(),
        Arc::new(MemoryPreferences::new()),
    );
    SectionContext::new(Arc::new(state), Arc::new(Catalog::load(None)))
}

/// Let spawned drivers and fetch tasks run without moving the (paused) clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Fetcher that answers immediately with `"<label>-<locale>"` and records every request.
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl Recorder {
    pub fn fetcher(
        &self,
        label: &'static str,
    ) -> impl Fn(FetchRequest) -> std::future::Ready<FetchResult<String>> + Send + Sync + 'static
    {
        let requests = Arc::clone(&self.requests);
        move |req: FetchRequest| {
            let body = format!("{label}-{}", req.locale);
            requests.lock().expect("requests").push(req);
            std::future::ready(Ok(ApiEnvelope::ok(body)))
        }
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().expect("requests").clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().expect("requests").len()
    }
}

type Pending = (FetchRequest, oneshot::Sender<FetchResult<String>>);

/// Fetcher whose responses are released by the test, in any order.
#[derive(Default)]
pub struct Gate {
    pending: Mutex<Vec<Pending>>,
}

impl Gate {
    pub fn take(&self) -> Vec<Pending> {
        std::mem::take(&mut *self.pending.lock().expect("pending"))
    }
}

pub fn gated() -> (
    Arc<Gate>,
    impl Fn(FetchRequest) -> BoxFuture<'static, FetchResult<String>> + Send + Sync + 'static,
) {
    let gate = Arc::new(Gate::default());
    let inner = Arc::clone(&gate);
    let fetcher = move |req: FetchRequest| {
        let (tx, rx) = oneshot::channel();
        inner.pending.lock().expect("pending").push((req, tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into())))
        }
        .boxed()
    };
    (gate, fetcher)
}

/// Release a gated request with a successful payload; ignored if the task was aborted.
pub fn respond(pending: Pending, body: &str) {
    let _ = pending.1.send(Ok(ApiEnvelope::ok(body.to_string())));
}
