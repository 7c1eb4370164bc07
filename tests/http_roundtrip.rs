//! End-to-end runs of `App` against a local axum backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use lisan::api::{MemorySessionStore, SessionStore};
use lisan::app::App;
use lisan::config::{MemoryPreferences, Settings};
use lisan::fetch::{ApiEnvelope, FetchError, SectionData, SectionHandle};
use lisan::i18n::{Locale, Localized};
use lisan::sections::SectionKind;
use lisan::sections::models::{ContactMessage, Faq};
use lisan::state::LocaleChange;
use serde_json::{Value, json};

type Seen = Arc<Mutex<Vec<(String, String)>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}/api")
}

/// Backend with one route per behaviour under test.
fn backend(seen: Seen, invoice_hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/api/faqs",
            get(move |Query(q): Query<HashMap<String, String>>, headers: HeaderMap| {
                let seen = Arc::clone(&seen);
                async move {
                    let locale = q.get("locale").cloned().unwrap_or_default();
                    let accept = headers
                        .get(header::ACCEPT_LANGUAGE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().expect("seen").push((locale.clone(), accept));
                    Json(json!({
                        "success": true,
                        "data": [{
                            "id": 1,
                            "question": format!("سؤال-{locale}"),
                            "question_en": format!("Question-{locale}"),
                            "answer": "جواب",
                            "answer_en": "Answer"
                        }]
                    }))
                }
            }),
        )
        .route(
            "/api/news",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
                Json(json!({
                    "success": true,
                    "data": {
                        "current_page": page,
                        "last_page": 3,
                        "per_page": 1,
                        "total": 3,
                        "from": page,
                        "to": page,
                        "data": [{"id": page, "title": format!("خبر {page}"), "title_en": format!("News {page}")}]
                    }
                }))
            }),
        )
        .route(
            "/api/invoices",
            get(move |headers: HeaderMap| {
                let hits = Arc::clone(&invoice_hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let bearer = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok());
                    if bearer == Some("Bearer good") {
                        Json(json!({"success": true, "data": {"current_page": 1, "last_page": 1, "data": []}}))
                            .into_response()
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})))
                            .into_response()
                    }
                }
            }),
        )
        .route(
            "/api/hero",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/plans",
            get(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"success": false, "message": "Plans are being updated."})),
                )
            }),
        )
        .route(
            "/api/partners",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"success": true, "data": []}))
            }),
        )
        .route(
            "/api/contact",
            post(|Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "message": "received",
                    "data": {"name": body["name"], "locale": q.get("locale")}
                }))
            }),
        )
}

struct Harness {
    app: App,
    session: Arc<MemorySessionStore>,
    seen: Seen,
    invoice_hits: Arc<AtomicUsize>,
}

async fn harness(locale: Locale, session: MemorySessionStore, timeout: Duration) -> Harness {
    let seen: Seen = Arc::default();
    let invoice_hits = Arc::new(AtomicUsize::new(0));
    let base = serve(backend(Arc::clone(&seen), Arc::clone(&invoice_hits))).await;
    let settings = Settings {
        api_base_url: base,
        request_timeout: timeout,
        ..Settings::default()
    };
    let session = Arc::new(session);
    let store: Arc<dyn SessionStore> = session.clone();
    let app = App::with_locale(settings, locale, Arc::new(MemoryPreferences::new()), store)
        .expect("app");
    Harness {
        app,
        session,
        seen,
        invoice_hits,
    }
}

/// Wait for a commit newer than `after`.
async fn committed<T: SectionData>(handle: &SectionHandle<T>, after: u64) {
    let mut rx = handle.watch();
    tokio::time::timeout(
        Duration::from_secs(10),
        rx.wait_for(|st| !st.loading && st.committed_seq > after),
    )
    .await
    .expect("commit in time")
    .expect("section alive");
}

#[tokio::test]
/// What: Switching language refetches with the new locale in both query and header.
async fn locale_switch_refetches_in_new_language() {
    let h = harness(Locale::Ar, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let faq = h.app.mount(SectionKind::Faq);
    committed(&faq, 0).await;
    let lines = h.app.render(SectionKind::Faq).expect("mounted");
    assert_eq!(lines[1], "• سؤال-ar: جواب");

    let before = faq.state().committed_seq;
    assert_eq!(
        h.app.change_locale(Locale::En),
        LocaleChange::Notified { subscribers: 1 }
    );
    committed(&faq, before).await;
    let st = faq.state();
    assert_eq!(st.locale, Some(Locale::En));
    let lines = h.app.render(SectionKind::Faq).expect("mounted");
    assert_eq!(
        lines[0],
        format!("== {} ==", h.app.catalog().t(Locale::En, "sections.faq"))
    );
    assert_eq!(lines[1], "• Question-en: Answer");
    assert_eq!(
        *h.seen.lock().expect("seen"),
        vec![
            ("ar".to_string(), "ar".to_string()),
            ("en".to_string(), "en".to_string())
        ]
    );
}

#[tokio::test]
/// What: A typed mount decodes entity models and follows locale changes like an untyped one.
async fn typed_mount_decodes_models() {
    let h = harness(Locale::Ar, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let faq = h.app.mount_typed::<Vec<Faq>>(SectionKind::Faq);
    committed(&faq, 0).await;
    let items = faq.state().data.expect("faqs");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(Locale::Ar), "سؤال-ar");
    assert!(h.app.mounted_kinds().is_empty());

    let before = faq.state().committed_seq;
    assert_eq!(
        h.app.change_locale(Locale::En),
        LocaleChange::Notified { subscribers: 1 }
    );
    committed(&faq, before).await;
    let st = faq.state();
    assert_eq!(st.locale, Some(Locale::En));
    let items = st.data.expect("faqs");
    assert_eq!(items[0].title(Locale::En), "Question-en");
}

#[tokio::test]
/// What: Paginated sections pick up the paginator and request the chosen page.
async fn paginated_section_follows_page() {
    let h = harness(Locale::En, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let news = h.app.mount(SectionKind::News);
    committed(&news, 0).await;
    assert_eq!(news.state().pagination.map(|p| p.last_page), Some(3));

    let before = news.state().committed_seq;
    news.set_page(2);
    committed(&news, before).await;
    let st = news.state();
    assert_eq!(st.pagination.map(|p| p.current_page), Some(2));
    let lines = h.app.render(SectionKind::News).expect("mounted");
    assert!(lines.iter().any(|l| l.contains("News 2")), "{lines:?}");
}

#[tokio::test]
/// What: A 401 clears the stored token, notifies listeners, and shows the session-expired message.
async fn unauthorized_clears_session() {
    let h = harness(
        Locale::En,
        MemorySessionStore::with_token("stale"),
        Duration::from_secs(5),
    )
    .await;
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    h.app.auth().on_unauthorized(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let invoices = h.app.mount(SectionKind::Invoices);
    committed(&invoices, 0).await;
    let st = invoices.state();
    assert_eq!(
        st.error,
        Some(h.app.catalog().t(Locale::En, "errors.session_expired"))
    );
    assert_eq!(st.data, None);
    assert!(h.session.token().is_none());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(h.invoice_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
/// What: Without a token, signed-in sections fail locally and never reach the server.
async fn missing_token_skips_network() {
    let h = harness(Locale::Ar, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let invoices = h.app.mount(SectionKind::Invoices);
    committed(&invoices, 0).await;
    assert_eq!(
        invoices.state().error,
        Some(h.app.catalog().t(Locale::Ar, "errors.session_expired"))
    );
    assert_eq!(h.invoice_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
/// What: A valid token reaches the server and the section commits.
async fn valid_token_is_sent_as_bearer() {
    let h = harness(
        Locale::En,
        MemorySessionStore::with_token("good"),
        Duration::from_secs(5),
    )
    .await;
    let invoices = h.app.mount(SectionKind::Invoices);
    committed(&invoices, 0).await;
    let st = invoices.state();
    assert_eq!(st.error, None);
    assert!(st.data.is_some());
    assert_eq!(h.session.token().as_deref().map(String::as_str), Some("good"));
}

#[tokio::test]
/// What: With the bridge down, a locale change rebuilds every section in the new locale.
async fn degraded_bridge_falls_back_to_reload() {
    let h = harness(Locale::Ar, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let old = h.app.mount(SectionKind::Faq);
    committed(&old, 0).await;

    h.app.locale().bridge().close();
    assert_eq!(h.app.change_locale(Locale::En), LocaleChange::ReloadRequired);
    assert!(!old.is_mounted());
    let fresh = h.app.section(SectionKind::Faq).expect("remounted");
    assert!(!Arc::ptr_eq(&old, &fresh));
    committed(&fresh, 0).await;
    assert_eq!(fresh.state().locale, Some(Locale::En));

    // The reopened bridge carries later changes again.
    let before = fresh.state().committed_seq;
    assert_eq!(
        h.app.change_locale(Locale::Ar),
        LocaleChange::Notified { subscribers: 1 }
    );
    committed(&fresh, before).await;
    assert_eq!(fresh.state().locale, Some(Locale::Ar));
}

#[tokio::test]
/// What: Server failures map to the server message or to a localized generic one.
async fn server_failures_are_localized() {
    let h = harness(Locale::En, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let hero = h.app.mount(SectionKind::Hero);
    let plans = h.app.mount(SectionKind::Pricing);
    committed(&hero, 0).await;
    committed(&plans, 0).await;
    assert_eq!(
        hero.state().error,
        Some(h.app.catalog().t(Locale::En, "errors.generic"))
    );
    assert_eq!(plans.state().error.as_deref(), Some("Plans are being updated."));
}

#[tokio::test]
/// What: A slow endpoint times out into the connection message.
async fn slow_endpoint_times_out() {
    let h = harness(Locale::En, MemorySessionStore::new(), Duration::from_millis(200)).await;
    let partners = h.app.mount(SectionKind::Partners);
    committed(&partners, 0).await;
    assert_eq!(
        partners.state().error,
        Some(h.app.catalog().t(Locale::En, "errors.connection"))
    );
}

#[tokio::test]
/// What: Form submissions post JSON in the active locale.
async fn contact_form_posts_in_active_locale() {
    let h = harness(Locale::Ar, MemorySessionStore::new(), Duration::from_secs(5)).await;
    let body = ContactMessage {
        name: "Mona".into(),
        email: "mona@example.com".into(),
        message: "مرحبا".into(),
    };
    let env: ApiEnvelope<Value> = h
        .app
        .client()
        .post_json("contact", &body, false)
        .await
        .expect("envelope");
    assert!(env.success);
    assert_eq!(env.message(), Some("received"));
    assert_eq!(env.data, Some(json!({"name": "Mona", "locale": "ar"})));
}

#[tokio::test]
/// What: A refused connection is a transport error.
async fn refused_connection_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let settings = Settings {
        api_base_url: format!("http://{addr}/api"),
        request_timeout: Duration::from_secs(2),
        ..Settings::default()
    };
    let app = App::with_locale(
        settings,
        Locale::En,
        Arc::new(MemoryPreferences::new()),
        Arc::new(MemorySessionStore::new()),
    )
    .expect("app");
    let result = app
        .client()
        .get::<Value>("faqs", &[], Locale::En, false)
        .await;
    assert!(
        matches!(result, Err(FetchError::Transport(_) | FetchError::Timeout(_))),
        "{result:?}"
    );
}
