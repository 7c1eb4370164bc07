//! Behavioural guarantees of the locale/section synchronization layer.

mod common;

use std::time::Duration;

use common::{Recorder, context, gated, respond, settle};
use lisan::fetch::{
    ApiEnvelope, FetchError, FetchRequest, FetchResult, Section, SectionHandle, SectionOptions,
    Trigger,
};
use lisan::i18n::Locale;
use lisan::state::LocaleChange;

#[tokio::test(start_paused = true)]
/// What: A slow earlier response must not overwrite a newer committed one.
///
/// Details:
/// - A (mount) and B (retry) both reached the fetcher; B resolves first, then A
async fn late_response_never_overwrites_newer_result() {
    let ctx = context(Locale::En);
    let (gate, fetcher) = gated();
    let handle: SectionHandle<String> = Section::new("news", fetcher).mount(&ctx);
    settle().await;
    handle.retry();
    settle().await;

    let mut pending = gate.take();
    assert_eq!(pending.len(), 2);
    let b = pending.pop().expect("second request");
    let a = pending.pop().expect("first request");
    assert!(a.0.seq < b.0.seq);

    respond(b, "B");
    settle().await;
    assert_eq!(handle.state().data.as_deref(), Some("B"));

    respond(a, "A");
    settle().await;
    let st = handle.state();
    assert_eq!(st.data.as_deref(), Some("B"));
    assert!(!st.loading);
}

#[tokio::test(start_paused = true)]
/// What: Results landing after unmount change nothing.
async fn unmount_while_in_flight_discards_result() {
    let ctx = context(Locale::Ar);
    let (gate, fetcher) = gated();
    let handle: SectionHandle<String> = Section::new("services", fetcher).mount(&ctx);
    settle().await;
    let before = handle.state();
    let mut rx = handle.watch();
    let _ = rx.borrow_and_update();

    handle.unmount();
    for pending in gate.take() {
        respond(pending, "late");
    }
    settle().await;

    assert_eq!(handle.state(), before);
    assert!(!rx.has_changed().unwrap_or(false));
    assert_eq!(ctx.locale.bridge().subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
/// What: A burst of keystrokes produces one fetch with the final text, one debounce after the last key.
async fn typing_burst_is_debounced_to_final_value() {
    let ctx = context(Locale::En);
    let recorder = Recorder::default();
    let handle: SectionHandle<String> = Section::new("faq", recorder.fetcher("faq")).mount(&ctx);
    settle().await;
    assert_eq!(recorder.count(), 1);

    for text in ["a", "ab", "abc"] {
        handle.set_search(text);
        settle().await;
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    // 400 ms after the last keystroke: nothing yet.
    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;
    assert_eq!(recorder.count(), 1);

    tokio::time::advance(Duration::from_millis(100)).await;
    settle().await;
    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    let last = &requests[1];
    assert_eq!(last.search.as_deref(), Some("abc"));
    assert_eq!(last.trigger, Trigger::Search);
}

#[tokio::test(start_paused = true)]
/// What: ar -> en triggers exactly one `en` fetch per mounted section; paginated ones go back to page 1.
async fn locale_change_fans_out_once_per_section() {
    let ctx = context(Locale::Ar);
    let recorders = [Recorder::default(), Recorder::default(), Recorder::default()];
    let plain_a: SectionHandle<String> = Section::new("hero", recorders[0].fetcher("hero")).mount(&ctx);
    let plain_b: SectionHandle<String> = Section::new("faq", recorders[1].fetcher("faq")).mount(&ctx);
    let paged: SectionHandle<String> = Section::new("news", recorders[2].fetcher("news"))
        .with_options(SectionOptions::paginated())
        .mount(&ctx);
    settle().await;
    paged.set_page(3);
    settle().await;
    assert_eq!(paged.state().page, 3);
    let baseline: Vec<usize> = recorders.iter().map(Recorder::count).collect();

    assert_eq!(
        ctx.locale.change_locale(Locale::En),
        LocaleChange::Notified { subscribers: 3 }
    );
    settle().await;

    for (recorder, before) in recorders.iter().zip(baseline) {
        let requests = recorder.requests();
        assert_eq!(requests.len(), before + 1);
        let last = requests.last().expect("locale fetch");
        assert_eq!(last.locale, Locale::En);
        assert_eq!(last.trigger, Trigger::LocaleChanged);
    }
    assert_eq!(recorders[2].requests().last().map(|r| r.page), Some(1));
    assert_eq!(paged.state().page, 1);
    assert_eq!(plain_a.state().data.as_deref(), Some("hero-en"));
    assert_eq!(plain_b.state().data.as_deref(), Some("faq-en"));
    assert_eq!(paged.state().locale, Some(Locale::En));
}

#[tokio::test(start_paused = true)]
/// What: Re-selecting the active locale notifies nobody and fetches nothing.
async fn same_locale_is_silent() {
    let ctx = context(Locale::Ar);
    let recorder = Recorder::default();
    let _handle: SectionHandle<String> = Section::new("pricing", recorder.fetcher("pricing")).mount(&ctx);
    settle().await;
    assert_eq!(ctx.locale.change_locale(Locale::Ar), LocaleChange::Unchanged);
    settle().await;
    assert_eq!(recorder.count(), 1);
}

#[tokio::test(start_paused = true)]
/// What: One section failing leaves a sibling's data untouched.
async fn failure_is_section_scoped() {
    let ctx = context(Locale::En);
    let recorder = Recorder::default();
    let healthy: SectionHandle<String> = Section::new("partners", recorder.fetcher("partners")).mount(&ctx);
    let failing: SectionHandle<String> = Section::new("hero", |_req: FetchRequest| async {
        FetchResult::<String>::Err(FetchError::Transport("connection reset".into()))
    })
    .mount(&ctx);
    settle().await;
    let healthy_before = healthy.state();

    failing.retry();
    settle().await;

    assert_eq!(
        failing.state().error,
        Some(ctx.catalog.t(Locale::En, "errors.connection"))
    );
    assert_eq!(healthy.state(), healthy_before);
    assert_eq!(healthy.state().data.as_deref(), Some("partners-en"));
}

#[tokio::test(start_paused = true)]
/// What: A response fetched in a locale that is no longer active is dropped at commit time.
///
/// Details:
/// - The bridge is closed, so no refetch supersedes the in-flight request
async fn commit_rechecks_active_locale() {
    let ctx = context(Locale::En);
    let (gate, fetcher) = gated();
    let handle: SectionHandle<String> = Section::new("faq", fetcher).mount(&ctx);
    settle().await;

    ctx.locale.bridge().close();
    assert_eq!(ctx.locale.change_locale(Locale::Ar), LocaleChange::ReloadRequired);
    for pending in gate.take() {
        assert_eq!(pending.0.locale, Locale::En);
        respond(pending, "english");
    }
    settle().await;
    let st = handle.state();
    assert_eq!(st.data, None);
    assert_eq!(st.committed_seq, 0);
}

#[tokio::test(start_paused = true)]
/// What: Filters apply immediately, reset paging, and clearing an unset filter is a no-op.
async fn filters_dispatch_immediately_and_reset_page() {
    let ctx = context(Locale::Ar);
    let recorder = Recorder::default();
    let handle: SectionHandle<String> = Section::new("ai_services", recorder.fetcher("ai"))
        .with_options(SectionOptions::paginated())
        .mount(&ctx);
    settle().await;
    handle.set_page(2);
    settle().await;
    handle.set_filter("category", "7");
    settle().await;

    let last = recorder.requests().last().cloned().expect("filter fetch");
    assert_eq!(last.trigger, Trigger::Filter);
    assert_eq!(last.page, 1);
    assert_eq!(last.filters.get("category").map(String::as_str), Some("7"));

    let count = recorder.count();
    handle.clear_filter("missing");
    settle().await;
    assert_eq!(recorder.count(), count);
    handle.clear_filter("category");
    settle().await;
    assert_eq!(recorder.count(), count + 1);
    assert!(recorder.requests().last().expect("clear fetch").filters.is_empty());
}

#[tokio::test(start_paused = true)]
/// What: Filters named `locale`, `search` or `page` are ignored and trigger no fetch.
async fn reserved_filter_keys_are_ignored() {
    let ctx = context(Locale::En);
    let recorder = Recorder::default();
    let handle: SectionHandle<String> = Section::new("news", recorder.fetcher("news"))
        .with_options(SectionOptions::paginated())
        .mount(&ctx);
    settle().await;
    let count = recorder.count();

    handle.set_filter("locale", "ar");
    handle.set_filter("PAGE", "9");
    handle.set_filter("search", "x");
    settle().await;
    assert_eq!(recorder.count(), count);
    assert!(handle.state().filters.is_empty());

    handle.set_filter("category", "2");
    settle().await;
    let last = recorder.requests().last().cloned().expect("filter fetch");
    assert_eq!(last.locale, Locale::En);
    assert_eq!(last.filters.len(), 1);
}

#[tokio::test(start_paused = true)]
/// What: Clearing policy drops stale data on failure; the default keeps it.
async fn error_policy_controls_stale_data() {
    use lisan::fetch::ErrorPolicy;

    for (policy, expect_data) in [(ErrorPolicy::KeepStale, true), (ErrorPolicy::Clear, false)] {
        let ctx = context(Locale::En);
        let fetcher = |req: FetchRequest| async move {
            if req.trigger == Trigger::Mount {
                Ok(ApiEnvelope::ok("fresh".to_string()))
            } else {
                Err(FetchError::Timeout(Duration::from_secs(30)))
            }
        };
        let handle: SectionHandle<String> = Section::new("invoices", fetcher)
            .with_options(SectionOptions {
                error_policy: policy,
                ..SectionOptions::default()
            })
            .mount(&ctx);
        settle().await;
        handle.retry();
        settle().await;
        let st = handle.state();
        assert_eq!(st.data.is_some(), expect_data, "{policy:?}");
        assert!(st.error.is_some());
    }
}

#[tokio::test(start_paused = true)]
/// What: Dropping the handle unsubscribes it from locale changes.
async fn dropping_handle_unsubscribes() {
    let ctx = context(Locale::Ar);
    let recorder = Recorder::default();
    let handle: SectionHandle<String> = Section::new("reviews", recorder.fetcher("reviews")).mount(&ctx);
    settle().await;
    assert_eq!(ctx.locale.bridge().subscriber_count(), 1);
    drop(handle);
    assert_eq!(ctx.locale.bridge().subscriber_count(), 0);
    assert_eq!(
        ctx.locale.change_locale(Locale::En),
        LocaleChange::Notified { subscribers: 0 }
    );
    settle().await;
    assert_eq!(recorder.count(), 1);
}
