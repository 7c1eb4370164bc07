//! One-shot command-line session: mount sections, wait for them, print them.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use lisan::api::{FileSessionStore, SessionStore};
use lisan::app::App;
use lisan::config::{self, PreferenceStore, SettingsFile};
use lisan::fetch::SectionHandle;
use lisan::i18n::Locale;
use lisan::sections::SectionKind;
use lisan::state::LocaleChange;
use serde_json::Value;

use super::definition::{Args, theme_override};

/// Result alias for the binary.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SECTIONS: [SectionKind; 3] =
    [SectionKind::Hero, SectionKind::Services, SectionKind::Faq];

/// Print every section id with its flags.
pub fn print_sections() {
    for kind in SectionKind::ALL {
        let mut flags = Vec::new();
        if kind.requires_auth() {
            flags.push("auth");
        }
        if kind.paginated() {
            flags.push("paged");
        }
        if kind.searchable() {
            flags.push("search");
        }
        println!("{:<18} /{:<26} {}", kind.id(), kind.path(), flags.join(","));
    }
}

fn wanted_sections(args: &Args) -> Result<Vec<SectionKind>> {
    if args.sections.is_empty() {
        return Ok(DEFAULT_SECTIONS.to_vec());
    }
    let mut kinds = Vec::new();
    for raw in &args.sections {
        let kind: SectionKind = raw.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

type Tracked = (Arc<SectionHandle<Value>>, u64);

/// Wait until every section committed a dispatch newer than its baseline, bounded by `limit`.
async fn settle(handles: &[Tracked], limit: Duration) {
    let waits = handles.iter().map(|(h, after)| {
        let mut rx = h.watch();
        let after = *after;
        async move {
            let _ = rx
                .wait_for(|st| !st.loading && st.committed_seq > after)
                .await;
        }
    });
    if tokio::time::timeout(limit, join_all(waits)).await.is_err() {
        tracing::warn!(limit_secs = limit.as_secs(), "sections still loading; printing what we have");
    }
}

fn print_all(app: &App, kinds: &[SectionKind]) {
    let locale = app.locale().current();
    println!("[{} | {}]", locale, locale.direction());
    for kind in kinds {
        if let Some(lines) = app.render(*kind) {
            for line in lines {
                println!("{line}");
            }
            println!();
        }
    }
}

/// What: Run the command-line session.
///
/// # Errors
/// - Unknown section ids or locale codes
/// - Settings or session files that cannot be read or written
/// - HTTP client construction failures
pub async fn run(args: Args) -> Result<()> {
    let dir = config::config_dir();
    let settings_path = config::settings_path_in(&dir);
    let mut settings = config::load_settings(&settings_path);
    if let Some(base) = &args.api_base {
        settings.api_base_url = base.trim_end_matches('/').to_string();
    }
    if let Some(code) = &args.locale {
        settings.locale = Locale::parse(code)?.code().to_string();
    }
    let switch_to = args.switch_to.as_deref().map(Locale::parse).transpose()?;
    let kinds = wanted_sections(&args)?;

    let session = Arc::new(FileSessionStore::new(config::session_path_in(&dir)));
    if let Some(token) = &args.token {
        session.set_token(token)?;
        tracing::info!("session token stored");
    }
    if args.logout {
        session.clear()?;
        tracing::info!("session token cleared");
    }
    let prefs: Arc<dyn PreferenceStore> = Arc::new(SettingsFile::new(settings_path));
    let limit = settings.request_timeout.saturating_add(Duration::from_secs(1));
    let app = App::new(settings, prefs, session)?;
    app.auth().on_unauthorized(|| {
        eprintln!("session expired; sign in again with --token");
    });
    if let Some(dark) = theme_override(&args) {
        app.theme().set_dark(dark);
    }

    let handles: Vec<Tracked> = kinds
        .iter()
        .map(|kind| {
            let handle = app.mount(*kind);
            if let Some(text) = &args.search
                && kind.searchable()
            {
                handle.set_search(text.clone());
            }
            match args.page {
                Some(page) if kind.paginated() => handle.set_page(page),
                _ if args.search.is_some() && kind.searchable() => handle.retry(),
                _ => {}
            }
            (handle, 0)
        })
        .collect();
    settle(&handles, limit).await;
    print_all(&app, &kinds);

    if let Some(next) = switch_to {
        let before: Vec<u64> = handles.iter().map(|(h, _)| h.state().committed_seq).collect();
        let change = app.change_locale(next);
        tracing::info!(?change, "locale switch requested");
        if change != LocaleChange::Unchanged {
            // A full reload replaces the handles; fresh ones start from zero.
            let current: Vec<Tracked> = kinds
                .iter()
                .filter_map(|k| app.section(*k))
                .map(|h| {
                    let baseline = handles
                        .iter()
                        .position(|(old, _)| Arc::ptr_eq(old, &h))
                        .map_or(0, |i| before[i]);
                    (h, baseline)
                })
                .collect();
            settle(&current, limit).await;
            print_all(&app, &kinds);
        }
    }
    for kind in &kinds {
        app.unmount(*kind);
    }
    Ok(())
}
