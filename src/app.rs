//! Application container: wires the stores, the API client, and mounted sections.
//!
//! Nothing in here is global. Tests build as many `App`s as they like, each
//! with its own bridge, locale state, and preference store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiClient, AuthPolicy, SessionStore};
use crate::bridge::NotificationBridge;
use crate::config::{PreferenceStore, Settings};
use crate::fetch::{FetchError, Section, SectionContext, SectionData, SectionHandle, SectionState};
use crate::i18n::{Catalog, Locale, resolve_locale};
use crate::sections::{ApiSectionFetcher, SectionKind, render_lines};
use crate::state::{LocaleChange, LocaleState, ThemeState};

type Mounted = Vec<(SectionKind, Arc<SectionHandle<Value>>)>;

/// Explicit store plus the sections mounted on it.
pub struct App {
    settings: Settings,
    catalog: Arc<Catalog>,
    locale: Arc<LocaleState>,
    theme: ThemeState,
    auth: Arc<AuthPolicy>,
    client: Arc<ApiClient>,
    mounted: Mutex<Mounted>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("locale", &self.locale.current())
            .field("dark", &self.theme.is_dark())
            .field("mounted", &self.mounted_kinds())
            .finish_non_exhaustive()
    }
}

impl App {
    /// What: Build an application from settings and injected stores.
    ///
    /// Inputs:
    /// - `settings`: Parsed settings (locale, theme, API base, timeouts)
    /// - `prefs`: Where locale and theme changes are persisted
    /// - `session`: Where the bearer token lives
    ///
    /// # Errors
    /// - `FetchError::Transport` when the HTTP client cannot be created
    pub fn new(
        settings: Settings,
        prefs: Arc<dyn PreferenceStore>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, FetchError> {
        let (initial, source) = resolve_locale(&settings.locale);
        tracing::info!(locale = %initial, source = ?source, "startup locale");
        Self::with_locale(settings, initial, prefs, session)
    }

    /// Same as [`new`](Self::new) with an explicit initial locale.
    ///
    /// # Errors
    /// - `FetchError::Transport` when the HTTP client cannot be created
    pub fn with_locale(
        settings: Settings,
        initial: Locale,
        prefs: Arc<dyn PreferenceStore>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, FetchError> {
        let catalog = Arc::new(Catalog::load(settings.locales_dir.as_deref()));
        let locale = Arc::new(LocaleState::new(
            initial,
            NotificationBridge::new(),
            Arc::clone(&prefs),
        ));
        let theme = ThemeState::from_settings(&settings, prefs);
        let auth = Arc::new(AuthPolicy::new(session));
        let client = Arc::new(ApiClient::new(
            &settings.api_base_url,
            settings.request_timeout,
            Arc::clone(&locale),
            Arc::clone(&auth),
        )?);
        Ok(Self {
            settings,
            catalog,
            locale,
            theme,
            auth,
            client,
            mounted: Mutex::new(Vec::new()),
        })
    }

    fn mounted(&self) -> MutexGuard<'_, Mounted> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Message catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Locale state.
    #[must_use]
    pub const fn locale(&self) -> &Arc<LocaleState> {
        &self.locale
    }

    /// Theme state.
    #[must_use]
    pub const fn theme(&self) -> &ThemeState {
        &self.theme
    }

    /// Authentication policy.
    #[must_use]
    pub const fn auth(&self) -> &Arc<AuthPolicy> {
        &self.auth
    }

    /// REST client.
    #[must_use]
    pub const fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Context handed to sections.
    #[must_use]
    pub fn section_context(&self) -> SectionContext {
        SectionContext::new(Arc::clone(&self.locale), Arc::clone(&self.catalog))
    }

    fn mount_handle(&self, kind: SectionKind) -> Arc<SectionHandle<Value>> {
        let fetcher = ApiSectionFetcher::<Value>::new(Arc::clone(&self.client), kind);
        Arc::new(
            Section::new(kind.id(), fetcher)
                .with_options(kind.options(&self.settings))
                .mount(&self.section_context()),
        )
    }

    /// What: Mount `kind` (or return the already mounted handle).
    ///
    /// # Panics
    /// - When called outside a Tokio runtime
    pub fn mount(&self, kind: SectionKind) -> Arc<SectionHandle<Value>> {
        let mut mounted = self.mounted();
        if let Some((_, handle)) = mounted.iter().find(|(k, _)| *k == kind) {
            return Arc::clone(handle);
        }
        let handle = self.mount_handle(kind);
        mounted.push((kind, Arc::clone(&handle)));
        handle
    }

    /// Mount `kind` with a typed payload. The handle is not tracked by [`reload`](Self::reload).
    ///
    /// # Panics
    /// - When called outside a Tokio runtime
    pub fn mount_typed<T>(&self, kind: SectionKind) -> SectionHandle<T>
    where
        T: SectionData + DeserializeOwned,
    {
        Section::new(kind.id(), ApiSectionFetcher::<T>::new(Arc::clone(&self.client), kind))
            .with_options(kind.options(&self.settings))
            .mount(&self.section_context())
    }

    /// Handle of a mounted section.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<Arc<SectionHandle<Value>>> {
        self.mounted()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| Arc::clone(h))
    }

    /// Kinds currently mounted, in mount order.
    #[must_use]
    pub fn mounted_kinds(&self) -> Vec<SectionKind> {
        self.mounted().iter().map(|(k, _)| *k).collect()
    }

    /// Unmount `kind` if mounted.
    pub fn unmount(&self, kind: SectionKind) {
        let removed = {
            let mut mounted = self.mounted();
            mounted
                .iter()
                .position(|(k, _)| *k == kind)
                .map(|i| mounted.remove(i))
        };
        if let Some((_, handle)) = removed {
            handle.unmount();
        }
    }

    /// What: Switch locale; falls back to a full reload when the bridge is down.
    ///
    /// Output:
    /// - What the locale state reported
    pub fn change_locale(&self, locale: Locale) -> LocaleChange {
        let change = self.locale.change_locale(locale);
        if change == LocaleChange::ReloadRequired {
            self.reload();
        }
        change
    }

    /// What: Rebuild every mounted section against the current locale.
    ///
    /// Details:
    /// - Re-opens the bridge first so the new subscriptions receive later changes
    /// - Old handles are unmounted; callers holding them must fetch the new
    ///   ones through [`section`](Self::section)
    pub fn reload(&self) {
        self.locale.bridge().reopen();
        let kinds = {
            let mut mounted = self.mounted();
            let old = std::mem::take(&mut *mounted);
            for (_, handle) in &old {
                handle.unmount();
            }
            old.into_iter().map(|(k, _)| k).collect::<Vec<_>>()
        };
        tracing::info!(sections = kinds.len(), locale = %self.locale.current(), "full reload");
        let fresh: Mounted = kinds
            .into_iter()
            .map(|kind| (kind, self.mount_handle(kind)))
            .collect();
        *self.mounted() = fresh;
    }

    /// Render a mounted section in the active locale; `None` when not mounted.
    #[must_use]
    pub fn render(&self, kind: SectionKind) -> Option<Vec<String>> {
        let state: SectionState<Value> = self.section(kind)?.state();
        Some(render_lines(kind, &state, self.locale.current(), &self.catalog))
    }
}
