//! Locale state: the single source of truth for the active language.

use std::sync::Arc;

use tokio::sync::watch;

use crate::bridge::{BridgeError, BridgeEvent, NotificationBridge, Subscription};
use crate::config::PreferenceStore;
use crate::i18n::{Direction, Locale, LocaleError};

/// Outcome of [`LocaleState::change_locale`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleChange {
    /// The requested locale was already active; nobody was notified.
    Unchanged,
    /// State changed and this many subscribers were notified.
    Notified {
        /// Handlers invoked during the notify phase.
        subscribers: usize,
    },
    /// State changed but the bridge is unavailable: the caller must rebuild
    /// every mounted section (full reload) for the new locale to show.
    ReloadRequired,
}

/// Active locale plus the document reading direction derived from it.
///
/// Instances are created explicitly and shared through `Arc`; nothing here
/// is process-global, so tests build isolated stores.
pub struct LocaleState {
    current: watch::Sender<Locale>,
    direction: watch::Sender<Direction>,
    bridge: NotificationBridge,
    prefs: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for LocaleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleState")
            .field("current", &self.current())
            .field("direction", &self.direction())
            .finish_non_exhaustive()
    }
}

impl LocaleState {
    /// What: Create a locale state.
    ///
    /// Inputs:
    /// - `initial`: Locale resolved at startup
    /// - `bridge`: Bridge that carries change notifications
    /// - `prefs`: Where changes are persisted
    #[must_use]
    pub fn new(initial: Locale, bridge: NotificationBridge, prefs: Arc<dyn PreferenceStore>) -> Self {
        let (current, _) = watch::channel(initial);
        let (direction, _) = watch::channel(initial.direction());
        Self {
            current,
            direction,
            bridge,
            prefs,
        }
    }

    /// Active locale. Pure read.
    #[must_use]
    pub fn current(&self) -> Locale {
        *self.current.borrow()
    }

    /// Reading direction currently applied to the document.
    #[must_use]
    pub fn direction(&self) -> Direction {
        *self.direction.borrow()
    }

    /// Stream of direction updates for renderers that mirror layout.
    #[must_use]
    pub fn watch_direction(&self) -> watch::Receiver<Direction> {
        self.direction.subscribe()
    }

    /// Bridge used for change notifications.
    #[must_use]
    pub const fn bridge(&self) -> &NotificationBridge {
        &self.bridge
    }

    /// Register a locale-changed handler on the underlying bridge.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Locale) + Send + Sync + 'static,
    {
        self.bridge.subscribe(BridgeEvent::LocaleChanged, handler)
    }

    /// What: Switch the active locale.
    ///
    /// Inputs:
    /// - `new_locale`: Locale to activate
    ///
    /// Output:
    /// - What happened; see [`LocaleChange`]
    ///
    /// Details:
    /// - Same locale: no state write, no persistence, no notification
    /// - Otherwise: state, then direction, then persistence, then the notify
    ///   phase, all before returning. Fetches started by subscribers run later.
    /// - Persistence failures are logged and do not stop the notification
    pub fn change_locale(&self, new_locale: Locale) -> LocaleChange {
        let changed = self.current.send_if_modified(|cur| {
            if *cur == new_locale {
                false
            } else {
                *cur = new_locale;
                true
            }
        });
        if !changed {
            tracing::debug!(locale = %new_locale, "locale unchanged; skipping notification");
            return LocaleChange::Unchanged;
        }
        self.direction.send_replace(new_locale.direction());
        if let Err(e) = self.prefs.save_locale(new_locale) {
            tracing::warn!(locale = %new_locale, error = %e, "failed to persist locale");
        }
        match self.bridge.emit(new_locale) {
            Ok(subscribers) => {
                tracing::info!(locale = %new_locale, subscribers, "locale changed");
                LocaleChange::Notified { subscribers }
            }
            Err(BridgeError::Unavailable) => {
                tracing::warn!(locale = %new_locale, "bridge unavailable; full reload required");
                LocaleChange::ReloadRequired
            }
        }
    }

    /// What: Switch locale from a code string (`"ar"`, `"en-US"`).
    ///
    /// # Errors
    /// - `LocaleError` when the code is not a supported locale; state is untouched
    pub fn change_locale_code(&self, code: &str) -> Result<LocaleChange, LocaleError> {
        let locale = Locale::parse(code)?;
        Ok(self.change_locale(locale))
    }

    /// Flip between Arabic and English.
    pub fn toggle(&self) -> LocaleChange {
        self.change_locale(self.current().toggled())
    }
}
