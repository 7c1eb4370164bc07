//! Dark/light theme flag. Presentation only: nothing is fetched because of it.

use std::env;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::{PreferenceStore, Settings, ThemePreference};

/// Persisted dark/light flag with change notifications.
pub struct ThemeState {
    dark: watch::Sender<bool>,
    prefs: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("is_dark", &self.is_dark())
            .finish_non_exhaustive()
    }
}

impl ThemeState {
    /// Theme state starting at `is_dark`.
    #[must_use]
    pub fn new(is_dark: bool, prefs: Arc<dyn PreferenceStore>) -> Self {
        let (dark, _) = watch::channel(is_dark);
        Self { dark, prefs }
    }

    /// What: Build the theme state from settings.
    ///
    /// Details:
    /// - A persisted `dark_mode` toggle wins
    /// - Otherwise `theme = dark|light`; `system` consults the terminal hint
    #[must_use]
    pub fn from_settings(settings: &Settings, prefs: Arc<dyn PreferenceStore>) -> Self {
        let is_dark = settings.dark_mode.unwrap_or_else(|| match settings.theme {
            ThemePreference::Dark => true,
            ThemePreference::Light => false,
            ThemePreference::System => system_prefers_dark(),
        });
        tracing::debug!(is_dark, "initial theme");
        Self::new(is_dark, prefs)
    }

    /// Current flag.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        *self.dark.borrow()
    }

    /// Flip the flag; returns the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.is_dark();
        self.set_dark(next);
        next
    }

    /// What: Set the flag.
    ///
    /// Output:
    /// - `true` when the value changed
    ///
    /// Details:
    /// - Unchanged values are neither broadcast nor persisted
    /// - Persistence failures are logged, the in-memory value still changes
    pub fn set_dark(&self, is_dark: bool) -> bool {
        let changed = self.dark.send_if_modified(|cur| {
            if *cur == is_dark {
                false
            } else {
                *cur = is_dark;
                true
            }
        });
        if changed {
            if let Err(e) = self.prefs.save_dark_mode(is_dark) {
                tracing::warn!(is_dark, error = %e, "failed to persist theme");
            }
            tracing::info!(is_dark, "theme changed");
        }
        changed
    }

    /// Change stream for renderers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.dark.subscribe()
    }
}

/// What: Guess the system preference from `COLORFGBG`.
///
/// Details:
/// - The variable looks like `15;0` (foreground;background); background
///   indices 0-6 and 8 are dark colours
/// - Anything unparsable defaults to light
fn system_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(parse_colorfgbg)
        .unwrap_or(false)
}

fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}
