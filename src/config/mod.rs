//! Settings file handling and preference persistence.
//!
//! Settings live in `settings.conf` (`key = value`, `#` comments) inside the
//! configuration directory. The locale and the dark-mode toggle are written
//! back to the same file through [`PreferenceStore`], so the choice survives
//! restarts.

mod paths;
mod save;
mod settings;
mod skeleton;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub use paths::{CONFIG_DIR_ENV, config_dir, logs_dir, session_path_in, settings_path_in};
pub use save::save_key;
pub use settings::{Settings, ThemePreference, load_settings, parse_settings};
pub use skeleton::SETTINGS_SKELETON_CONTENT;

use crate::i18n::Locale;

/// Errors raised while persisting settings.
#[derive(Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The store refused the write (used by in-memory stores).
    Rejected(String),
}

impl SettingsError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Rejected(reason) => write!(f, "settings write rejected: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Rejected(_) => None,
        }
    }
}

/// Where the locale and theme choices are persisted.
pub trait PreferenceStore: Send + Sync {
    /// Persist the active locale.
    ///
    /// # Errors
    /// Returns `SettingsError` when the value could not be stored.
    fn save_locale(&self, locale: Locale) -> Result<(), SettingsError>;

    /// Persist the dark-mode flag.
    ///
    /// # Errors
    /// Returns `SettingsError` when the value could not be stored.
    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError>;
}

/// Preferences written into `settings.conf`.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Store backed by the file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// File this store writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for SettingsFile {
    fn save_locale(&self, locale: Locale) -> Result<(), SettingsError> {
        save_key(&self.path, "locale", locale.code())
    }

    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError> {
        save_key(&self.path, "dark_mode", if dark { "true" } else { "false" })
    }
}

/// In-memory preferences for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    locale: Mutex<Option<Locale>>,
    dark: Mutex<Option<bool>>,
    fail: bool,
}

impl MemoryPreferences {
    /// Store that accepts every write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every write, to exercise non-fatal persistence failures.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Last persisted locale.
    #[must_use]
    pub fn locale(&self) -> Option<Locale> {
        self.locale.lock().ok().and_then(|g| *g)
    }

    /// Last persisted dark-mode flag.
    #[must_use]
    pub fn dark_mode(&self) -> Option<bool> {
        self.dark.lock().ok().and_then(|g| *g)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn save_locale(&self, locale: Locale) -> Result<(), SettingsError> {
        if self.fail {
            return Err(SettingsError::Rejected("read-only store".to_string()));
        }
        let mut guard = self
            .locale
            .lock()
            .map_err(|_| SettingsError::Rejected("poisoned".to_string()))?;
        *guard = Some(locale);
        Ok(())
    }

    fn save_dark_mode(&self, dark: bool) -> Result<(), SettingsError> {
        if self.fail {
            return Err(SettingsError::Rejected("read-only store".to_string()));
        }
        let mut guard = self
            .dark
            .lock()
            .map_err(|_| SettingsError::Rejected("poisoned".to_string()))?;
        *guard = Some(dark);
        Ok(())
    }
}
