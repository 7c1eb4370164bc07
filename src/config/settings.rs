use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::skeleton::SETTINGS_SKELETON_CONTENT;
use crate::util::config::{parse_bool, parse_key_value, skip_comment_or_empty};

/// Theme preference from `settings.conf`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemePreference {
    /// Always dark.
    Dark,
    /// Always light.
    Light,
    /// Follow the terminal/desktop hint.
    #[default]
    System,
}

impl ThemePreference {
    /// Parse a config value; `None` for unknown spellings.
    #[must_use]
    pub fn from_config_key(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "system" | "auto" | "" => Some(Self::System),
            _ => None,
        }
    }
}

/// User settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the REST API, without trailing slash.
    pub api_base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Quiet period applied to typed search filters.
    pub search_debounce: Duration,
    /// Raw locale setting; empty means follow the system.
    pub locale: String,
    /// Theme preference used when no toggle has been persisted.
    pub theme: ThemePreference,
    /// Persisted dark-mode toggle, if the user ever flipped it.
    pub dark_mode: Option<bool>,
    /// Directory with message catalog overrides.
    pub locales_dir: Option<PathBuf>,
    /// Response cache lifetime; zero disables caching.
    pub response_cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            search_debounce: Duration::from_millis(500),
            locale: String::new(),
            theme: ThemePreference::System,
            dark_mode: None,
            locales_dir: None,
            response_cache_ttl: Duration::ZERO,
        }
    }
}

/// Upper bound for `request_timeout_secs` (one hour).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3_600;
/// Upper bound for `search_debounce_ms` (ten seconds).
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 10_000;
/// Upper bound for `response_cache_ttl_secs` (one day).
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;

fn clamped(value: u64, max: u64, key: &str) -> u64 {
    if value > max {
        tracing::warn!(key, value, max, "setting above maximum; clamped");
    }
    value.min(max)
}

/// What: Parse settings content over defaults.
///
/// Inputs:
/// - `content`: `settings.conf` text
///
/// Output:
/// - Settings with every recognized, valid key applied
///
/// Details:
/// - Unknown keys and unparsable values are logged and ignored
/// - Zero timeouts are rejected (a request must be bounded)
/// - Durations above the `MAX_*` bounds are clamped with a warning
#[must_use]
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((key, val)) = parse_key_value(line) else {
            continue;
        };
        match key.as_str() {
            "api_base_url" | "api_url" | "base_url" => {
                if !val.is_empty() {
                    out.api_base_url = val.trim_end_matches('/').to_string();
                }
            }
            "request_timeout_secs" | "timeout_secs" => match val.parse::<u64>() {
                Ok(v) if v > 0 => {
                    out.request_timeout = Duration::from_secs(clamped(v, MAX_REQUEST_TIMEOUT_SECS, &key));
                }
                _ => tracing::warn!(value = %val, "ignoring invalid request_timeout_secs"),
            },
            "search_debounce_ms" | "debounce_ms" => match val.parse::<u64>() {
                Ok(v) => {
                    out.search_debounce = Duration::from_millis(clamped(v, MAX_SEARCH_DEBOUNCE_MS, &key));
                }
                Err(_) => tracing::warn!(value = %val, "ignoring invalid search_debounce_ms"),
            },
            "locale" | "language" => out.locale = val,
            "theme" => match ThemePreference::from_config_key(&val) {
                Some(t) => out.theme = t,
                None => tracing::warn!(value = %val, "ignoring invalid theme"),
            },
            "dark_mode" => out.dark_mode = parse_bool(&val),
            "locales_dir" => {
                if !val.is_empty() {
                    out.locales_dir = Some(PathBuf::from(val));
                }
            }
            "response_cache_ttl_secs" => match val.parse::<u64>() {
                Ok(v) => {
                    out.response_cache_ttl = Duration::from_secs(clamped(v, MAX_CACHE_TTL_SECS, &key));
                }
                Err(_) => tracing::warn!(value = %val, "ignoring invalid response_cache_ttl_secs"),
            },
            other => tracing::debug!(key = other, "unknown settings key"),
        }
    }
    out
}

/// What: Load settings from `path`, writing the skeleton first when the file is missing or empty.
///
/// Output:
/// - Parsed settings; defaults when the file cannot be read
pub fn load_settings(path: &Path) -> Settings {
    let empty_or_missing = fs::metadata(path).map_or(true, |m| m.len() == 0);
    if empty_or_missing {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match fs::write(path, SETTINGS_SKELETON_CONTENT) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote default settings skeleton"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write settings skeleton"),
        }
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read settings; using defaults");
            Settings::default()
        }
    }
}
