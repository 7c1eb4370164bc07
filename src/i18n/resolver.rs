//! Startup locale resolution: persisted setting, then system, then default.

use super::detection::detect_system_locale;
use super::locale::Locale;

/// Where the effective startup locale came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleSource {
    /// Explicit value from `settings.conf` or the command line.
    Settings,
    /// Detected from `LC_ALL`/`LC_MESSAGES`/`LANG`.
    System,
    /// Nothing usable was found.
    Default,
}

/// What: Resolve the effective locale to start with.
///
/// Inputs:
/// - `settings_locale`: Value from settings (empty string means auto-detect)
///
/// Output:
/// - Resolved locale and where it came from
///
/// Details:
/// - Priority: `settings_locale` -> system locale -> `Locale::PRIMARY`
/// - Invalid or unsupported settings values are logged and ignored
#[must_use]
pub fn resolve_locale(settings_locale: &str) -> (Locale, LocaleSource) {
    resolve_with(settings_locale, detect_system_locale)
}

/// What: Resolve with an injectable system detector.
///
/// Inputs:
/// - `settings_locale`: Value from settings
/// - `system`: Detector returning the system locale, if any
///
/// Output:
/// - Resolved locale and its source
pub(crate) fn resolve_with<F>(settings_locale: &str, system: F) -> (Locale, LocaleSource)
where
    F: FnOnce() -> Option<Locale>,
{
    let trimmed = settings_locale.trim();
    if !trimmed.is_empty() {
        match Locale::parse(trimmed) {
            Ok(locale) => return (locale, LocaleSource::Settings),
            Err(e) => {
                tracing::warn!(
                    value = trimmed,
                    error = %e,
                    "invalid locale in settings; using system locale or default"
                );
            }
        }
    }
    system().map_or_else(
        || {
            tracing::debug!(default = %Locale::PRIMARY, "system locale detection failed, using default");
            (Locale::PRIMARY, LocaleSource::Default)
        },
        |locale| (locale, LocaleSource::System),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_value_takes_priority() {
        assert_eq!(
            resolve_with("en", || Some(Locale::Ar)),
            (Locale::En, LocaleSource::Settings)
        );
    }

    #[test]
    fn empty_or_invalid_settings_fall_back_to_system() {
        assert_eq!(
            resolve_with("   ", || Some(Locale::En)),
            (Locale::En, LocaleSource::System)
        );
        assert_eq!(
            resolve_with("fr-FR", || Some(Locale::En)),
            (Locale::En, LocaleSource::System)
        );
    }

    #[test]
    fn default_when_nothing_detected() {
        assert_eq!(
            resolve_with("", || None),
            (Locale::Ar, LocaleSource::Default)
        );
    }
}
