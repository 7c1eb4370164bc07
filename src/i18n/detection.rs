//! System locale detection utilities.

use std::env;

use super::locale::Locale;

/// Environment variables consulted for the system locale, highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// What: Detect the system locale from environment variables.
///
/// Inputs:
/// - None (reads from environment)
///
/// Output:
/// - `Some(Locale)` when a supported language is configured, `None` otherwise
///
/// Details:
/// - Checks `LC_ALL`, `LC_MESSAGES`, and `LANG` in order
/// - The first variable holding a *supported* language wins; `C`/`POSIX` and
///   unsupported languages are skipped
#[must_use]
pub fn detect_system_locale() -> Option<Locale> {
    detect_from(|name| env::var(name).ok())
}

/// What: Detect a locale using an arbitrary variable lookup.
///
/// Inputs:
/// - `lookup`: Returns the value of a variable name, if set
///
/// Output:
/// - First supported locale found in priority order
///
/// Details:
/// - Split out from `detect_system_locale` so tests do not mutate the process environment
pub(crate) fn detect_from<F>(lookup: F) -> Option<Locale>
where
    F: Fn(&str) -> Option<String>,
{
    LOCALE_VARS.iter().find_map(|name| {
        let raw = lookup(name)?;
        let parsed = Locale::parse(&raw).ok();
        if parsed.is_none() && !raw.trim().is_empty() {
            tracing::debug!(var = name, value = %raw, "ignoring unsupported system locale");
        }
        parsed
    })
}
