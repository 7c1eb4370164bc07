//! Localized field resolution for API entities carrying parallel language fields.
//!
//! Payloads carry the Arabic text in the primary field (`name`, `description`)
//! and the English text in a secondary field (`name_en`, `description_en`).
//! Resolution picks one of the two at render time and never touches the entity.

use super::locale::Locale;

/// What: Pick the display string for the active locale.
///
/// Inputs:
/// - `primary`: Value written in `Locale::PRIMARY` (may be absent or empty)
/// - `secondary`: Value written in the other locale (may be absent or empty)
/// - `locale`: Active locale
///
/// Output:
/// - Borrowed display string; empty when both inputs are empty
///
/// Details:
/// - Primary locale: `primary`, else `secondary`
/// - Other locale: `secondary`, else `primary`
/// - Never allocates; callers call `.to_owned()` only when they need ownership
#[must_use]
pub fn resolve<'a>(primary: Option<&'a str>, secondary: Option<&'a str>, locale: Locale) -> &'a str {
    let primary = primary.filter(|s| !s.is_empty());
    let secondary = secondary.filter(|s| !s.is_empty());
    let picked = if locale == Locale::PRIMARY {
        primary.or(secondary)
    } else {
        secondary.or(primary)
    };
    picked.unwrap_or_default()
}

/// Convenience for the common case where the primary field is always present.
#[must_use]
pub fn resolve_str<'a>(primary: &'a str, secondary: Option<&'a str>, locale: Locale) -> &'a str {
    resolve(Some(primary), secondary, locale)
}

/// Entities with a localizable display title.
///
/// Implemented by section models; nested localizable values (a plan's
/// feature list, a service's category) are resolved by the caller one level
/// at a time rather than recursively.
pub trait Localized {
    /// Resolved title (name, question, headline...) for `locale`.
    fn title(&self, locale: Locale) -> &str;

    /// Resolved secondary text (description, answer, excerpt...), empty if none.
    fn body(&self, _locale: Locale) -> &str {
        ""
    }
}
