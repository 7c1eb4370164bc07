//! Translation maps and the per-locale message catalog used for UI strings.

use std::collections::HashMap;
use std::path::Path;

use super::loader::load_catalog;
use super::locale::Locale;

/// Translation map: dot-notation key -> translated string.
pub type TranslationMap = HashMap<String, String>;

/// What: Look up a translation with fallback.
///
/// Inputs:
/// - `key`: Dot-notation key
/// - `translations`: Primary translation map
/// - `fallback_translations`: Fallback translation map (English)
///
/// Output:
/// - Translated string, or the key itself when neither map has it
#[must_use]
pub fn translate_with_fallback(
    key: &str,
    translations: &TranslationMap,
    fallback_translations: &TranslationMap,
) -> String {
    if let Some(translation) = translations.get(key) {
        return translation.clone();
    }
    if let Some(translation) = fallback_translations.get(key) {
        tracing::debug!(key, "translation missing in active catalog, using fallback");
        return translation.clone();
    }
    tracing::debug!(key, "missing translation key; returning key as-is");
    key.to_string()
}

/// Messages for both supported locales, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ar: TranslationMap,
    en: TranslationMap,
}

impl Catalog {
    /// What: Load both catalogs.
    ///
    /// Inputs:
    /// - `override_dir`: Optional directory holding `ar.yml`/`en.yml` overrides
    #[must_use]
    pub fn load(override_dir: Option<&Path>) -> Self {
        Self {
            ar: load_catalog(Locale::Ar, override_dir),
            en: load_catalog(Locale::En, override_dir),
        }
    }

    /// Catalog built from explicit maps (tests, embedding applications).
    #[must_use]
    pub const fn from_maps(ar: TranslationMap, en: TranslationMap) -> Self {
        Self { ar, en }
    }

    /// Look up `key` for `locale`, falling back to English, then to the key.
    #[must_use]
    pub fn t(&self, locale: Locale, key: &str) -> String {
        let primary = match locale {
            Locale::Ar => &self.ar,
            Locale::En => &self.en,
        };
        translate_with_fallback(key, primary, &self.en)
    }

    /// What: Translate and substitute `{}` placeholders in order.
    ///
    /// Inputs:
    /// - `locale`: Active locale
    /// - `key`: Dot-notation key
    /// - `args`: Replacement values; extra args are ignored, missing ones leave `{}`
    #[must_use]
    pub fn t_fmt(&self, locale: Locale, key: &str, args: &[&dyn std::fmt::Display]) -> String {
        let mut result = self.t(locale, key);
        for arg in args {
            result = result.replacen("{}", &arg.to_string(), 1);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut ar = HashMap::new();
        ar.insert("nav.home".to_string(), "الرئيسية".to_string());
        let mut en = HashMap::new();
        en.insert("nav.home".to_string(), "Home".to_string());
        en.insert("nav.faq".to_string(), "FAQ".to_string());
        en.insert("pager.of".to_string(), "Page {} of {}".to_string());
        Catalog::from_maps(ar, en)
    }

    #[test]
    fn lookup_uses_active_then_english_then_key() {
        let catalog = sample();
        assert_eq!(catalog.t(Locale::Ar, "nav.home"), "الرئيسية");
        assert_eq!(catalog.t(Locale::Ar, "nav.faq"), "FAQ");
        assert_eq!(catalog.t(Locale::En, "nav.missing"), "nav.missing");
    }

    #[test]
    fn placeholders_are_filled_in_order() {
        let catalog = sample();
        assert_eq!(catalog.t_fmt(Locale::En, "pager.of", &[&2, &7]), "Page 2 of 7");
        assert_eq!(catalog.t_fmt(Locale::En, "pager.of", &[&2]), "Page 2 of {}");
    }
}
