//! Internationalization (i18n) module for Lisan.
//!
//! # Overview
//!
//! - **Locales**: Arabic (primary, right-to-left) and English ([`Locale`], [`Direction`])
//! - **Startup resolution**: settings -> system (`LC_ALL`, `LC_MESSAGES`, `LANG`) -> Arabic
//! - **Message catalogs**: YAML files under `config/locales/` are embedded in the
//!   binary; a `locales_dir` setting may point at overrides. Nested keys are
//!   flattened into dot notation (`errors.connection`).
//! - **Field resolution**: API entities carry parallel fields (`name` / `name_en`);
//!   [`resolve`] picks the display string for the active locale.
//!
//! # Error Handling
//!
//! - Unsupported locale codes are rejected with [`LocaleError`]
//! - Missing translation keys return the key itself and log at debug level
//! - Broken override files are logged and ignored; embedded catalogs always load

mod detection;
mod field;
mod loader;
mod locale;
mod resolver;
pub mod translations;

pub use detection::detect_system_locale;
pub use field::{Localized, resolve, resolve_str};
pub use loader::{load_catalog, load_locale_file};
pub use locale::{Direction, Locale, LocaleError};
pub use resolver::{LocaleSource, resolve_locale};
pub use translations::{Catalog, TranslationMap, translate_with_fallback};
