//! Supported locales and their reading direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the application ships translations and localized content for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Arabic, the primary content language.
    #[default]
    Ar,
    /// English, the secondary content language.
    En,
}

/// Text reading direction of a locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Right-to-left (Arabic).
    Rtl,
    /// Left-to-right (English).
    Ltr,
}

impl Direction {
    /// Attribute value used by markup renderers (`dir="rtl"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rtl => "rtl",
            Self::Ltr => "ltr",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a locale code is not one the application supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The code is syntactically fine but names an unsupported language.
    Unsupported(String),
    /// The code is empty or malformed.
    Invalid(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(code) => write!(f, "unsupported locale \"{code}\" (expected ar or en)"),
            Self::Invalid(code) => write!(f, "invalid locale code \"{code}\""),
        }
    }
}

impl std::error::Error for LocaleError {}

impl Locale {
    /// The language that entity primary fields (`name`, `description`, ...) are written in.
    pub const PRIMARY: Self = Self::Ar;

    /// Every supported locale, primary first.
    pub const ALL: [Self; 2] = [Self::Ar, Self::En];

    /// Short code sent to the API (`locale=ar`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Reading direction applied to the document when this locale is active.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Ar => Direction::Rtl,
            Self::En => Direction::Ltr,
        }
    }

    /// The other supported locale; used by the language toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ar => Self::En,
            Self::En => Self::Ar,
        }
    }

    /// What: Parse a locale code into a supported `Locale`.
    ///
    /// Inputs:
    /// - `code`: Code such as `ar`, `en`, `en-US`, `ar_EG.UTF-8`
    ///
    /// Output:
    /// - `Ok(Locale)` when the language subtag is supported
    ///
    /// # Errors
    /// - `LocaleError::Invalid` for empty or malformed codes
    /// - `LocaleError::Unsupported` for well-formed codes of other languages
    ///
    /// Details:
    /// - Encoding suffixes (`.UTF-8`) and modifiers (`@latin`) are ignored
    /// - Only the language subtag is compared, case-insensitively
    pub fn parse(code: &str) -> Result<Self, LocaleError> {
        let trimmed = code.trim();
        let without_encoding = trimmed.split(['.', '@']).next().unwrap_or_default();
        let language = without_encoding
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::Invalid(trimmed.to_string()));
        }
        match language.as_str() {
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            _ => Err(LocaleError::Unsupported(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
