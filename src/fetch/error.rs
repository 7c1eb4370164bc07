use std::fmt;
use std::time::Duration;

use crate::i18n::{Catalog, Locale};

/// Why a fetch produced no envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not finish within its time budget.
    Timeout(Duration),
    /// Connection refused, DNS failure, reset, TLS error...
    Transport(String),
    /// Missing or rejected bearer token.
    Unauthorized,
    /// Non-success HTTP status without a usable envelope.
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The body was not a valid envelope for the expected type.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(after) => write!(f, "request timed out after {}s", after.as_secs_f32()),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Unauthorized => f.write_str("authentication required"),
            Self::Status { status } => write!(f, "unexpected HTTP status {status}"),
            Self::Decode(msg) => write!(f, "invalid response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Catalog key of the message shown to users for this failure.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Timeout(_) | Self::Transport(_) => "errors.connection",
            Self::Unauthorized => "errors.session_expired",
            Self::Status { .. } | Self::Decode(_) => "errors.generic",
        }
    }

    /// What: Localized, non-technical message for this failure.
    ///
    /// Details:
    /// - Technical detail (status codes, reqwest messages) is logged, never shown
    #[must_use]
    pub fn user_message(&self, catalog: &Catalog, locale: Locale) -> String {
        catalog.t(locale, self.message_key())
    }

    /// Whether the failure is a network-level problem worth a manual retry.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}
