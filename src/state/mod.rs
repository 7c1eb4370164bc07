//! Shared client state: active locale (with reading direction) and theme.
//!
//! Both stores are explicit values handed around through `Arc`, so tests and
//! embedders can build as many isolated instances as they need.

mod locale;
mod theme;

pub use locale::{LocaleChange, LocaleState};
pub use theme::ThemeState;
