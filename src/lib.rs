//! Lisan: bilingual (Arabic/English) client core.
//!
//! The crate keeps every mounted section's data consistent with the active
//! locale. A locale change updates [`state::LocaleState`], which notifies
//! every subscriber through the [`bridge::NotificationBridge`]; each section
//! then refetches on its own driver task, and only the newest result for the
//! active locale is ever committed. Entities carry parallel `*_en` fields that
//! [`i18n::resolve`] picks between at render time.

pub mod api;
pub mod app;
pub mod bridge;
pub mod config;
pub mod fetch;
pub mod i18n;
pub mod logging;
pub mod sections;
pub mod state;
pub mod util;
