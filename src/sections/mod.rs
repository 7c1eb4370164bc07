//! Catalogue of application sections: identities, entity models, the REST
//! adapter, and text rendering.

mod fetcher;
mod kind;
pub mod models;
mod render;

pub use fetcher::ApiSectionFetcher;
pub use kind::{SectionKind, UnknownSection};
pub use render::{Payload, render_lines};
