//! REST boundary: HTTP client, session storage, and the authentication policy.

mod auth;
mod client;
mod session;

pub use auth::AuthPolicy;
pub use client::ApiClient;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
