//! Content-management services built on the document store.
//!
//! Two small services cover the backend's inbound surface: per-user
//! preference documents ([`PreferencesService`]) and blog posts looked up
//! by slug ([`BlogService`]). The HTTP layer in front of them is an
//! external collaborator; these services are its call targets.

mod blog;
mod preferences;

pub use blog::*;
pub use preferences::*;
