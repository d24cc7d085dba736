//! Admin-side models.
//!
//! Catalog records live in `vitrine-core`; this module only holds what the
//! admin panel keeps in its own session store.

pub mod session;

pub use session::{CurrentAdmin, SessionState, keys as session_keys};
