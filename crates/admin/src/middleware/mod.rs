//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions, `SQLite` store, SameSite=Strict)
//! 4. Security headers
//! 5. Auth guard (`RequireAdminAuth` extractor on protected handlers)

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    LOGIN_PATH, OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin,
};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, create_session_store};
