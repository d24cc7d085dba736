//! Session middleware configuration for admin.
//!
//! Sessions live in a `SQLite`-backed tower-sessions store, so a logged-in
//! admin survives a restart of the panel. Tests swap in the in-memory store.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::SessionStore;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "vitrine_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Open the session database and create the session table if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn create_session_store(database_url: &str) -> Result<SqliteStore, sqlx::Error> {
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await?;

    let store = SqliteStore::new(pool)
        .with_table_name("admin_sessions")
        .map_err(|e| sqlx::Error::Configuration(e.into()))?;
    store.migrate().await?;
    Ok(store)
}

/// Wrap `store` in the session layer.
///
/// The cookie is `SameSite=Strict` and HTTP-only; it is marked secure when
/// the panel's public URL is HTTPS.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
