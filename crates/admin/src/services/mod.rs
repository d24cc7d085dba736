//! Services for admin.
//!
//! # Services
//!
//! - `auth` - Login, registration, and logout against the catalog API
//! - `multipart` - Reading forms with file inputs

pub mod auth;
pub mod multipart;

pub use auth::{AdminAuthError, AdminAuthService};
pub use multipart::MultipartForm;
