//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. Request ID (set and propagate `x-request-id`)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Security headers

pub mod security_headers;
pub mod trace;

pub use security_headers::security_headers_middleware;
pub use trace::http_trace_layer;
