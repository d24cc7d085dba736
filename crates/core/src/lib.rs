//! Vitrine Core - Shared catalog types and view-state logic.
//!
//! This crate provides common types used across all Vitrine components:
//! - `client` - HTTP wrapper around the external catalog API
//! - `storefront` - Public-facing catalog site
//! - `admin` - Catalog administration panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Everything that decides *what* a view shows (which hero slide is
//! active, how far a "load more" list reaches, which two hero records swap
//! their order) lives here so it can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and emails
//! - [`models`] - Catalog records as returned by the catalog API
//! - [`carousel`] - Hero banner rotation state
//! - [`pagination`] - "Load more" cursor
//! - [`reorder`] - Hero image reordering by adjacent swap
//! - [`draft`] - Product form draft
//! - [`guard`] - Checks that run before any request is issued

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod draft;
pub mod guard;
pub mod models;
pub mod pagination;
pub mod reorder;
pub mod types;

pub use types::*;
