//! # ResourceKit Shared Library
//!
//! This crate contains the domain types, persistence layer, and business logic
//! behind the ResourceKit API server.
//!
//! ## Module Organization
//!
//! - `models`: Resource model and request payload types
//! - `store`: Persistence seam (`ResourceStore`) with PostgreSQL and in-memory backends
//! - `services`: Owner-scoped data access used by the HTTP layer
//! - `auth`: Token verification and ownership checks
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the ResourceKit shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
