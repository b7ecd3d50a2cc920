//! # Residence Shared Library
//!
//! Domain logic shared by the residence management server: the credential
//! store, the session/token authority, the apartment and resident registries,
//! and the storage layer they run on.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, bearer tokens, dashboard sessions
//! - `db`: PostgreSQL pool and migrations
//! - `models`: Row types and their SQL queries
//! - `store`: Storage trait with PostgreSQL and in-memory backends
//! - `registry`: Apartment and resident CRUD with validation

pub mod auth;
pub mod db;
pub mod models;
pub mod registry;
pub mod store;

/// Current version of the residence shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
