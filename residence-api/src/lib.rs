//! # Residence Server Library
//!
//! HTTP front-ends for the residence manager: a bearer-token JSON API under
//! `/api` and a session-cookie dashboard.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `flash`: One-shot dashboard messages
//! - `middleware`: Authentication guards and security headers
//! - `routes`: Route handlers
//! - `views`: HTML pages

pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod routes;
pub mod views;
