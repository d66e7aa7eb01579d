//! # UserDesk Shared Library
//!
//! Data model, persistence and business logic for the UserDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: The User record and its input types
//! - `db`: Connection pool and migrations
//! - `repository`: The `UserRepository` trait and its PostgreSQL and in-memory implementations
//! - `service`: `UserService`, the layer the HTTP handlers call

pub mod db;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the UserDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
