//! # Students API
//!
//! A CRUD HTTP service for student records.
//!
//! ## Architecture
//!
//! - [`models`]: the `Student` record and the `Group` enumeration
//! - [`services`]: field validation rules
//! - [`db`]: the `StudentRepository` trait with SQLite and in-memory backends
//! - [`config`]: TOML configuration file loading
//! - [`http`]: axum router, handlers and the JSON response envelope

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
