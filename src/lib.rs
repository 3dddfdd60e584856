//! TestTrace server library.
//!
//! Core functionality for the test-result recording service: database
//! access, domain models, and the REST API surface.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
