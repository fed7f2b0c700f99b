//! Integration test utilities for the chat engine
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API backed by PostgreSQL and Redis.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
