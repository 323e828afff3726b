//! Integration test utilities for the tracking server
//!
//! This crate provides helpers for running end-to-end tests against
//! the pixel endpoint and the dashboard REST API.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
