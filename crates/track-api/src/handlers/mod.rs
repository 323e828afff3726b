//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod health;
pub mod pixel;
pub mod stats;
pub mod tracks;
