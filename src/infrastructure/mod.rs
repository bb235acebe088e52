//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - Key-value store backends (Redis and in-process)

pub mod cache;
