//! HTTP middleware for request processing.
//!
//! Provides cache attachment and observability middleware.

pub mod cache;
pub mod tracing;
