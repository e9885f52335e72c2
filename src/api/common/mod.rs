//! Helpers shared by the API handlers.

pub mod tracing;
