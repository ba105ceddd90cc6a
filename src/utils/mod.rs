//! Configuration, logging, retry and worker-pool utilities.

/// Typed server configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Bounded background worker pool.
pub mod pool;
/// Fixed-delay retry combinator.
pub mod retry;
