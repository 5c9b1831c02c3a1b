//! Utility functions and helpers for query-cache.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and log-safe key rendering.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
