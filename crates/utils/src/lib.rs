//! Shared utilities for nxcache
//!
//! Logging setup, atomic file writes and default path resolution used by
//! the statistics aggregator and the CLI.

pub mod atomic_file;
pub mod paths;
pub mod tracing;

pub use atomic_file::*;
pub use paths::*;
