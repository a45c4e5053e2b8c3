//! Core errors and constants for the `nxcache` workspace.
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by the lifecycle
//!   controller, the statistics aggregator and the CLI.
//! - **`constants`**: file names, environment variable names and cache status
//!   markers.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
