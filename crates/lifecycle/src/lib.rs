//! Lifecycle controller for the nx-cache-server.
//!
//! `start` spawns the platform's server binary as a detached process and
//! records its pid in a pid file; `stop` reads that file, sends a termination
//! signal and removes the file again. The pid file's existence is the only
//! state: there is no supervision and no communication with the server.
//!
//! Process creation and signal delivery sit behind [`ProcessLauncher`] and
//! [`Terminator`], and the "is it already running" decision behind
//! [`LivenessCheck`].

pub mod controller;
pub mod liveness;
pub mod pid_record;
pub mod platform;
pub mod process;
pub mod signal;

pub use controller::{server_log_level, Controller, StartOptions, Started, Stopped};
pub use liveness::{is_process_running, Liveness, LivenessCheck, ProcessProbe, RecordExists};
pub use pid_record::PidRecord;
pub use platform::{resolve_server_executable, Platform};
pub use process::{DetachedLauncher, LaunchSpec, OutputMode, ProcessLauncher};
pub use signal::{SystemTerminator, Terminator};
