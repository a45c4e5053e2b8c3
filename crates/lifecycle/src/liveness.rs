//! Deciding whether a pid record still tracks a server

use crate::pid_record::PidRecord;
use nxcache_core::{Error, Result};
use tracing::debug;

/// What a liveness check concluded about a pid record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    /// No record at the path
    Absent,
    /// A server is tracked. The pid is only known when the check read it.
    Tracked(Option<u32>),
    /// A record exists but no longer tracks a live server
    Stale { reason: String },
}

/// Strategy used by `start` to decide whether a server is already running
pub trait LivenessCheck {
    fn check(&self, record: &PidRecord) -> Result<Liveness>;
}

/// The record's existence alone means a server is running. The recorded
/// pid is never inspected.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordExists;

impl LivenessCheck for RecordExists {
    fn check(&self, record: &PidRecord) -> Result<Liveness> {
        if record.exists() {
            Ok(Liveness::Tracked(None))
        } else {
            Ok(Liveness::Absent)
        }
    }
}

/// Reads the recorded pid and probes the process table.
///
/// Unparsable records and pids of dead processes are reported as stale.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessProbe;

impl LivenessCheck for ProcessProbe {
    fn check(&self, record: &PidRecord) -> Result<Liveness> {
        if !record.exists() {
            return Ok(Liveness::Absent);
        }

        match record.read() {
            Ok(pid) if is_process_running(pid) => Ok(Liveness::Tracked(Some(pid))),
            Ok(pid) => Ok(Liveness::Stale {
                reason: format!("process {pid} is not running"),
            }),
            Err(Error::InvalidPidRecord { contents, .. }) => Ok(Liveness::Stale {
                reason: format!("pid file holds '{contents}'"),
            }),
            // Removed between the existence check and the read
            Err(Error::NotRunning { .. }) => Ok(Liveness::Absent),
            Err(e) => Err(e),
        }
    }
}

/// Check if a process with the given PID is running
pub fn is_process_running(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }

    #[cfg(unix)]
    {
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            return false;
        };
        // Signal 0 performs the permission and existence checks only
        if unsafe { libc::kill(pid, 0) } == 0 {
            return true;
        }
        let errno = std::io::Error::last_os_error().raw_os_error();
        debug!(pid, ?errno, "liveness probe failed");
        // EPERM: the process exists but belongs to someone else
        errno == Some(libc::EPERM)
    }

    #[cfg(not(unix))]
    {
        // No cheap probe here; assume alive so a record is never reaped wrongly
        debug!(pid, "liveness probe unavailable, assuming running");
        true
    }
}
