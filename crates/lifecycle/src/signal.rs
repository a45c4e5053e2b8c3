//! Delivering the termination signal to a recorded pid

use nxcache_core::{Error, Result};
use tracing::debug;

/// Asks a process to terminate
pub trait Terminator {
    fn terminate(&self, pid: u32) -> Result<()>;
}

/// Sends SIGTERM on Unix and runs `taskkill` on Windows
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTerminator;

impl Terminator for SystemTerminator {
    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> Result<()> {
        // 0 and negative values address process groups, never a single server
        let target = libc::pid_t::try_from(pid)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| Error::signal(pid, "not a valid process id"))?;

        debug!(pid, "sending SIGTERM");
        if unsafe { libc::kill(target, libc::SIGTERM) } == 0 {
            return Ok(());
        }

        let err = std::io::Error::last_os_error();
        let message = match err.raw_os_error() {
            Some(libc::ESRCH) => "no such process".to_string(),
            Some(libc::EPERM) => "permission denied".to_string(),
            _ => err.to_string(),
        };
        Err(Error::signal(pid, message))
    }

    #[cfg(windows)]
    fn terminate(&self, pid: u32) -> Result<()> {
        if pid == 0 {
            return Err(Error::signal(pid, "not a valid process id"));
        }

        debug!(pid, "running taskkill");
        let output = std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .output()
            .map_err(|e| Error::signal(pid, format!("failed to run taskkill: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::signal(
                pid,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}
