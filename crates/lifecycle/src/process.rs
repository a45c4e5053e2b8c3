//! Spawning the server as a detached process

use nxcache_core::{Error, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Where the server's stdout/stderr go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Discard all output
    #[default]
    Discard,
    /// Write to the controller's stdout/stderr
    Inherit,
}

/// Everything needed to launch the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: PathBuf,
    /// Variables set on top of the inherited environment
    pub env: Vec<(String, String)>,
    pub output: OutputMode,
}

/// Creates the server process and returns its pid without waiting on it
pub trait ProcessLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<u32>;
}

/// Launches the server in its own session so it outlives the controller
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl ProcessLauncher for DetachedLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<u32> {
        let mut cmd = Command::new(&spec.executable);
        cmd.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        configure_stdio(&mut cmd, spec.output);
        configure_platform_specific(&mut cmd);

        let child = cmd
            .spawn()
            .map_err(|e| Error::spawn(&spec.executable, e))?;
        let pid = child.id();
        debug!(pid, executable = %spec.executable.display(), "spawned server");

        // Dropping the handle neither waits on nor kills the child
        drop(child);
        Ok(pid)
    }
}

fn configure_stdio(cmd: &mut Command, output: OutputMode) {
    cmd.stdin(Stdio::null());
    match output {
        OutputMode::Discard => {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        OutputMode::Inherit => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
    }
}

fn configure_platform_specific(cmd: &mut Command) {
    // New session: no controlling terminal and no shared process group, so
    // the terminal's SIGHUP/SIGINT never reaches the server
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x0000_0008;
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
        cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
    }
}
