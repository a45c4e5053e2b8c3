use nxcache_core::Result;
use nxcache_lifecycle::{Controller, OutputMode, StartOptions};
use nxcache_utils::paths::{default_pid_file, install_dir};
use std::path::PathBuf;

pub fn execute(
    verbose: bool,
    pid_file: Option<PathBuf>,
    inherit_output: bool,
    reap_stale: bool,
) -> Result<()> {
    let options = StartOptions {
        pid_file: pid_file.unwrap_or_else(default_pid_file),
        verbose,
        output: if inherit_output {
            OutputMode::Inherit
        } else {
            OutputMode::Discard
        },
        reap_stale,
    };

    let started = Controller::new(install_dir()).start(&options)?;
    println!("nx-cache-server started with pid: {}", started.pid);
    Ok(())
}
