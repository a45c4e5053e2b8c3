use nxcache_core::Result;
use nxcache_lifecycle::Controller;
use nxcache_utils::paths::{default_pid_file, install_dir};
use std::path::PathBuf;

pub fn execute(pid_file: Option<PathBuf>) -> Result<()> {
    let pid_file = pid_file.unwrap_or_else(default_pid_file);
    let stopped = Controller::new(install_dir()).stop(&pid_file)?;
    println!("nx-cache-server with pid {} stopped.", stopped.pid);
    Ok(())
}
