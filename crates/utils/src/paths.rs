//! Default locations for the pid file, the server binaries and the run report

use nxcache_core::{
    NXCACHE_INSTALL_DIR_VAR, NXCACHE_PID_FILE_VAR, PID_FILE_NAME, RUN_JSON_DEFAULT,
};
use std::env;
use std::path::PathBuf;

/// Directory the controller is installed in.
///
/// `NXCACHE_INSTALL_DIR` wins; otherwise the directory holding the running
/// executable, falling back to the current directory.
pub fn install_dir() -> PathBuf {
    if let Some(dir) = env::var_os(NXCACHE_INSTALL_DIR_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Pid file used when `--pidFile` is not given
pub fn default_pid_file() -> PathBuf {
    env::var_os(NXCACHE_PID_FILE_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| install_dir().join(PID_FILE_NAME))
}

/// Run report used when `--runJsonPath` is not given
pub fn default_run_json() -> PathBuf {
    PathBuf::from(".").join(RUN_JSON_DEFAULT)
}
