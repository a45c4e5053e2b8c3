//! Writing statistics as a JSON document

use crate::statistics::CacheStatistics;
use nxcache_core::{Error, Result, STATS_FILE_EXTENSION};
use nxcache_utils::atomic_file::write_atomic_string;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where `--json` output goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonOutput {
    /// Explicit file name; derived from the run command when `None`
    pub file_name: Option<PathBuf>,
}

/// File name derived from the run command: spaces become underscores
pub fn derived_file_name(command: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}.{STATS_FILE_EXTENSION}",
        command.replace(' ', "_")
    ))
}

/// Resolve the absolute destination for `stats`
pub fn destination(output: &JsonOutput, stats: &CacheStatistics, cwd: &Path) -> PathBuf {
    let name = output
        .file_name
        .clone()
        .unwrap_or_else(|| derived_file_name(&stats.command));
    cwd.join(name)
}

/// Serialize `stats` and write it to `path`, creating missing directories
pub fn write_json(stats: &CacheStatistics, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    write_atomic_string(path, &content)?;
    debug!(path = %path.display(), "wrote cache statistics");
    Ok(())
}

/// Resolve the destination against the current directory and write
pub fn write_to_destination(output: &JsonOutput, stats: &CacheStatistics) -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::file_system(".", "resolve current directory", e))?;
    let path = destination(output, stats, &cwd);
    write_json(stats, &path)?;
    Ok(path)
}
