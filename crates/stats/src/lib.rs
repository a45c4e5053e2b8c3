//! Cache utilization statistics for a completed Nx run.
//!
//! Reads the run report Nx leaves in `.nx/cache/run.json`, buckets every task
//! into local hits, remote hits and everything else, and either renders the
//! result for a terminal or writes it as JSON.

pub mod output;
pub mod render;
pub mod report;
pub mod statistics;

pub use output::{derived_file_name, destination, write_json, JsonOutput};
pub use render::render;
pub use report::{CacheStatus, RunInfo, RunReport, TaskInfo};
pub use statistics::{CacheStatistics, CacheTask};

use nxcache_core::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What `statistics` produced
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    /// Statistics to be rendered for the operator
    Report(CacheStatistics),
    /// Statistics written to this absolute path
    Written(PathBuf),
}

/// Summarize the report at `run_json_path`.
///
/// Without `output` the statistics are handed back for rendering; with it
/// they are written as JSON and the destination is returned. Nothing is
/// written when the report is missing or malformed.
pub fn statistics(run_json_path: &Path, output: Option<&JsonOutput>) -> Result<StatsOutcome> {
    let report = RunReport::load(run_json_path)?;
    let stats = CacheStatistics::compute(&report);
    debug!(
        path = %run_json_path.display(),
        total = stats.total_tasks,
        "computed cache statistics"
    );

    match output {
        None => Ok(StatsOutcome::Report(stats)),
        Some(output) => output::write_to_destination(output, &stats).map(StatsOutcome::Written),
    }
}
