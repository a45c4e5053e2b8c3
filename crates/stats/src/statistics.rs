//! Bucketing tasks by cache outcome

use crate::report::{CacheStatus, RunReport, TaskInfo};
use nxcache_core::UNKNOWN_COMMAND;
use serde::{Deserialize, Serialize};

/// Cache utilization of one run.
///
/// `local_cache_hits`, `remote_cache_hits` and `no_cache` partition the
/// report's tasks, each keeping the report's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatistics {
    pub command: String,
    pub total_tasks: usize,
    pub local_cache_hits: Vec<CacheTask>,
    pub remote_cache_hits: Vec<CacheTask>,
    pub no_cache: Vec<CacheTask>,
}

/// Identity of a task inside a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl From<&TaskInfo> for CacheTask {
    fn from(task: &TaskInfo) -> Self {
        Self {
            task_id: task.task_id.clone(),
            hash: task.hash.clone(),
        }
    }
}

impl CacheStatistics {
    /// Classify every task of `report`.
    ///
    /// Only the two hit markers are told apart; a miss, an unknown marker and
    /// a missing status all land in `no_cache`.
    pub fn compute(report: &RunReport) -> Self {
        let mut local = Vec::new();
        let mut remote = Vec::new();
        let mut none = Vec::new();

        for task in &report.tasks {
            let bucket = match task.cache_status {
                CacheStatus::LocalCacheHit => &mut local,
                CacheStatus::RemoteCacheHit => &mut remote,
                CacheStatus::CacheMiss | CacheStatus::Unknown => &mut none,
            };
            bucket.push(CacheTask::from(task));
        }

        Self {
            command: report.command().unwrap_or(UNKNOWN_COMMAND).to_string(),
            total_tasks: report.tasks.len(),
            local_cache_hits: local,
            remote_cache_hits: remote,
            no_cache: none,
        }
    }

    /// Share of tasks served from any cache, in percent
    pub fn hit_rate(&self) -> Option<f64> {
        if self.total_tasks == 0 {
            return None;
        }
        let hits = self.local_cache_hits.len() + self.remote_cache_hits.len();
        Some(hits as f64 / self.total_tasks as f64 * 100.0)
    }
}
