//! The Nx `run.json` report

use nxcache_core::{Error, Result, CACHE_MISS, LOCAL_CACHE_HIT, REMOTE_CACHE_HIT};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Root object written by `nx run-many`.
///
/// Every field is optional: a report without `run.command` or `tasks` is
/// still summarized, just with less to say.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunReport {
    #[serde(default, deserialize_with = "lenient")]
    pub run: Option<RunInfo>,
    #[serde(default, deserialize_with = "lenient_tasks")]
    pub tasks: Vec<TaskInfo>,
}

/// Top-level metadata about the run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub command: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub inner: Option<bool>,
}

/// A single task execution record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub params: Option<String>,
    #[serde(default)]
    pub cache_status: CacheStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<i64>,
}

/// Cache outcome of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    LocalCacheHit,
    RemoteCacheHit,
    CacheMiss,
    /// Absent, null, or any value Nx is not known to write
    #[default]
    Unknown,
}

impl CacheStatus {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            LOCAL_CACHE_HIT => Self::LocalCacheHit,
            REMOTE_CACHE_HIT => Self::RemoteCacheHit,
            CACHE_MISS => Self::CacheMiss,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for CacheStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(CacheStatus::from_marker)
            .unwrap_or_default())
    }
}

/// Deserialize `T`, treating a value of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A non-array `tasks` counts as no tasks; a non-object entry as an empty task
fn lenient_tasks<'de, D>(deserializer: D) -> std::result::Result<Vec<TaskInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

impl RunReport {
    /// Load and parse a report from disk
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::report_not_found(path)
            } else {
                Error::file_system(path, "read run report", e)
            }
        })?;

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| Error::report_parse(path, e))?;
        Ok(Self::from_value(value))
    }

    /// Interpret an already parsed document. Anything that is not an object
    /// yields an empty report.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The command line that produced the report, if recorded
    pub fn command(&self) -> Option<&str> {
        self.run.as_ref().and_then(|run| run.command.as_deref())
    }
}
