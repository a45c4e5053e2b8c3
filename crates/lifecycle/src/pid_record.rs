//! The pid file recording the tracked server process

use nxcache_core::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Handle to the pid file at a given path.
///
/// The file holds nothing but the decimal process id. It is created once by
/// `start` and removed by `stop`; it is never rewritten in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRecord {
    path: PathBuf,
}

impl PidRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse the recorded process id
    pub fn read(&self) -> Result<u32> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::not_running(&self.path)
            } else {
                Error::file_system(&self.path, "read pid file", e)
            }
        })?;

        parse_pid(&contents).ok_or_else(|| Error::invalid_pid_record(&self.path, contents.trim()))
    }

    /// Create the record holding `pid`, failing if one already exists.
    ///
    /// Uses an exclusive create so two concurrent starts cannot both
    /// believe they own the record.
    pub fn create(&self, pid: u32) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    Error::already_running(&self.path)
                } else {
                    Error::file_system(&self.path, "create pid file", e)
                }
            })?;

        let written = file
            .write_all(pid.to_string().as_bytes())
            .and_then(|()| file.sync_all());

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&self.path);
            return Err(Error::file_system(&self.path, "write pid file", e));
        }

        Ok(())
    }

    /// Remove the record. A record that is already gone is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::file_system(&self.path, "remove pid file", e)),
        }
    }
}

/// Parse a positive decimal process id, tolerating surrounding whitespace
pub fn parse_pid(contents: &str) -> Option<u32> {
    contents.trim().parse::<u32>().ok().filter(|pid| *pid > 0)
}
