use std::path::PathBuf;

/// Result type alias for nxcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for nxcache operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors, e.g. an unsupported platform
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A server is already tracked by the pid file
    #[error("server is already running (pid file '{pid_file}' exists)")]
    AlreadyRunning { pid_file: PathBuf },

    /// No server is tracked by the pid file
    #[error("no running server found (pid file '{pid_file}' does not exist)")]
    NotRunning { pid_file: PathBuf },

    /// The pid file exists but does not hold a usable process id
    #[error("pid file '{pid_file}' does not contain a valid process id: '{contents}'")]
    InvalidPidRecord { pid_file: PathBuf, contents: String },

    /// Spawning the server executable failed
    #[error("failed to spawn '{executable}': {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delivering the termination signal failed
    #[error("failed to stop process {pid}: {message}")]
    Signal { pid: u32, message: String },

    /// The run report does not exist
    #[error("could not find run report at '{path}'")]
    ReportNotFound { path: PathBuf },

    /// The run report is not valid JSON
    #[error("failed to read or parse '{path}': {message}")]
    ReportParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn already_running(pid_file: impl Into<PathBuf>) -> Self {
        Error::AlreadyRunning {
            pid_file: pid_file.into(),
        }
    }

    #[must_use]
    pub fn not_running(pid_file: impl Into<PathBuf>) -> Self {
        Error::NotRunning {
            pid_file: pid_file.into(),
        }
    }

    /// Create an error for a pid file holding something other than a process id
    #[must_use]
    pub fn invalid_pid_record(pid_file: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Error::InvalidPidRecord {
            pid_file: pid_file.into(),
            contents: contents.into(),
        }
    }

    /// Create a spawn error
    #[must_use]
    pub fn spawn(executable: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Spawn {
            executable: executable.into(),
            source,
        }
    }

    /// Create a signal delivery error
    #[must_use]
    pub fn signal(pid: u32, message: impl Into<String>) -> Self {
        Error::Signal {
            pid,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn report_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ReportNotFound { path: path.into() }
    }

    /// Create a report parse error, keeping the parser message
    #[must_use]
    pub fn report_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::ReportParse {
            path: path.into(),
            message: source.to_string(),
            source,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// True for the "already running" / "not running" conflicts
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::AlreadyRunning { .. } | Error::NotRunning { .. })
    }
}
