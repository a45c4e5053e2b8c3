/// Constants used throughout the nxcache codebase
// Server executable
pub const SERVER_BINARY_NAME: &str = "nx-cache-server";
pub const SERVER_BIN_DIR: &str = "bin";

// Pid record
pub const PID_FILE_NAME: &str = "nx-cache-server.pid";

// Verbosity handed to the server through its environment
pub const SERVER_LOG_VAR: &str = "RUST_LOG";
pub const SERVER_LOG_DEFAULT: &str = "info";
pub const SERVER_LOG_VERBOSE: &str = "trace";

// Environment variable names
pub const NXCACHE_PID_FILE_VAR: &str = "NXCACHE_PID_FILE";
pub const NXCACHE_INSTALL_DIR_VAR: &str = "NXCACHE_INSTALL_DIR";
pub const NXCACHE_LOG_VAR: &str = "NXCACHE_LOG";

// Run report
pub const RUN_JSON_DEFAULT: &str = ".nx/cache/run.json";
pub const UNKNOWN_COMMAND: &str = "<unknown>";
pub const STATS_FILE_EXTENSION: &str = "json";

// Cache status markers
pub const LOCAL_CACHE_HIT: &str = "local-cache-hit";
pub const REMOTE_CACHE_HIT: &str = "remote-cache-hit";
pub const CACHE_MISS: &str = "cache-miss";
