use clap::Subcommand;
use nxcache_core::Result;
use std::path::PathBuf;

pub mod cache_stats;
pub mod start;
pub mod stop;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the cache server in the background
    Start {
        /// Run the server with trace level logging
        #[arg(long)]
        verbose: bool,

        /// Pid file tracking the server (defaults to NXCACHE_PID_FILE or the install directory)
        #[arg(long = "pidFile", value_name = "PATH")]
        pid_file: Option<PathBuf>,

        /// Pass the server's stdout/stderr through instead of discarding them
        #[arg(long)]
        inherit_output: bool,

        /// Clear a pid file whose process is no longer running before starting
        #[arg(long)]
        reap_stale: bool,
    },

    /// Stop the cache server
    Stop {
        /// Pid file tracking the server (defaults to NXCACHE_PID_FILE or the install directory)
        #[arg(long = "pidFile", value_name = "PATH")]
        pid_file: Option<PathBuf>,
    },

    /// Show cache statistics of the last Nx run
    CacheStats {
        /// Nx run report to read
        #[arg(long = "runJsonPath", value_name = "PATH")]
        run_json_path: Option<PathBuf>,

        /// Write the statistics as JSON, optionally to FILE
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        json: Option<Option<PathBuf>>,
    },
}

impl Commands {
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Start {
                verbose,
                pid_file,
                inherit_output,
                reap_stale,
            } => start::execute(verbose, pid_file, inherit_output, reap_stale),
            Commands::Stop { pid_file } => stop::execute(pid_file),
            Commands::CacheStats {
                run_json_path,
                json,
            } => cache_stats::execute(run_json_path, json),
        }
    }
}
