//! Mapping from the host operating system to the bundled server executable

use nxcache_core::{Error, Result, SERVER_BINARY_NAME, SERVER_BIN_DIR};
use std::path::{Path, PathBuf};

/// Operating systems a server binary is shipped for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Parse a platform identifier.
    ///
    /// Accepts Rust's `std::env::consts::OS` names as well as the Node.js
    /// style `win32` / `darwin` aliases.
    pub fn from_identifier(identifier: &str) -> Result<Self> {
        match identifier {
            "windows" | "win32" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            other => Err(Error::configuration(format!(
                "Unsupported platform: {other}"
            ))),
        }
    }

    /// The platform this controller is running on
    pub fn current() -> Result<Self> {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Directory below `bin/` holding this platform's executable
    pub const fn bin_subdir(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Linux => "linux",
            Self::MacOs => "mac",
        }
    }

    /// File name of the executable on this platform
    pub fn executable_name(&self) -> String {
        match self {
            Self::Windows => format!("{SERVER_BINARY_NAME}.exe"),
            Self::Linux | Self::MacOs => SERVER_BINARY_NAME.to_string(),
        }
    }

    /// Executable path relative to the install directory
    pub fn executable_relative(&self) -> PathBuf {
        Path::new(SERVER_BIN_DIR)
            .join(self.bin_subdir())
            .join(self.executable_name())
    }
}

/// Resolve the server executable for `identifier` below `install_dir`
pub fn resolve_server_executable(identifier: &str, install_dir: &Path) -> Result<PathBuf> {
    let platform = Platform::from_identifier(identifier)?;
    Ok(install_dir.join(platform.executable_relative()))
}
