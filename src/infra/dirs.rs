//! Platform-specific directory management
//!
//! Locates the per-machine configuration directory. Follows the XDG Base
//! Directory Specification on Linux and standard locations on macOS and
//! Windows.
//!
//! `NATIVEDEP_CONFIG_DIR` overrides the default location.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "NATIVEDEP_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "nativedep";

/// Machine config file name
const MACHINE_CONFIG_FILE: &str = "config.toml";

/// Platform-specific directory provider for nativedep
#[derive(Debug, Clone)]
pub struct NativedepDirs {
    config_dir: PathBuf,
}

impl NativedepDirs {
    /// Resolve directories from the environment, then platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/nativedep` or `~/.config/nativedep`
    /// - macOS: `~/Library/Application Support/nativedep`
    /// - Windows: `%APPDATA%\nativedep`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to the machine `config.toml`
    #[must_use]
    pub fn machine_config_path(&self) -> PathBuf {
        self.config_dir.join(MACHINE_CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for NativedepDirs {
    fn default() -> Self {
        Self::new()
    }
}
