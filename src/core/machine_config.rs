//! Per-machine configuration
//!
//! Reads overrides from `config.toml` in the config directory. The manifest
//! describes the dependency; this file describes where a particular machine
//! keeps its SDKs and which cmake it uses. Environment variables take
//! precedence over both.
//!
//! ```toml
//! [sdk]
//! boost_root = "D:/sdk/boost_1_70_0"
//! sdl_root = "D:/sdk/SDL2"
//!
//! [cmake]
//! program = "C:/Program Files/CMake/bin/cmake.exe"
//!
//! [build]
//! jobs = 8
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::manifest::DependencyManifest;
use crate::infra::dirs::NativedepDirs;

/// Overrides the Boost SDK root
pub const ENV_BOOST_ROOT: &str = "NATIVEDEP_BOOST_ROOT";
/// Overrides the SDL2 SDK root
pub const ENV_SDL_ROOT: &str = "NATIVEDEP_SDL_ROOT";
/// Overrides the cmake program
pub const ENV_CMAKE: &str = "NATIVEDEP_CMAKE";

/// Machine configuration errors
#[derive(Error, Debug)]
pub enum MachineConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Machine-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MachineConfig {
    /// SDK install roots
    #[serde(default)]
    pub sdk: SdkConfig,

    /// cmake settings
    #[serde(default)]
    pub cmake: CMakeConfig,

    /// Default build options
    #[serde(default)]
    pub build: BuildConfig,
}

/// SDK install roots
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SdkConfig {
    /// Boost root
    pub boost_root: Option<PathBuf>,

    /// SDL2 root
    pub sdl_root: Option<PathBuf>,
}

/// cmake settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CMakeConfig {
    /// cmake program
    pub program: Option<String>,
}

/// Default build options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildConfig {
    /// Default number of parallel jobs
    pub jobs: Option<usize>,
}

impl MachineConfig {
    /// Load from the config directory, or defaults if there is no file
    pub fn load(dirs: &NativedepDirs) -> Result<Self, MachineConfigError> {
        Self::load_from_path(&dirs.machine_config_path())
    }

    /// Load from a specific path, or defaults if there is no file
    pub fn load_from_path(path: &Path) -> Result<Self, MachineConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| MachineConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| MachineConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Overlay these settings on a manifest
    pub fn apply_to(&self, manifest: &mut DependencyManifest) {
        if let Some(root) = &self.sdk.boost_root {
            manifest.boost.root.clone_from(root);
        }
        if let Some(root) = &self.sdk.sdl_root {
            manifest.sdl.root.clone_from(root);
        }
        if let Some(program) = &self.cmake.program {
            manifest.cmake.program.clone_from(program);
        }
        if manifest.build.jobs.is_none() {
            manifest.build.jobs = self.build.jobs;
        }
    }
}

/// Overlay `NATIVEDEP_*` environment overrides on a manifest.
///
/// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
/// Empty values are ignored.
pub fn apply_env<F>(manifest: &mut DependencyManifest, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(root) = get(ENV_BOOST_ROOT) {
        tracing::debug!("{ENV_BOOST_ROOT} overrides Boost root: {root}");
        manifest.boost.root = PathBuf::from(root);
    }
    if let Some(root) = get(ENV_SDL_ROOT) {
        tracing::debug!("{ENV_SDL_ROOT} overrides SDL2 root: {root}");
        manifest.sdl.root = PathBuf::from(root);
    }
    if let Some(program) = get(ENV_CMAKE) {
        tracing::debug!("{ENV_CMAKE} overrides cmake: {program}");
        manifest.cmake.program = program;
    }
}
