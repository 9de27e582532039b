//! Error types for nativedep
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::infra::process::ProcessError;

/// Failures of the native dependency build.
///
/// Every variant aborts the host build; nothing is registered with the host
/// once one of these is returned.
#[derive(Error, Debug)]
pub enum DependencyError {
    /// The configure step exited nonzero
    #[error("Cannot configure CMake project. Exited with code: {code}")]
    ConfigurationFailure { code: i32 },

    /// The build/install step exited nonzero after a successful configure
    #[error("Cannot build project. Exited with code: {code}")]
    BuildFailure { code: i32 },

    /// Install reported success but an expected artifact is still absent
    #[error("Build reported success but artifact '{name}' is missing at '{path}'")]
    MissingArtifact { name: String, path: PathBuf },

    /// The external program could not be launched or supervised
    #[error("Failed to run external build step: {0}")]
    Process(#[from] ProcessError),

    /// `ensure` was called on an orchestrator that already reached a terminal state
    #[error("Dependency orchestration already finished in state '{state}'")]
    AlreadyFinished { state: String },
}

impl DependencyError {
    /// Exit code of the failing external step, if the failure came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ConfigurationFailure { code } | Self::BuildFailure { code } => Some(*code),
            _ => None,
        }
    }
}

/// Dependency manifest (`nativedep.toml`) errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read the manifest file
    #[error("Failed to read manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse the manifest file
    #[error("Failed to parse manifest '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Manifest parsed but is not usable
    #[error("Invalid manifest: {message}")]
    Invalid { message: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}
