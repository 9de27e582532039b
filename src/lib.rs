//! nativedep - external native dependency build orchestrator
//!
//! Ensures that a CMake-based native library (with its own nested
//! sub-dependencies) is configured, built and installed before a host build
//! links against it, then hands the resulting headers and libraries to the
//! host build description.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Orchestration logic: artifacts, toolchain resolution,
//!   command assembly, the build state machine, linkage registration
//! - [`infra`] - Infrastructure layer (child processes, platform directories)
//! - [`config`] - Default values for the engine-sim dependency
//! - [`error`] - Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use nativedep::core::linkage::Linkage;
//! use nativedep::core::manifest::DependencyManifest;
//! use nativedep::core::orchestrator::DependencyBuildOrchestrator;
//! use nativedep::core::profile::BuildProfile;
//! use nativedep::core::toolchain::ToolchainIdentity;
//! use nativedep::infra::process::SystemSupervisor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let module_root = std::path::PathBuf::from("Source/ThirdParty/EngineSim");
//! let manifest = DependencyManifest::load_or_default(&module_root.join("nativedep.toml"))?;
//! let supervisor = SystemSupervisor::new(&module_root)?;
//! let mut orchestrator = DependencyBuildOrchestrator::new(
//!     &manifest,
//!     &module_root,
//!     ToolchainIdentity::host(),
//!     BuildProfile::Release,
//!     &supervisor,
//! );
//! let mut linkage = Linkage::default();
//! orchestrator.ensure(&mut linkage)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
