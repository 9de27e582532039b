//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod artifacts;
pub mod clean;
pub mod doctor;
pub mod ensure;
pub mod plan;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::cli::TargetArgs;
use crate::config::defaults;
use crate::core::machine_config::{apply_env, MachineConfig};
use crate::core::manifest::DependencyManifest;
use crate::core::profile::BuildProfile;
use crate::core::toolchain::{CompilerFamily, TargetPlatform, ToolchainIdentity};
use crate::infra::dirs::NativedepDirs;

/// How `ensure` reports the registered linkage
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmitFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// `cargo:` build-script directives on stdout
    Cargo,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency if needed and print what to link
    Ensure {
        /// Rebuild even if every artifact is present
        #[arg(short, long)]
        force: bool,

        /// Output format for the linkage
        #[arg(long, value_enum, default_value_t = EmitFormat::Text)]
        emit: EmitFormat,
    },

    /// Print the configure and install commands without running them
    Plan,

    /// Check that cmake, flex/bison and the SDKs are available
    Doctor,

    /// Remove CMake output for the profile
    Clean {
        /// Remove the output of every profile
        #[arg(long)]
        all: bool,
    },

    /// List required artifacts and whether they exist
    Artifacts,
}

impl Commands {
    /// Execute the command
    pub fn run(self, target: &TargetArgs) -> Result<()> {
        match self {
            Commands::Ensure { force, emit } => ensure::execute(&Session::load(target)?, force, emit),
            Commands::Plan => plan::execute(&Session::load(target)?),
            Commands::Doctor => doctor::execute(target),
            Commands::Clean { all } => clean::execute(&Session::load(target)?, all),
            Commands::Artifacts => artifacts::execute(&Session::load(target)?),
        }
    }
}

/// Everything a command needs, resolved once from the command line,
/// the manifest, the machine config and the environment
#[derive(Debug, Clone)]
pub struct Session {
    /// Absolute module root
    pub module_root: PathBuf,
    /// Effective manifest after all overrides
    pub manifest: DependencyManifest,
    /// Toolchain the commands target
    pub identity: ToolchainIdentity,
    /// Selected profile
    pub profile: BuildProfile,
}

impl Session {
    /// Resolve a session, failing on an unreadable or invalid manifest
    pub fn load(target: &TargetArgs) -> Result<Self> {
        let module_root = absolute(&target.module_root)?;
        let manifest = load_manifest(target, &module_root)?;
        Self::with_manifest(target, module_root, manifest)
    }

    /// Resolve a session around an already loaded manifest
    pub fn with_manifest(
        target: &TargetArgs,
        module_root: PathBuf,
        mut manifest: DependencyManifest,
    ) -> Result<Self> {
        let machine = MachineConfig::load(&NativedepDirs::new())
            .context("Failed to load machine configuration")?;
        machine.apply_to(&mut manifest);
        apply_env(&mut manifest, |key| std::env::var(key).ok());

        manifest.build.jobs = target
            .parallel
            .or(manifest.build.jobs)
            .or_else(|| Some(num_cpus::get()));
        manifest
            .validate()
            .context("Invalid configuration after applying overrides")?;

        let platform = target.platform.unwrap_or_else(TargetPlatform::host);
        let compiler = target
            .compiler
            .as_deref()
            .map(CompilerFamily::parse_lenient)
            .unwrap_or_default();
        let mut identity = ToolchainIdentity::new(platform, compiler);
        if let Some(version) = &target.compiler_version {
            identity = identity.with_version(version);
        }

        Ok(Self {
            module_root,
            manifest,
            identity,
            profile: target.profile,
        })
    }
}

/// Manifest path for the command line
pub fn manifest_path(target: &TargetArgs, module_root: &Path) -> PathBuf {
    target
        .manifest
        .clone()
        .unwrap_or_else(|| module_root.join(defaults::MANIFEST_FILE))
}

/// Load the manifest named on the command line, or the defaults if absent
pub fn load_manifest(target: &TargetArgs, module_root: &Path) -> Result<DependencyManifest> {
    let path = manifest_path(target, module_root);
    if target.manifest.is_some() && !path.exists() {
        anyhow::bail!("Manifest not found: {}", path.display());
    }
    DependencyManifest::load_or_default(&path)
        .with_context(|| format!("Failed to load manifest from {}", path.display()))
}

/// Anchor `path` at the current directory without requiring it to exist
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let joined = cwd.join(path);
    Ok(joined.canonicalize().unwrap_or(joined))
}
