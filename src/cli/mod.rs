//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::core::profile::BuildProfile;
use crate::core::toolchain::TargetPlatform;
use commands::Commands;

/// nativedep - build and link an external CMake dependency
///
/// Ensures the native library is configured, built and installed for the
/// requested profile, then reports what the host build must link.
#[derive(Parser, Debug)]
#[command(name = "nativedep")]
#[command(author, version, long_version = long_version(), about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which dependency, profile and toolchain a command works on
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Module directory containing the dependency sources
    #[arg(long, global = true, default_value = ".", env = "NATIVEDEP_MODULE_ROOT")]
    pub module_root: PathBuf,

    /// Manifest path (default: <module-root>/nativedep.toml)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Build profile: debug, release, relwithdebinfo, minsizerel
    #[arg(short, long, global = true, default_value = "release")]
    pub profile: BuildProfile,

    /// Target platform (default: the running host)
    #[arg(long, global = true)]
    pub platform: Option<TargetPlatform>,

    /// Compiler family: default, clang, intel, vs2019, vs2022
    #[arg(long, global = true)]
    pub compiler: Option<String>,

    /// Compiler version, informational
    #[arg(long, global = true)]
    pub compiler_version: Option<String>,

    /// Parallel build jobs (default: manifest, machine config, then CPU count)
    #[arg(short = 'j', long, global = true)]
    pub parallel: Option<usize>,
}

/// Version string with the git revision and target the binary was built from
fn long_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        format!(
            "{}\ncommit: {}\ntarget: {}\nrustc: {}",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
            option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        )
    })
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run(&self.target)
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
