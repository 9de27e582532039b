//! Dependency build orchestration
//!
//! Drives one native dependency from "not checked" to "ready to link":
//!
//! 1. If every required artifact for the profile already exists, skip
//!    straight to registration without launching anything.
//! 2. Otherwise run the configure step, then the build+install step. A
//!    nonzero exit from either aborts with the exit code in the error.
//! 3. Register definitions, include directories and libraries with the
//!    host build, in a stable order.
//!
//! An orchestrator is single-use. Once it reaches `Ready` or `Failed`,
//! further calls to [`DependencyBuildOrchestrator::ensure`] are refused.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::core::artifacts::{ArtifactLocator, ArtifactSet};
use crate::core::assembler::CommandAssembler;
use crate::core::command::CommandLine;
use crate::core::layout::DependencyLayout;
use crate::core::linkage::{HostBuild, Linkage};
use crate::core::manifest::DependencyManifest;
use crate::core::profile::BuildProfile;
use crate::core::toolchain::{ToolchainIdentity, ToolchainParameterResolver, ToolchainParameters};
use crate::error::DependencyError;
use crate::infra::process::ProcessSupervisor;

/// Orchestration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildState {
    /// Nothing inspected yet
    NotChecked,
    /// Every artifact was already on disk
    ArtifactsPresent,
    /// Configure step running
    Configuring,
    /// Build+install step running
    Installing,
    /// Artifacts registered with the host
    Ready,
    /// A step failed; nothing was registered
    Failed,
}

impl BuildState {
    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildState::Ready | BuildState::Failed)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::NotChecked => "NotChecked",
            BuildState::ArtifactsPresent => "ArtifactsPresent",
            BuildState::Configuring => "Configuring",
            BuildState::Installing => "Installing",
            BuildState::Ready => "Ready",
            BuildState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// The two external commands a build would run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Profile the commands were assembled for
    pub profile: BuildProfile,
    /// Configure command
    pub configure: CommandLine,
    /// Build+install command
    pub install: CommandLine,
}

/// Result of a successful [`DependencyBuildOrchestrator::ensure`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnsureOutcome {
    /// Final state, always [`BuildState::Ready`]
    pub state: BuildState,
    /// Whether the external build ran
    pub built: bool,
    /// Everything that was registered with the host
    pub linkage: Linkage,
}

/// Ensures one native dependency is built and wires it into a host build
#[derive(Debug)]
pub struct DependencyBuildOrchestrator<'a, S: ProcessSupervisor + ?Sized> {
    manifest: &'a DependencyManifest,
    supervisor: &'a S,
    identity: ToolchainIdentity,
    profile: BuildProfile,
    layout: DependencyLayout,
    params: ToolchainParameters,
    state: BuildState,
    force: bool,
}

impl<'a, S: ProcessSupervisor + ?Sized> DependencyBuildOrchestrator<'a, S> {
    /// Create an orchestrator for `manifest` rooted at `module_root`
    pub fn new(
        manifest: &'a DependencyManifest,
        module_root: &Path,
        identity: ToolchainIdentity,
        profile: BuildProfile,
        supervisor: &'a S,
    ) -> Self {
        let layout = DependencyLayout::resolve(manifest, module_root, identity.platform);
        let params = ToolchainParameterResolver::new(manifest, module_root).resolve(&identity);

        Self {
            manifest,
            supervisor,
            identity,
            profile,
            layout,
            params,
            state: BuildState::NotChecked,
            force: false,
        }
    }

    /// Rebuild even when every artifact is already present
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Current state
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Profile being built
    pub fn profile(&self) -> BuildProfile {
        self.profile
    }

    /// Toolchain identity the parameters were resolved for
    pub fn identity(&self) -> &ToolchainIdentity {
        &self.identity
    }

    /// Resolved directories
    pub fn layout(&self) -> &DependencyLayout {
        &self.layout
    }

    /// Resolved toolchain parameters
    pub fn parameters(&self) -> &ToolchainParameters {
        &self.params
    }

    /// Required artifacts for the profile
    pub fn artifacts(&self) -> ArtifactSet {
        ArtifactLocator::new(&self.layout.build_root, self.manifest.artifacts.clone())
            .locate(self.profile)
    }

    /// Assemble both commands without running anything
    pub fn plan(&self) -> BuildPlan {
        let assembler = self.assembler();
        BuildPlan {
            profile: self.profile,
            configure: assembler.configure_command(self.profile),
            install: assembler.install_command(self.profile),
        }
    }

    /// What would be registered with the host for the current artifact set
    pub fn linkage(&self) -> Linkage {
        self.collect_linkage(&self.artifacts())
    }

    /// Make sure the dependency is built, then register it with `host`.
    ///
    /// Nothing is registered unless every step succeeded.
    pub fn ensure<H: HostBuild + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<EnsureOutcome, DependencyError> {
        if self.state != BuildState::NotChecked {
            return Err(DependencyError::AlreadyFinished {
                state: self.state.to_string(),
            });
        }

        let artifacts = self.artifacts();
        let built = if !self.force && ArtifactLocator::all_present(&artifacts) {
            self.transition(BuildState::ArtifactsPresent);
            false
        } else {
            if self.force {
                tracing::info!("Rebuilding {} ({}) on request", self.name(), self.profile);
            } else {
                for artifact in ArtifactLocator::missing(&artifacts) {
                    tracing::debug!("Missing {}: {}", artifact.name, artifact.path.display());
                }
            }

            if let Err(e) = self.build(&artifacts) {
                self.transition(BuildState::Failed);
                return Err(e);
            }
            true
        };

        let linkage = self.collect_linkage(&artifacts);
        linkage.apply_to(host);
        self.transition(BuildState::Ready);

        Ok(EnsureOutcome {
            state: self.state,
            built,
            linkage,
        })
    }

    fn build(&mut self, artifacts: &ArtifactSet) -> Result<(), DependencyError> {
        self.transition(BuildState::Configuring);
        let configure = self.assembler().configure_command(self.profile);
        let result = self.supervisor.run(&configure)?;
        if !result.success() {
            return Err(DependencyError::ConfigurationFailure {
                code: result.exit_code,
            });
        }

        self.transition(BuildState::Installing);
        let install = self.assembler().install_command(self.profile);
        let result = self.supervisor.run(&install)?;
        if !result.success() {
            return Err(DependencyError::BuildFailure {
                code: result.exit_code,
            });
        }

        if self.manifest.build.verify_artifacts {
            if let Some(artifact) = ArtifactLocator::missing(artifacts).first() {
                return Err(DependencyError::MissingArtifact {
                    name: artifact.name.clone(),
                    path: artifact.path.clone(),
                });
            }
        }

        Ok(())
    }

    fn collect_linkage(&self, artifacts: &ArtifactSet) -> Linkage {
        let mut linkage = Linkage::default();

        for definition in self.manifest.exported_definitions() {
            linkage.add_definition(&definition);
        }
        for dir in &self.manifest.link.include_dirs {
            linkage.add_include_dir(&self.layout.module_root.join(dir));
        }
        for library in artifacts.paths() {
            linkage.add_library(library);
        }
        for library in &self.params.filesystem.libraries {
            linkage.add_library(library);
        }
        if let Some(sdl) = &self.params.multimedia {
            linkage.add_include_dir(&sdl.include_dir);
            for library in &sdl.libraries {
                linkage.add_library(library);
            }
            for runtime in &sdl.runtime {
                linkage.add_runtime_dependency(runtime);
            }
        }

        linkage
    }

    fn assembler(&self) -> CommandAssembler<'_> {
        CommandAssembler::new(self.manifest, &self.layout, &self.params)
    }

    fn name(&self) -> &str {
        &self.manifest.dependency.name
    }

    fn transition(&mut self, next: BuildState) {
        tracing::info!("{} ({}): {} -> {}", self.name(), self.profile, self.state, next);
        self.state = next;
    }
}
