//! Filesystem layout of a dependency
//!
//! Anchors the manifest's relative directories at the module root. The
//! CMake output directory is one subdirectory of the build root per profile.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::manifest::DependencyManifest;
use crate::core::profile::BuildProfile;
use crate::core::toolchain::TargetPlatform;

/// Resolved directories for one dependency on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyLayout {
    /// Module root; child processes run here
    pub module_root: PathBuf,
    /// CMake source directory
    pub source_dir: PathBuf,
    /// Parent of the per-profile CMake output directories
    pub build_root: PathBuf,
    /// Install prefix under the host's intermediate build area
    pub install_prefix: PathBuf,
}

impl DependencyLayout {
    /// Resolve the manifest's directories against `module_root`
    pub fn resolve(
        manifest: &DependencyManifest,
        module_root: &Path,
        platform: TargetPlatform,
    ) -> Self {
        let install_prefix = manifest
            .dependency
            .install_prefix
            .replace("{platform}", platform.name());

        Self {
            module_root: module_root.to_path_buf(),
            source_dir: module_root.join(&manifest.dependency.source_dir),
            build_root: module_root.join(&manifest.dependency.build_dir),
            install_prefix: module_root.join(install_prefix),
        }
    }

    /// CMake output (`-B`) directory for a profile
    pub fn output_dir(&self, profile: BuildProfile) -> PathBuf {
        self.build_root.join(profile.cmake_name())
    }
}
