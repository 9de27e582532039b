//! Artifact location
//!
//! Computes where each required artifact lands for a profile and whether
//! it is already there. Absence is a normal answer, never an error.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::manifest::ArtifactSpec;
use crate::core::profile::BuildProfile;

/// Placeholder substituted with the profile's CMake name
pub const PROFILE_PLACEHOLDER: &str = "{profile}";

/// A required artifact resolved for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Logical name
    pub name: String,
    /// Absolute (or module-relative) path
    pub path: PathBuf,
}

impl Artifact {
    /// Whether the artifact exists as a regular file
    pub fn is_present(&self) -> bool {
        self.path.is_file()
    }
}

/// Ordered set of artifacts for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    /// Profile the paths were resolved for
    pub profile: BuildProfile,
    /// Artifacts in declaration order
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    /// Paths in declaration order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|artifact| artifact.path.as_path())
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Resolves artifact templates below a build root
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    build_root: PathBuf,
    specs: Vec<ArtifactSpec>,
}

impl ArtifactLocator {
    /// Create a locator for `specs` relative to `build_root`
    pub fn new(build_root: impl Into<PathBuf>, specs: Vec<ArtifactSpec>) -> Self {
        Self {
            build_root: build_root.into(),
            specs,
        }
    }

    /// Resolve every template for `profile`
    pub fn locate(&self, profile: BuildProfile) -> ArtifactSet {
        let artifacts = self
            .specs
            .iter()
            .map(|spec| Artifact {
                name: spec.name.clone(),
                path: self
                    .build_root
                    .join(spec.path.replace(PROFILE_PLACEHOLDER, profile.cmake_name())),
            })
            .collect();

        ArtifactSet { profile, artifacts }
    }

    /// True iff every artifact exists as a regular file
    pub fn all_present(set: &ArtifactSet) -> bool {
        set.artifacts.iter().all(Artifact::is_present)
    }

    /// Artifacts that do not exist yet
    pub fn missing(set: &ArtifactSet) -> Vec<&Artifact> {
        set.artifacts
            .iter()
            .filter(|artifact| !artifact.is_present())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn specs() -> Vec<ArtifactSpec> {
        vec![
            ArtifactSpec::new("core", "{profile}/{profile}/core.lib"),
            ArtifactSpec::new("solver", "{profile}/deps/solver/{profile}/solver.lib"),
        ]
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"lib").unwrap();
    }

    #[test]
    fn test_locate_substitutes_every_placeholder() {
        let locator = ArtifactLocator::new("/build", specs());
        let set = locator.locate(BuildProfile::Release);

        assert_eq!(set.len(), 2);
        assert_eq!(set.artifacts[0].path, PathBuf::from("/build/Release/Release/core.lib"));
        assert_eq!(
            set.artifacts[1].path,
            PathBuf::from("/build/Release/deps/solver/Release/solver.lib")
        );
    }

    #[test]
    fn test_all_present_only_for_built_profile() {
        let temp = TempDir::new().unwrap();
        let locator = ArtifactLocator::new(temp.path(), specs());

        for path in locator.locate(BuildProfile::Release).paths() {
            touch(path);
        }

        for profile in BuildProfile::ALL {
            let set = locator.locate(profile);
            assert_eq!(
                ArtifactLocator::all_present(&set),
                profile == BuildProfile::Release,
                "profile {profile}"
            );
        }
    }

    #[test]
    fn test_missing_lists_absent_artifacts() {
        let temp = TempDir::new().unwrap();
        let locator = ArtifactLocator::new(temp.path(), specs());
        let set = locator.locate(BuildProfile::Debug);
        touch(&set.artifacts[0].path);

        let missing = ArtifactLocator::missing(&set);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "solver");
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let temp = TempDir::new().unwrap();
        let locator = ArtifactLocator::new(temp.path(), vec![ArtifactSpec::new("dir", "{profile}")]);
        let set = locator.locate(BuildProfile::Release);
        fs::create_dir_all(&set.artifacts[0].path).unwrap();

        assert!(!ArtifactLocator::all_present(&set));
    }
}
