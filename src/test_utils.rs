//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::profile::BuildProfile;
    use crate::core::toolchain::{CompilerFamily, TargetPlatform};

    /// Generate any build profile
    pub fn build_profile() -> impl Strategy<Value = BuildProfile> {
        proptest::sample::select(BuildProfile::ALL.to_vec())
    }

    /// Generate any target platform
    pub fn target_platform() -> impl Strategy<Value = TargetPlatform> {
        prop_oneof![
            Just(TargetPlatform::Win64),
            Just(TargetPlatform::Linux),
            Just(TargetPlatform::Mac),
        ]
    }

    /// Generate any compiler family
    pub fn compiler_family() -> impl Strategy<Value = CompilerFamily> {
        prop_oneof![
            Just(CompilerFamily::Default),
            Just(CompilerFamily::Clang),
            Just(CompilerFamily::Intel),
            Just(CompilerFamily::VisualStudio2019),
            Just(CompilerFamily::VisualStudio2022),
        ]
    }

    /// Generate a feature toggle name that cannot clash with built-in definitions
    pub fn feature_name() -> impl Strategy<Value = String> {
        "FEATURE_[A-Z0-9_]{0,16}"
    }

    /// Generate a relative path segment without separators
    pub fn path_segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,12}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::artifacts::ArtifactLocator;
    use crate::core::assembler::CommandAssembler;
    use crate::core::layout::DependencyLayout;
    use crate::core::manifest::{ArtifactSpec, DependencyManifest, FeatureToggle};
    use crate::core::toolchain::{
        generator_name, ToolchainIdentity, ToolchainParameterResolver,
    };
    use proptest::prelude::*;
    use std::path::Path;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_profile_parses_from_display(profile in build_profile()) {
            prop_assert_eq!(profile.to_string().parse::<crate::core::profile::BuildProfile>(), Ok(profile));
        }

        #[test]
        fn prop_configure_command_is_always_complete(
            platform in target_platform(),
            compiler in compiler_family(),
            profile in build_profile(),
        ) {
            let manifest = DependencyManifest::default();
            let root = Path::new("/module");
            let identity = ToolchainIdentity::new(platform, compiler);
            let layout = DependencyLayout::resolve(&manifest, root, platform);
            let params = ToolchainParameterResolver::new(&manifest, root).resolve(&identity);
            let command = CommandAssembler::new(&manifest, &layout, &params).configure_command(profile);

            prop_assert_eq!(command.has_flag("-G"), !generator_name(&identity).is_empty());
            prop_assert!(command.has_flag("-S"));
            prop_assert!(command.has_flag("-B"));
            prop_assert_eq!(command.define("CMAKE_BUILD_TYPE"), Some(profile.cmake_name()));
            prop_assert_eq!(
                command.args().last().map(|arg| arg.flag().to_string()),
                Some("-DCMAKE_INSTALL_PREFIX".to_string())
            );
        }

        #[test]
        fn prop_features_become_on_off_defines(name in feature_name(), enabled in any::<bool>()) {
            let mut manifest = DependencyManifest::default();
            manifest.features = vec![FeatureToggle::new(name.clone(), enabled)];
            prop_assert!(manifest.validate().is_ok());

            let root = Path::new("/module");
            let identity = ToolchainIdentity::host();
            let layout = DependencyLayout::resolve(&manifest, root, identity.platform);
            let params = ToolchainParameterResolver::new(&manifest, root).resolve(&identity);
            let command = CommandAssembler::new(&manifest, &layout, &params)
                .configure_command(crate::core::profile::BuildProfile::Release);

            let expected = if enabled { "ON" } else { "OFF" };
            prop_assert_eq!(command.define(&name), Some(expected));
        }

        #[test]
        fn prop_located_paths_contain_profile_name(
            segment in path_segment(),
            profile in build_profile(),
        ) {
            let locator = ArtifactLocator::new(
                "/build",
                vec![ArtifactSpec::new("lib", format!("{{profile}}/{segment}/{{profile}}/x.lib"))],
            );
            let set = locator.locate(profile);
            let expected = Path::new("/build")
                .join(profile.cmake_name())
                .join(&segment)
                .join(profile.cmake_name())
                .join("x.lib");
            prop_assert_eq!(&set.artifacts[0].path, &expected);
        }
    }
}
