//! Integration tests for the dependency build orchestrator
//!
//! Drives the full check → configure → install → register flow against a
//! scripted process supervisor and a recording host.

mod common;

use common::{RecordingHost, TestProject, SMALL_MANIFEST};
use nativedep::core::linkage::{CargoDirectives, Linkage};
use nativedep::core::manifest::{DependencyManifest, FeatureToggle};
use nativedep::core::orchestrator::{BuildState, DependencyBuildOrchestrator};
use nativedep::core::profile::BuildProfile;
use nativedep::core::toolchain::{CompilerFamily, TargetPlatform, ToolchainIdentity};
use nativedep::error::DependencyError;
use nativedep::infra::process::ScriptedSupervisor;
use std::path::PathBuf;

fn win64_vs2022() -> ToolchainIdentity {
    ToolchainIdentity::new(TargetPlatform::Win64, CompilerFamily::VisualStudio2022)
}

fn linux() -> ToolchainIdentity {
    ToolchainIdentity::new(TargetPlatform::Linux, CompilerFamily::Default)
}

// ============================================
// Fast path
// ============================================

#[test]
fn test_present_artifacts_never_invoke_supervisor() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::default();

    for profile in BuildProfile::ALL {
        let mut orchestrator = DependencyBuildOrchestrator::new(
            &manifest,
            &project.path(),
            win64_vs2022(),
            profile,
            &supervisor,
        );
        project.touch_all(orchestrator.artifacts().paths());

        let mut host = RecordingHost::default();
        let outcome = orchestrator.ensure(&mut host).unwrap();

        assert!(!outcome.built, "profile {profile}");
        assert!(!host.calls.is_empty());
    }

    assert_eq!(supervisor.call_count(), 0);
}

#[test]
fn test_artifacts_of_other_profile_do_not_count() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::default();

    let release = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        win64_vs2022(),
        BuildProfile::Release,
        &supervisor,
    );
    project.touch_all(release.artifacts().paths());

    let mut debug = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        win64_vs2022(),
        BuildProfile::Debug,
        &supervisor,
    );
    let outcome = debug.ensure(&mut Linkage::default()).unwrap();

    assert!(outcome.built);
    assert_eq!(supervisor.call_count(), 2);
}

// ============================================
// Failure paths
// ============================================

#[test]
fn test_configure_exit_1_fails_without_install() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::with_exit_codes(&[1]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        win64_vs2022(),
        BuildProfile::Release,
        &supervisor,
    );

    let mut host = RecordingHost::default();
    let err = orchestrator.ensure(&mut host).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cannot configure CMake project. Exited with code: 1"
    );
    assert_eq!(err.exit_code(), Some(1));
    assert_eq!(orchestrator.state(), BuildState::Failed);
    assert!(host.calls.is_empty());

    let calls = supervisor.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].has_flag("-S"));
    assert!(!calls[0].has_flag("--build"));
}

#[test]
fn test_install_exit_5_fails_and_registers_nothing() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::with_exit_codes(&[0, 5]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        win64_vs2022(),
        BuildProfile::Release,
        &supervisor,
    );

    let mut host = RecordingHost::default();
    let err = orchestrator.ensure(&mut host).unwrap_err();

    assert!(matches!(err, DependencyError::BuildFailure { code: 5 }));
    assert!(err.to_string().contains('5'));
    assert_eq!(err.to_string(), "Cannot build project. Exited with code: 5");
    assert_eq!(orchestrator.state(), BuildState::Failed);
    assert!(host.calls.is_empty());
    assert_eq!(supervisor.call_count(), 2);
}

#[test]
fn test_signal_exit_code_is_reported() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::with_exit_codes(&[0, -1]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    let err = orchestrator.ensure(&mut Linkage::default()).unwrap_err();
    assert!(err.to_string().ends_with("Exited with code: -1"));
}

#[test]
fn test_verify_artifacts_reports_first_missing() {
    let project = TestProject::new();
    let mut manifest = DependencyManifest::from_toml(SMALL_MANIFEST).unwrap();
    manifest.build.verify_artifacts = true;
    let supervisor = ScriptedSupervisor::with_exit_codes(&[0, 0]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    let mut host = RecordingHost::default();
    let err = orchestrator.ensure(&mut host).unwrap_err();

    match err {
        DependencyError::MissingArtifact { name, path } => {
            assert_eq!(name, "core");
            assert!(path.ends_with("solver/build/Release/out/libcore.a"));
        }
        other => panic!("expected MissingArtifact, got {other:?}"),
    }
    assert!(host.calls.is_empty());
}

#[test]
fn test_without_verification_missing_artifacts_still_register() {
    let project = TestProject::new();
    let manifest = DependencyManifest::from_toml(SMALL_MANIFEST).unwrap();
    let supervisor = ScriptedSupervisor::with_exit_codes(&[0, 0]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    let outcome = orchestrator.ensure(&mut Linkage::default()).unwrap();
    assert_eq!(outcome.state, BuildState::Ready);
    assert_eq!(outcome.linkage.libraries.len(), 2);
}

#[test]
fn test_ensure_twice_is_already_finished() {
    let project = TestProject::new();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::default();
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    orchestrator.ensure(&mut Linkage::default()).unwrap();
    let err = orchestrator.ensure(&mut Linkage::default()).unwrap_err();

    assert!(matches!(err, DependencyError::AlreadyFinished { .. }));
    assert_eq!(orchestrator.state(), BuildState::Ready);
    assert_eq!(supervisor.call_count(), 2);
}

// ============================================
// End-to-end registration
// ============================================

#[test]
fn test_end_to_end_registers_in_stable_order() {
    let project = TestProject::new();
    let root = project.path();
    let manifest = DependencyManifest::default();
    let supervisor = ScriptedSupervisor::with_exit_codes(&[0, 0]);
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &root,
        win64_vs2022(),
        BuildProfile::Release,
        &supervisor,
    );

    let mut host = RecordingHost::default();
    let outcome = orchestrator.ensure(&mut host).unwrap();

    let build = root.join("engine-sim/build");
    let boost_lib = PathBuf::from("C:/local/boost_1_70_0")
        .join("lib64-msvc-14.3")
        .join("libboost_filesystem-vc143-mt-x64-1_70.lib");
    let expected = vec![
        "define:ATG_ENGINE_SIM_PIRANHA_ENABLED=1".to_string(),
        format!("include:{}", root.join("engine-sim/include").display()),
        format!("include:{}", root.join("engine-sim/scripting/include").display()),
        format!("include:{}", root.join("engine-sim/dependencies/submodules").display()),
        format!("library:{}", build.join("Release/Release/engine-sim.lib").display()),
        format!(
            "library:{}",
            build.join("Release/Release/engine-sim-script-interpreter.lib").display()
        ),
        format!(
            "library:{}",
            build
                .join("Release/dependencies/submodules/simple-2d-constraint-solver/Release/simple-2d-constraint-solver.lib")
                .display()
        ),
        format!(
            "library:{}",
            build
                .join("Release/dependencies/submodules/piranha/Release/piranha.lib")
                .display()
        ),
        format!("library:{}", boost_lib.display()),
    ];

    assert_eq!(host.calls, expected);
    assert_eq!(outcome.state, BuildState::Ready);
    assert!(outcome.built);

    let calls = supervisor.calls();
    assert_eq!(calls[0].define("CMAKE_BUILD_TYPE"), Some("Release"));
    assert_eq!(calls[1].value_of("--target"), Some("install"));
}

#[test]
fn test_app_variant_registers_multimedia_last() {
    let project = TestProject::new();
    let mut manifest = DependencyManifest::default();
    manifest.features = vec![
        FeatureToggle::new("PIRANHA_ENABLED", false),
        FeatureToggle::new("BUILD_APP", true),
    ];
    let supervisor = ScriptedSupervisor::default();
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        win64_vs2022(),
        BuildProfile::Debug,
        &supervisor,
    );

    let outcome = orchestrator.ensure(&mut Linkage::default()).unwrap();
    let linkage = outcome.linkage;
    let sdl = PathBuf::from("C:/local/SDL2");

    assert!(linkage.definitions.is_empty());
    assert_eq!(linkage.include_dirs.last(), Some(&sdl.join("include")));
    assert_eq!(linkage.libraries.last(), Some(&sdl.join("lib/x64/SDL2.lib")));
    assert_eq!(linkage.runtime_dependencies, vec![sdl.join("lib/x64/SDL2.dll")]);
}

#[test]
fn test_linux_registers_no_prebuilt_boost() {
    let project = TestProject::new();
    let manifest = DependencyManifest::from_toml(SMALL_MANIFEST).unwrap();
    let supervisor = ScriptedSupervisor::default();
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    let outcome = orchestrator.ensure(&mut Linkage::default()).unwrap();

    assert_eq!(
        outcome.linkage.include_dirs,
        vec![project.path().join("solver/include")]
    );
    assert_eq!(
        outcome.linkage.libraries,
        vec![
            project.path().join("solver/build/Release/out/libcore.a"),
            project.path().join("solver/build/Release/out/libextra.a"),
        ]
    );
}

#[test]
fn test_cargo_directives_host() {
    let project = TestProject::new();
    let manifest = DependencyManifest::from_toml(SMALL_MANIFEST).unwrap();
    let supervisor = ScriptedSupervisor::default();
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &manifest,
        &project.path(),
        linux(),
        BuildProfile::Release,
        &supervisor,
    );

    let mut directives = CargoDirectives::new(Vec::new());
    orchestrator.ensure(&mut directives).unwrap();
    let out = String::from_utf8(directives.finish().unwrap()).unwrap();

    assert!(out.contains("cargo:rustc-link-lib=static=core\n"));
    assert!(out.contains("cargo:rustc-link-lib=static=extra\n"));
    assert_eq!(out.matches("cargo:rustc-link-search=native=").count(), 1);
    assert!(out.contains("cargo:define=ATG_ENGINE_SIM_PIRANHA_ENABLED=1\n"));
}
