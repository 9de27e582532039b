//! Doctor command logic
//!
//! Checks that everything the configure and build steps need is installed
//! where the manifest says it is, and reports issues with suggestions.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::layout::DependencyLayout;
use crate::core::manifest::DependencyManifest;
use crate::core::toolchain::{ToolchainIdentity, ToolchainParameterResolver};

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Name of the thing being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version or location, if known
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether a failure blocks the build
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Configuration issues found
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a configuration issue
    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    /// Check if all required checks passed and the configuration is sound
    pub fn all_required_passed(&self) -> bool {
        self.config_issues.is_empty() && self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Count failed checks
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Locate `program` on PATH (or as a path) and ask it for its version
pub fn check_command_available(program: &str) -> Option<String> {
    let path = which::which(program).ok()?;
    let output = std::process::Command::new(&path)
        .arg("--version")
        .output()
        .ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    Some(extract_version(&format!("{stdout}{stderr}")).unwrap_or_else(|| path.display().to_string()))
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check the CMake program
pub fn check_cmake(program: &str) -> CheckResult {
    match check_command_available(program) {
        Some(version) => CheckResult::pass("CMake", Some(version), true),
        None => CheckResult::fail(
            "CMake",
            &format!("'{program}' not found"),
            Some("Install CMake from https://cmake.org/download/ or set NATIVEDEP_CMAKE"),
            true,
        ),
    }
}

/// Check a code generator executable; a missing bundled copy falls back to PATH
pub fn check_tool(name: &str, path: &Path) -> CheckResult {
    if path.is_file() {
        return CheckResult::pass(name, Some(path.display().to_string()), true);
    }

    let fallback = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.trim_start_matches("win_").to_string());
    if let Some(version) = fallback.as_deref().and_then(check_command_available) {
        return CheckResult::pass(name, Some(version), true);
    }

    CheckResult::fail(
        name,
        &format!("Not found at {}", path.display()),
        Some("Fetch the win_flex_bison bundle or set [tools] in nativedep.toml"),
        true,
    )
}

/// Check that the CMake source tree is checked out
pub fn check_source(layout: &DependencyLayout) -> CheckResult {
    let lists = layout.source_dir.join("CMakeLists.txt");
    if lists.is_file() {
        CheckResult::pass("Dependency sources", Some(layout.source_dir.display().to_string()), true)
    } else {
        CheckResult::fail(
            "Dependency sources",
            &format!("{} is missing", lists.display()),
            Some("Run `git submodule update --init --recursive`"),
            true,
        )
    }
}

/// Check an SDK root and the libraries expected below it
pub fn check_sdk(name: &str, root: &Path, libraries: &[PathBuf], suggestion: &str) -> CheckResult {
    if !root.is_dir() {
        return CheckResult::fail(name, &format!("{} does not exist", root.display()), Some(suggestion), true);
    }

    if let Some(missing) = libraries.iter().find(|library| !library.is_file()) {
        return CheckResult::fail(name, &format!("{} is missing", missing.display()), Some(suggestion), true);
    }

    CheckResult::pass(name, Some(root.display().to_string()), true)
}

/// Run all doctor checks for a manifest
pub fn run_doctor(
    manifest: &DependencyManifest,
    module_root: &Path,
    identity: &ToolchainIdentity,
) -> DoctorReport {
    let mut report = DoctorReport::new();
    let layout = DependencyLayout::resolve(manifest, module_root, identity.platform);
    let params = ToolchainParameterResolver::new(manifest, module_root).resolve(identity);

    report.add_check(check_cmake(&manifest.cmake.program));
    report.add_check(check_tool("flex", &params.code_generators.flex));
    report.add_check(check_tool("bison", &params.code_generators.bison));
    report.add_check(check_source(&layout));
    report.add_check(check_sdk(
        "Boost",
        &manifest.boost.root,
        &params.filesystem.libraries,
        "Install Boost or set NATIVEDEP_BOOST_ROOT",
    ));

    if let Some(sdl) = &params.multimedia {
        let mut expected = sdl.libraries.clone();
        expected.extend(sdl.runtime.iter().cloned());
        report.add_check(check_sdk(
            "SDL2",
            &manifest.sdl.root,
            &expected,
            "Install the SDL2 development libraries or set NATIVEDEP_SDL_ROOT",
        ));
    }

    if let Err(e) = manifest.validate() {
        report.add_config_issue(e.to_string());
    }

    report
}
