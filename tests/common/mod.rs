//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use nativedep::core::linkage::HostBuild;

/// Test module context
///
/// Creates a temporary module root with an isolated machine config
/// directory, and provides utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary module root
    pub dir: TempDir,
    /// Machine config directory, kept out of the user's real one
    pub config_dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create config directory"),
        }
    }

    /// Get the path to the module root
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write `nativedep.toml`
    pub fn write_manifest(&self, content: &str) {
        self.create_file("nativedep.toml", content);
    }

    /// Create empty files at every path
    pub fn touch_all<'a>(&self, paths: impl IntoIterator<Item = &'a Path>) {
        for path in paths {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directories");
            }
            std::fs::write(path, b"").expect("Failed to write artifact");
        }
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Write an executable shell script standing in for cmake
    #[cfg(unix)]
    pub fn fake_cmake(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        let mut perms = std::fs::metadata(&path).expect("stat").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
        path
    }

    /// Build a `nativedep` invocation rooted at this project
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nativedep"));
        cmd.current_dir(self.path())
            .env("NATIVEDEP_CONFIG_DIR", self.config_dir.path())
            .env_remove("NATIVEDEP_MODULE_ROOT")
            .env_remove("NATIVEDEP_BOOST_ROOT")
            .env_remove("NATIVEDEP_SDL_ROOT")
            .env_remove("NATIVEDEP_CMAKE")
            .env_remove("RUST_LOG")
            .args(args);
        cmd
    }

    /// Run `nativedep` with `args`
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute nativedep")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Host that records registration calls as `kind:value` strings, in call order
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<String>,
}

impl HostBuild for RecordingHost {
    fn add_definition(&mut self, definition: &str) {
        self.calls.push(format!("define:{definition}"));
    }

    fn add_include_dir(&mut self, path: &Path) {
        self.calls.push(format!("include:{}", path.display()));
    }

    fn add_library(&mut self, path: &Path) {
        self.calls.push(format!("library:{}", path.display()));
    }

    fn add_runtime_dependency(&mut self, path: &Path) {
        self.calls.push(format!("runtime:{}", path.display()));
    }
}

/// Manifest with two small artifacts, for tests that build them
pub const SMALL_MANIFEST: &str = r#"
[dependency]
name = "solver"
source_dir = "solver"
build_dir = "solver/build"
install_prefix = "install/{platform}"

[[artifact]]
name = "core"
path = "{profile}/out/libcore.a"

[[artifact]]
name = "extra"
path = "{profile}/out/libextra.a"

[link]
include_dirs = ["solver/include"]
"#;

/// Fake cmake: configure succeeds, `--build <dir>` produces both artifacts
pub const BUILDING_CMAKE: &str = r#"echo "fake cmake $*"
if [ "$1" = "--build" ]; then
  mkdir -p "$2/out"
  touch "$2/out/libcore.a" "$2/out/libextra.a"
  echo "installed" 1>&2
fi
exit 0"#;
