//! Registration of built artifacts with the host build
//!
//! The host build is modelled by the [`HostBuild`] trait. Two hosts ship
//! with the crate: [`Linkage`], an in-memory record that the CLI prints as
//! text or JSON, and [`CargoDirectives`], which writes `cargo:` lines so a
//! Rust build script can link the dependency directly.

use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Receiver of include paths, libraries and definitions
pub trait HostBuild {
    /// Preprocessor definition, `NAME` or `NAME=VALUE`
    fn add_definition(&mut self, definition: &str);

    /// Public header directory
    fn add_include_dir(&mut self, path: &Path);

    /// Static or import library to link
    fn add_library(&mut self, path: &Path);

    /// Dynamic library that must ship next to the host binary
    fn add_runtime_dependency(&mut self, path: &Path);
}

/// In-memory record of what was registered, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Linkage {
    /// Preprocessor definitions
    pub definitions: Vec<String>,
    /// Header directories
    pub include_dirs: Vec<PathBuf>,
    /// Libraries to link
    pub libraries: Vec<PathBuf>,
    /// Runtime libraries
    pub runtime_dependencies: Vec<PathBuf>,
}

impl Linkage {
    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
            && self.include_dirs.is_empty()
            && self.libraries.is_empty()
            && self.runtime_dependencies.is_empty()
    }

    /// Replay this record onto another host
    pub fn apply_to<H: HostBuild + ?Sized>(&self, host: &mut H) {
        for definition in &self.definitions {
            host.add_definition(definition);
        }
        for dir in &self.include_dirs {
            host.add_include_dir(dir);
        }
        for library in &self.libraries {
            host.add_library(library);
        }
        for runtime in &self.runtime_dependencies {
            host.add_runtime_dependency(runtime);
        }
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

impl HostBuild for Linkage {
    fn add_definition(&mut self, definition: &str) {
        push_unique(&mut self.definitions, definition.to_string());
    }

    fn add_include_dir(&mut self, path: &Path) {
        push_unique(&mut self.include_dirs, path.to_path_buf());
    }

    fn add_library(&mut self, path: &Path) {
        push_unique(&mut self.libraries, path.to_path_buf());
    }

    fn add_runtime_dependency(&mut self, path: &Path) {
        push_unique(&mut self.runtime_dependencies, path.to_path_buf());
    }
}

/// Writes cargo build-script directives.
///
/// Libraries become `rustc-link-search` + `rustc-link-lib=static`; include
/// directories, definitions and runtime libraries are exported as `links`
/// metadata (`DEP_<LINKS>_INCLUDE`, `..._DEFINE`, `..._RUNTIME`).
#[derive(Debug)]
pub struct CargoDirectives<W: Write> {
    out: W,
    search_dirs: HashSet<PathBuf>,
    error: Option<io::Error>,
}

impl<W: Write> CargoDirectives<W> {
    /// Write directives to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            search_dirs: HashSet::new(),
            error: None,
        }
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.out, "cargo:{line}") {
            self.error = Some(error);
        }
    }
}

/// Library name as rustc expects it: file stem without a Unix `lib` prefix
pub fn link_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let is_unix_archive = path
        .extension()
        .is_some_and(|ext| ext == "a" || ext == "so" || ext == "dylib");
    let name = if is_unix_archive {
        stem.strip_prefix("lib").unwrap_or(stem)
    } else {
        stem
    };
    Some(name.to_string())
}

impl<W: Write> HostBuild for CargoDirectives<W> {
    fn add_definition(&mut self, definition: &str) {
        self.emit(&format!("define={definition}"));
    }

    fn add_include_dir(&mut self, path: &Path) {
        self.emit(&format!("include={}", path.display()));
    }

    fn add_library(&mut self, path: &Path) {
        if let Some(dir) = path.parent() {
            if self.search_dirs.insert(dir.to_path_buf()) {
                self.emit(&format!("rustc-link-search=native={}", dir.display()));
            }
        }
        match link_name(path) {
            Some(name) => self.emit(&format!("rustc-link-lib=static={name}")),
            None => tracing::warn!("Cannot derive a link name from {}", path.display()),
        }
        self.emit(&format!("rerun-if-changed={}", path.display()));
    }

    fn add_runtime_dependency(&mut self, path: &Path) {
        self.emit(&format!("runtime={}", path.display()));
    }
}
