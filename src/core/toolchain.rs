//! Toolchain parameter resolution
//!
//! Turns the host's toolchain identity and the dependency manifest into the
//! concrete values the configure step needs: the CMake generator, the
//! flex/bison executables, and the include/library locations of the
//! versioned auxiliary SDKs (Boost, and SDL2 for the app variant).
//!
//! Everything here is pure string and path manipulation; nothing touches
//! the filesystem.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::manifest::{BoostSection, DependencyManifest, SdlSection};

/// Unknown target platform name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown target platform '{0}'. Expected one of: Win64, Linux, Mac")]
pub struct ParsePlatformError(pub String);

/// Platform the host build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetPlatform {
    /// 64-bit Windows
    Win64,
    /// Linux
    Linux,
    /// macOS
    Mac,
}

impl TargetPlatform {
    /// Name used in install-prefix paths
    pub fn name(self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "Win64",
            TargetPlatform::Linux => "Linux",
            TargetPlatform::Mac => "Mac",
        }
    }

    /// Whether this is a Windows target
    pub fn is_windows(self) -> bool {
        matches!(self, TargetPlatform::Win64)
    }

    /// File extension of static/import libraries
    pub fn static_library_extension(self) -> &'static str {
        if self.is_windows() {
            "lib"
        } else {
            "a"
        }
    }

    /// The platform this process runs on
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => TargetPlatform::Win64,
            "macos" => TargetPlatform::Mac,
            _ => TargetPlatform::Linux,
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetPlatform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win64" | "windows" | "x86_64-pc-windows-msvc" => Ok(TargetPlatform::Win64),
            "linux" => Ok(TargetPlatform::Linux),
            "mac" | "macos" | "darwin" => Ok(TargetPlatform::Mac),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Compiler or IDE family driving generator selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CompilerFamily {
    /// Whatever the host defaults to; the generator is auto-detected
    #[default]
    Default,
    /// clang-cl
    Clang,
    /// Intel C++
    Intel,
    /// Visual Studio 2019 (MSVC 14.2)
    VisualStudio2019,
    /// Visual Studio 2022 (MSVC 14.3)
    VisualStudio2022,
}

impl CompilerFamily {
    /// Parse a family name, mapping anything unrecognised to [`CompilerFamily::Default`]
    pub fn parse_lenient(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "clang" | "clangcl" => CompilerFamily::Clang,
            "intel" | "icx" | "icl" => CompilerFamily::Intel,
            "vs2019" | "visualstudio2019" | "msvc2019" | "vc142" => {
                CompilerFamily::VisualStudio2019
            }
            "vs2022" | "visualstudio2022" | "msvc2022" | "vc143" => {
                CompilerFamily::VisualStudio2022
            }
            "" | "default" => CompilerFamily::Default,
            _ => {
                tracing::warn!(
                    "Unrecognised compiler family '{s}', letting CMake pick a generator"
                );
                CompilerFamily::Default
            }
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompilerFamily::Default => "default",
            CompilerFamily::Clang => "clang",
            CompilerFamily::Intel => "intel",
            CompilerFamily::VisualStudio2019 => "vs2019",
            CompilerFamily::VisualStudio2022 => "vs2022",
        };
        f.write_str(name)
    }
}

/// Platform and compiler identity supplied by the host build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainIdentity {
    /// Target platform
    pub platform: TargetPlatform,
    /// Compiler/IDE family
    pub compiler: CompilerFamily,
    /// Compiler version, informational
    pub compiler_version: Option<String>,
}

impl ToolchainIdentity {
    /// Create an identity without a version
    pub fn new(platform: TargetPlatform, compiler: CompilerFamily) -> Self {
        Self {
            platform,
            compiler,
            compiler_version: None,
        }
    }

    /// Attach a compiler version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }

    /// Identity of the running host with the default compiler
    pub fn host() -> Self {
        Self::new(TargetPlatform::host(), CompilerFamily::Default)
    }
}

/// CMake generator for a toolchain identity.
///
/// Returns an empty string when the family has no fixed generator; the
/// caller must then leave the choice to CMake.
pub fn generator_name(identity: &ToolchainIdentity) -> &'static str {
    match identity.compiler {
        CompilerFamily::Default => "",
        CompilerFamily::Clang | CompilerFamily::Intel => "NMake Makefiles",
        CompilerFamily::VisualStudio2019 => "Visual Studio 16 2019",
        CompilerFamily::VisualStudio2022 => "Visual Studio 17 2022",
    }
}

/// Whether `-A` / `-T` may be passed for this identity.
///
/// Only Visual Studio generators accept a platform and toolset. An empty
/// generator on Windows resolves to one, so it accepts them too.
pub fn supports_platform_selection(identity: &ToolchainIdentity) -> bool {
    let generator = generator_name(identity);
    generator.starts_with("Visual Studio") || (generator.is_empty() && identity.platform.is_windows())
}

/// Boost toolset tag for a compiler
pub fn toolset_tag(compiler: CompilerFamily) -> &'static str {
    match compiler {
        CompilerFamily::VisualStudio2022 => "vc143",
        _ => "vc142",
    }
}

/// Prebuilt Boost library directory for a toolset and architecture, e.g. `lib64-msvc-14.2`
pub fn msvc_library_dir(toolset: &str, architecture: &str) -> String {
    let bits = if architecture.contains("64") { "64" } else { "32" };
    let minor = toolset.strip_prefix("vc14").unwrap_or("2");
    format!("lib{bits}-msvc-14.{minor}")
}

fn trailing_zero_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[._]0$").expect("valid version regex"))
}

/// Drop one trailing `_0` / `.0` group from a version: `1_70_0` → `1_70`
pub fn short_version(version: &str) -> &str {
    match trailing_zero_regex().find(version) {
        Some(m) => &version[..m.start()],
        None => version,
    }
}

/// Naming metadata of a prebuilt, versioned auxiliary library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxiliaryLibrarySpec {
    /// Logical name, e.g. `boost_filesystem`
    pub name: String,
    /// Version string, e.g. `1_70_0`
    pub version: String,
    /// Toolset tag, e.g. `vc142`
    pub toolset: String,
    /// Architecture tag, e.g. `x64`
    pub architecture: String,
    /// Threading tag, e.g. `mt`
    pub threading: String,
}

/// File stem following `lib<name>-<toolset>-<threading>-<arch>-<shortVersion>`.
///
/// An empty threading tag drops its segment (`libboost_system-vc143-x64-1_70`).
pub fn auxiliary_library_filename(spec: &AuxiliaryLibrarySpec) -> String {
    let mut segments = vec![format!("lib{}", spec.name), spec.toolset.clone()];
    if !spec.threading.is_empty() {
        segments.push(spec.threading.clone());
    }
    segments.push(spec.architecture.clone());
    segments.push(short_version(&spec.version).to_string());
    segments.join("-")
}

/// Resolved lexer/parser generator executables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeGenerators {
    /// flex
    pub flex: PathBuf,
    /// bison
    pub bison: PathBuf,
}

/// Include and link locations of one auxiliary SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAuxiliary {
    /// Header directory
    pub include_dir: PathBuf,
    /// Library directory, when the configure step needs it
    pub library_dir: Option<PathBuf>,
    /// Toolset tag, when the library naming depends on one
    pub toolset: Option<String>,
    /// Libraries to link
    pub libraries: Vec<PathBuf>,
    /// Runtime libraries that must ship next to the host binary
    pub runtime: Vec<PathBuf>,
}

/// Everything the command assembler and registration need from the toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainParameters {
    /// CMake generator, empty for auto-detect
    pub generator: String,
    /// Whether `-A` / `-T` are emitted
    pub platform_selection: bool,
    /// Target architecture tag
    pub architecture: String,
    /// flex/bison
    pub code_generators: CodeGenerators,
    /// Boost
    pub filesystem: ResolvedAuxiliary,
    /// SDL2, for the app variant only
    pub multimedia: Option<ResolvedAuxiliary>,
}

/// Resolves toolchain parameters for one identity
#[derive(Debug)]
pub struct ToolchainParameterResolver<'a> {
    manifest: &'a DependencyManifest,
    module_root: &'a Path,
}

impl<'a> ToolchainParameterResolver<'a> {
    /// Create a resolver over a manifest rooted at `module_root`
    pub fn new(manifest: &'a DependencyManifest, module_root: &'a Path) -> Self {
        Self {
            manifest,
            module_root,
        }
    }

    /// Resolve all parameters for `identity`
    pub fn resolve(&self, identity: &ToolchainIdentity) -> ToolchainParameters {
        let parameters = ToolchainParameters {
            generator: generator_name(identity).to_string(),
            platform_selection: supports_platform_selection(identity),
            architecture: self.manifest.cmake.architecture.clone(),
            code_generators: self.code_generators(),
            filesystem: self.filesystem_library(identity),
            multimedia: self
                .manifest
                .app_variant()
                .then(|| multimedia_library(&self.manifest.sdl)),
        };

        tracing::debug!(
            "Resolved toolchain for {} / {}: generator '{}'",
            identity.platform,
            identity.compiler,
            parameters.generator
        );
        parameters
    }

    /// flex and bison paths, anchored at the module root unless absolute
    pub fn code_generators(&self) -> CodeGenerators {
        CodeGenerators {
            flex: self.module_root.join(&self.manifest.tools.flex),
            bison: self.module_root.join(&self.manifest.tools.bison),
        }
    }

    /// Boost include directory, and on Windows its library directory and link libraries
    pub fn filesystem_library(&self, identity: &ToolchainIdentity) -> ResolvedAuxiliary {
        let boost = &self.manifest.boost;
        let mut resolved = ResolvedAuxiliary {
            include_dir: boost.root.clone(),
            library_dir: None,
            toolset: None,
            libraries: Vec::new(),
            runtime: Vec::new(),
        };

        // Prebuilt Boost binaries are only wired on Windows; elsewhere the
        // configure step finds the system installation itself.
        if !identity.platform.is_windows() {
            return resolved;
        }

        let toolset = boost
            .toolset
            .clone()
            .unwrap_or_else(|| toolset_tag(identity.compiler).to_string());
        let library_dir = boost.root.join(
            boost
                .lib_dir
                .clone()
                .unwrap_or_else(|| msvc_library_dir(&toolset, &self.manifest.cmake.architecture)),
        );

        resolved.libraries = boost_library_specs(boost, &toolset, &self.manifest.cmake.architecture)
            .iter()
            .map(|spec| {
                library_dir.join(format!(
                    "{}.{}",
                    auxiliary_library_filename(spec),
                    identity.platform.static_library_extension()
                ))
            })
            .collect();
        resolved.library_dir = Some(library_dir);
        resolved.toolset = Some(toolset);
        resolved
    }
}

/// One spec per configured Boost component
pub fn boost_library_specs(
    boost: &BoostSection,
    toolset: &str,
    architecture: &str,
) -> Vec<AuxiliaryLibrarySpec> {
    boost
        .components
        .iter()
        .map(|component| AuxiliaryLibrarySpec {
            name: format!("boost_{component}"),
            version: boost.version.clone(),
            toolset: toolset.to_string(),
            architecture: architecture.to_string(),
            threading: boost.threading.clone(),
        })
        .collect()
}

/// SDL2 include/library/runtime triple
pub fn multimedia_library(sdl: &SdlSection) -> ResolvedAuxiliary {
    let library = sdl.root.join(&sdl.library);
    ResolvedAuxiliary {
        include_dir: sdl.root.join(&sdl.include_dir),
        library_dir: library.parent().map(Path::to_path_buf),
        toolset: None,
        libraries: vec![library],
        runtime: sdl.runtime.iter().map(|dll| sdl.root.join(dll)).collect(),
    }
}
