//! Dependency manifest (`nativedep.toml`) parsing and validation
//!
//! The manifest describes one native dependency: where its sources live,
//! which artifacts prove it is built, which toggles and SDKs its configure
//! step needs, and what the host should link once it is ready. Every
//! section is optional; missing values fall back to [`crate::config::defaults`].
//!
//! ```toml
//! [dependency]
//! name = "engine-sim"
//! source_dir = "engine-sim"
//! build_dir = "engine-sim/build"
//!
//! [[feature]]
//! name = "PIRANHA_ENABLED"
//! enabled = true
//!
//! [[artifact]]
//! name = "engine-sim"
//! path = "{profile}/{profile}/engine-sim.lib"
//!
//! [boost]
//! root = "D:/sdk/boost_1_70_0"
//! version = "1_70_0"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::defaults;
use crate::core::artifacts::PROFILE_PLACEHOLDER;
use crate::error::ManifestError;

/// Parsed dependency manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyManifest {
    /// Source, build and install locations
    pub dependency: DependencySection,
    /// Generator program and extra definitions
    pub cmake: CMakeSection,
    /// Code-generation tool executables
    pub tools: ToolsSection,
    /// Artifacts whose presence proves the dependency is built
    #[serde(rename = "artifact")]
    pub artifacts: Vec<ArtifactSpec>,
    /// Feature toggles passed to the configure step, in order
    #[serde(rename = "feature")]
    pub features: Vec<FeatureToggle>,
    /// Filesystem utility library (Boost) SDK
    pub boost: BoostSection,
    /// Multimedia library (SDL2) SDK, used by the app variant only
    pub sdl: SdlSection,
    /// What the host receives once the dependency is ready
    pub link: LinkSection,
    /// Build step behaviour
    pub build: BuildSection,
}

/// `[dependency]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySection {
    /// Dependency name, used in log messages
    pub name: String,
    /// CMake source directory, relative to the module root
    pub source_dir: PathBuf,
    /// CMake build root, relative to the module root
    pub build_dir: PathBuf,
    /// Install prefix template, relative to the module root
    pub install_prefix: String,
}

impl Default for DependencySection {
    fn default() -> Self {
        Self {
            name: defaults::DEPENDENCY_NAME.to_string(),
            source_dir: PathBuf::from(defaults::SOURCE_DIR),
            build_dir: PathBuf::from(defaults::BUILD_DIR),
            install_prefix: defaults::INSTALL_PREFIX.to_string(),
        }
    }
}

/// `[cmake]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CMakeSection {
    /// Program used for both the configure and the build step
    pub program: String,
    /// Target architecture for `-A` / `-T host=`
    pub architecture: String,
    /// Additional `-D` definitions for the configure step
    pub defines: BTreeMap<String, String>,
}

impl Default for CMakeSection {
    fn default() -> Self {
        Self {
            program: defaults::CMAKE_PROGRAM.to_string(),
            architecture: defaults::ARCHITECTURE.to_string(),
            defines: BTreeMap::new(),
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Lexer generator, relative to the module root unless absolute
    pub flex: PathBuf,
    /// Parser generator, relative to the module root unless absolute
    pub bison: PathBuf,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            flex: PathBuf::from(defaults::FLEX_EXECUTABLE),
            bison: PathBuf::from(defaults::BISON_EXECUTABLE),
        }
    }
}

/// One required artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Logical name
    pub name: String,
    /// Path template relative to the build root; `{profile}` is substituted
    pub path: String,
}

impl ArtifactSpec {
    /// Create an artifact descriptor
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One `-D<NAME>=ON|OFF` toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggle {
    /// CMake option name
    pub name: String,
    /// Whether the option is turned on
    pub enabled: bool,
}

impl FeatureToggle {
    /// Create a toggle
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// `[boost]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostSection {
    /// SDK install root (also the include directory)
    pub root: PathBuf,
    /// Dotted or underscored version, e.g. `1_70_0`
    pub version: String,
    /// Components linked into the host, e.g. `filesystem`
    pub components: Vec<String>,
    /// Toolset tag (`vc142`); derived from the compiler when unset
    pub toolset: Option<String>,
    /// Library directory relative to the root; derived from the toolset when unset
    pub lib_dir: Option<String>,
    /// Threading tag (`mt`)
    pub threading: String,
}

impl Default for BoostSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from(defaults::BOOST_ROOT),
            version: defaults::BOOST_VERSION.to_string(),
            components: defaults::BOOST_COMPONENTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            toolset: None,
            lib_dir: None,
            threading: defaults::BOOST_THREADING.to_string(),
        }
    }
}

/// `[sdl]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdlSection {
    /// SDK install root
    pub root: PathBuf,
    /// Include directory relative to the root
    pub include_dir: PathBuf,
    /// Import/static library relative to the root
    pub library: PathBuf,
    /// Runtime library (DLL) relative to the root
    pub runtime: Option<PathBuf>,
}

impl Default for SdlSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from(defaults::SDL_ROOT),
            include_dir: PathBuf::from(defaults::SDL_INCLUDE_DIR),
            library: PathBuf::from(defaults::SDL_LIBRARY),
            runtime: Some(PathBuf::from(defaults::SDL_RUNTIME)),
        }
    }
}

/// `[link]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSection {
    /// Header directories relative to the module root
    pub include_dirs: Vec<PathBuf>,
    /// Definitions always exported to the host
    pub definitions: Vec<String>,
    /// Definitions exported only while the named feature is enabled
    pub feature_definitions: BTreeMap<String, String>,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            include_dirs: defaults::INCLUDE_DIRS.iter().map(PathBuf::from).collect(),
            definitions: Vec::new(),
            feature_definitions: BTreeMap::from([(
                defaults::PIRANHA_FEATURE.to_string(),
                defaults::PIRANHA_DEFINITION.to_string(),
            )]),
        }
    }
}

/// `[build]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Parallel jobs for the build step (`--parallel`)
    pub jobs: Option<usize>,
    /// Re-check artifacts after a successful install
    pub verify_artifacts: bool,
}

impl Default for DependencyManifest {
    fn default() -> Self {
        Self {
            dependency: DependencySection::default(),
            cmake: CMakeSection::default(),
            tools: ToolsSection::default(),
            artifacts: defaults::ARTIFACTS
                .iter()
                .map(|(name, path)| ArtifactSpec::new(*name, *path))
                .collect(),
            features: defaults::FEATURES
                .iter()
                .map(|(name, enabled)| FeatureToggle::new(*name, *enabled))
                .collect(),
            boost: BoostSection::default(),
            sdl: SdlSection::default(),
            link: LinkSection::default(),
            build: BuildSection::default(),
        }
    }
}

fn option_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid option name regex"))
}

impl DependencyManifest {
    /// Parse a manifest from TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(content).map_err(|e| ManifestError::Parse {
            path: PathBuf::from(defaults::MANIFEST_FILE),
            error: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from a file
    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let manifest: Self = toml::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest, or fall back to the engine-sim defaults if the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            tracing::debug!(
                "No manifest at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Check structural invariants the orchestrator relies on
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.dependency.source_dir.as_os_str().is_empty() {
            return Err(invalid("dependency.source_dir must not be empty"));
        }
        if self.dependency.build_dir.as_os_str().is_empty() {
            return Err(invalid("dependency.build_dir must not be empty"));
        }
        if self.cmake.program.trim().is_empty() {
            return Err(invalid("cmake.program must not be empty"));
        }
        if self.artifacts.is_empty() {
            return Err(invalid("at least one [[artifact]] is required"));
        }

        let mut seen = HashSet::new();
        for artifact in &self.artifacts {
            if artifact.path.trim().is_empty() {
                return Err(invalid(&format!(
                    "artifact '{}' has an empty path",
                    artifact.name
                )));
            }
            if !artifact.path.contains(PROFILE_PLACEHOLDER) {
                return Err(invalid(&format!(
                    "artifact '{}' path must contain {PROFILE_PLACEHOLDER}",
                    artifact.name
                )));
            }
            if !seen.insert(artifact.name.as_str()) {
                return Err(invalid(&format!(
                    "artifact '{}' is declared twice",
                    artifact.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !option_name_regex().is_match(&feature.name) {
                return Err(invalid(&format!(
                    "feature '{}' is not a valid CMake option name",
                    feature.name
                )));
            }
            if !seen.insert(feature.name.as_str()) {
                return Err(invalid(&format!(
                    "feature '{}' is declared twice",
                    feature.name
                )));
            }
        }

        for key in self.cmake.defines.keys() {
            if !option_name_regex().is_match(key) {
                return Err(invalid(&format!(
                    "cmake define '{key}' is not a valid CMake variable name"
                )));
            }
        }

        if self.build.jobs == Some(0) {
            return Err(invalid("build.jobs must be greater than 0"));
        }

        Ok(())
    }

    /// Whether a feature toggle is present and enabled
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|feature| feature.name == name && feature.enabled)
    }

    /// Whether the dependency is built in its "app" variant (pulls in SDL2)
    pub fn app_variant(&self) -> bool {
        self.feature_enabled(defaults::APP_FEATURE)
    }

    /// Definitions exported to the host, in a stable order
    pub fn exported_definitions(&self) -> Vec<String> {
        let mut definitions = self.link.definitions.clone();
        for (feature, definition) in &self.link.feature_definitions {
            if self.feature_enabled(feature) && !definitions.contains(definition) {
                definitions.push(definition.clone());
            }
        }
        definitions
    }
}

fn invalid(message: &str) -> ManifestError {
    ManifestError::Invalid {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_manifest_describes_engine_sim() {
        let manifest = DependencyManifest::default();
        assert_eq!(manifest.dependency.name, "engine-sim");
        assert_eq!(manifest.artifacts.len(), 4);
        assert!(manifest.feature_enabled("PIRANHA_ENABLED"));
        assert!(!manifest.feature_enabled("DISCORD_ENABLED"));
        assert!(!manifest.app_variant());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let manifest = DependencyManifest::from_toml("").unwrap();
        assert_eq!(manifest, DependencyManifest::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let manifest = DependencyManifest::from_toml(
            r#"
[boost]
root = "D:/sdk/boost"
"#,
        )
        .unwrap();

        assert_eq!(manifest.boost.root, PathBuf::from("D:/sdk/boost"));
        assert_eq!(manifest.boost.version, "1_70_0");
        assert_eq!(manifest.boost.components, vec!["filesystem".to_string()]);
    }

    #[test]
    fn test_artifacts_replace_defaults() {
        let manifest = DependencyManifest::from_toml(
            r#"
[[artifact]]
name = "core"
path = "{profile}/libcore.a"
"#,
        )
        .unwrap();

        assert_eq!(
            manifest.artifacts,
            vec![ArtifactSpec::new("core", "{profile}/libcore.a")]
        );
    }

    #[test]
    fn test_duplicate_artifact_rejected() {
        let result = DependencyManifest::from_toml(
            r#"
[[artifact]]
name = "core"
path = "{profile}/a.lib"

[[artifact]]
name = "core"
path = "{profile}/b.lib"
"#,
        );
        match result {
            Err(ManifestError::Invalid { message }) => assert!(message.contains("declared twice")),
            other => panic!("expected invalid manifest, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_without_profile_placeholder_rejected() {
        let result = DependencyManifest::from_toml(
            r#"
[[artifact]]
name = "core"
path = "out/libcore.a"
"#,
        );
        match result {
            Err(ManifestError::Invalid { message }) => {
                assert!(message.contains("'core'"));
                assert!(message.contains("{profile}"));
            }
            other => panic!("expected invalid manifest, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_feature_name_rejected() {
        let result = DependencyManifest::from_toml(
            r#"
[[feature]]
name = "NOT VALID"
enabled = true
"#,
        );
        assert!(matches!(result, Err(ManifestError::Invalid { .. })));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let result = DependencyManifest::from_toml("[build]\njobs = 0\n");
        assert!(matches!(result, Err(ManifestError::Invalid { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = DependencyManifest::from_toml("[[[ nope");
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_exported_definitions_follow_features() {
        let mut manifest = DependencyManifest::default();
        assert_eq!(
            manifest.exported_definitions(),
            vec!["ATG_ENGINE_SIM_PIRANHA_ENABLED=1".to_string()]
        );

        manifest.features = vec![FeatureToggle::new("PIRANHA_ENABLED", false)];
        assert!(manifest.exported_definitions().is_empty());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manifest =
            DependencyManifest::load_or_default(&temp_dir.path().join("nativedep.toml")).unwrap();
        assert_eq!(manifest, DependencyManifest::default());
    }

    #[test]
    fn test_load_from_path_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = DependencyManifest::load_from_path(&temp_dir.path().join("nativedep.toml"));
        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn test_load_from_path_reports_path_on_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nativedep.toml");
        fs::write(&path, "[dependency\n").unwrap();

        match DependencyManifest::load_from_path(&path) {
            Err(ManifestError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
