//! Build profiles
//!
//! A profile selects the CMake configuration, which in turn names the
//! output subdirectories the native build writes its artifacts to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown profile name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown build profile '{0}'. Expected one of: Debug, Release, RelWithDebInfo, MinSizeRel")]
pub struct ParseProfileError(pub String);

/// Named build configuration of the native dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildProfile {
    /// Unoptimized, full debug info
    Debug,
    /// Optimized, no debug info
    #[default]
    Release,
    /// Optimized with debug info
    ReleaseWithDebugInfo,
    /// Optimized for size
    MinSizeRelease,
}

impl BuildProfile {
    /// All profiles, in declaration order
    pub const ALL: [BuildProfile; 4] = [
        BuildProfile::Debug,
        BuildProfile::Release,
        BuildProfile::ReleaseWithDebugInfo,
        BuildProfile::MinSizeRelease,
    ];

    /// CMake configuration name (`CMAKE_BUILD_TYPE` / `--config` value)
    pub fn cmake_name(self) -> &'static str {
        match self {
            BuildProfile::Debug => "Debug",
            BuildProfile::Release => "Release",
            BuildProfile::ReleaseWithDebugInfo => "RelWithDebInfo",
            BuildProfile::MinSizeRelease => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmake_name())
    }
}

impl FromStr for BuildProfile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "debug" => Ok(BuildProfile::Debug),
            "release" => Ok(BuildProfile::Release),
            "relwithdebinfo" | "releasewithdebuginfo" => Ok(BuildProfile::ReleaseWithDebugInfo),
            "minsizerel" | "minsizerelease" => Ok(BuildProfile::MinSizeRelease),
            _ => Err(ParseProfileError(s.to_string())),
        }
    }
}
