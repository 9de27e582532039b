//! Default configuration values
//!
//! Every value here can be overridden from `nativedep.toml`, the machine
//! `config.toml`, or the `NATIVEDEP_*` environment variables.

/// Manifest file name looked up in the module root
pub const MANIFEST_FILE: &str = "nativedep.toml";

/// Name of the native dependency
pub const DEPENDENCY_NAME: &str = "engine-sim";

/// CMake source directory, relative to the module root
pub const SOURCE_DIR: &str = "engine-sim";

/// CMake build root, relative to the module root (one subdirectory per profile)
pub const BUILD_DIR: &str = "engine-sim/build";

/// Install prefix, relative to the module root. `{platform}` is substituted.
pub const INSTALL_PREFIX: &str = "../../../Intermediate/Build/{platform}/engine-sim";

/// External build-system generator program
pub const CMAKE_PROGRAM: &str = "cmake";

/// Target architecture passed to `-A` and `-T host=`
pub const ARCHITECTURE: &str = "x64";

/// Lexer generator executable, relative to the module root
pub const FLEX_EXECUTABLE: &str = "engine-sim/_deps/win_flex_bison3-latest/win_flex.exe";

/// Parser generator executable, relative to the module root
pub const BISON_EXECUTABLE: &str = "engine-sim/_deps/win_flex_bison3-latest/win_bison.exe";

/// Boost SDK install root
pub const BOOST_ROOT: &str = "C:/local/boost_1_70_0";

/// Boost version string as it appears in library file names
pub const BOOST_VERSION: &str = "1_70_0";

/// Boost components linked into the host build
pub const BOOST_COMPONENTS: &[&str] = &["filesystem"];

/// Boost threading tag (multi-threaded runtime)
pub const BOOST_THREADING: &str = "mt";

/// SDL2 SDK install root (only used by the app variant)
pub const SDL_ROOT: &str = "C:/local/SDL2";

/// SDL2 include directory, relative to the SDL root
pub const SDL_INCLUDE_DIR: &str = "include";

/// SDL2 import library, relative to the SDL root
pub const SDL_LIBRARY: &str = "lib/x64/SDL2.lib";

/// SDL2 runtime library, relative to the SDL root
pub const SDL_RUNTIME: &str = "lib/x64/SDL2.dll";

/// Feature toggle that switches the dependency to its "app" variant
pub const APP_FEATURE: &str = "BUILD_APP";

/// Feature toggle for the embedded piranha scripting interpreter
pub const PIRANHA_FEATURE: &str = "PIRANHA_ENABLED";

/// Feature toggles passed to the configure step, in order
pub const FEATURES: &[(&str, bool)] = &[
    ("DISCORD_ENABLED", false),
    (PIRANHA_FEATURE, true),
    (APP_FEATURE, false),
];

/// Preprocessor definition exported to the host when piranha is enabled
pub const PIRANHA_DEFINITION: &str = "ATG_ENGINE_SIM_PIRANHA_ENABLED=1";

/// Header directories exported to the host, relative to the module root
pub const INCLUDE_DIRS: &[&str] = &[
    "engine-sim/include",
    "engine-sim/scripting/include",
    "engine-sim/dependencies/submodules",
];

/// Required artifacts as (name, template) pairs, relative to the build root
pub const ARTIFACTS: &[(&str, &str)] = &[
    ("engine-sim", "{profile}/{profile}/engine-sim.lib"),
    (
        "engine-sim-script-interpreter",
        "{profile}/{profile}/engine-sim-script-interpreter.lib",
    ),
    (
        "simple-2d-constraint-solver",
        "{profile}/dependencies/submodules/simple-2d-constraint-solver/{profile}/simple-2d-constraint-solver.lib",
    ),
    (
        "piranha",
        "{profile}/dependencies/submodules/piranha/{profile}/piranha.lib",
    ),
];
