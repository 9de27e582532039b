//! CMake command assembly
//!
//! Builds the configure and build+install invocations from the manifest,
//! the resolved layout and the resolved toolchain parameters. Assembly is
//! pure; the commands are handed to a process supervisor for execution.

use std::path::Path;

use crate::core::command::CommandLine;
use crate::core::layout::DependencyLayout;
use crate::core::manifest::DependencyManifest;
use crate::core::profile::BuildProfile;
use crate::core::toolchain::ToolchainParameters;

/// Assembles CMake command lines for one dependency and toolchain
#[derive(Debug)]
pub struct CommandAssembler<'a> {
    manifest: &'a DependencyManifest,
    layout: &'a DependencyLayout,
    params: &'a ToolchainParameters,
}

impl<'a> CommandAssembler<'a> {
    /// Create an assembler
    pub fn new(
        manifest: &'a DependencyManifest,
        layout: &'a DependencyLayout,
        params: &'a ToolchainParameters,
    ) -> Self {
        Self {
            manifest,
            layout,
            params,
        }
    }

    /// `cmake -G … -S … -B … -D…` for `profile`.
    ///
    /// An empty generator is left out entirely so CMake picks one itself.
    pub fn configure_command(&self, profile: BuildProfile) -> CommandLine {
        let params = self.params;
        let mut command = CommandLine::builder(&self.manifest.cmake.program);

        if !params.generator.is_empty() {
            command = command.value("-G", &params.generator);
        }

        command = command
            .value("-S", display(&self.layout.source_dir))
            .value("-B", display(&self.layout.output_dir(profile)));

        if params.platform_selection {
            command = command
                .value("-A", &params.architecture)
                .value("-T", format!("host={}", params.architecture));
        }

        command = command
            .flag("-Wno-dev")
            .define("FLEX_EXECUTABLE", display(&params.code_generators.flex))
            .define("BISON_EXECUTABLE", display(&params.code_generators.bison))
            .define("Boost_INCLUDE_DIR", display(&params.filesystem.include_dir));

        if let Some(library_dir) = &params.filesystem.library_dir {
            if let Some(toolset) = &params.filesystem.toolset {
                command = command.define("BOOST_LIB_TOOLSET", toolset);
            }
            command = command
                .define("BOOST_ALL_NO_LIB", "1")
                .define("BOOST_LIBRARYDIR", display(library_dir));
        }

        if let Some(sdl) = &params.multimedia {
            command = command.define("SDL2_INCLUDE_DIR", display(&sdl.include_dir));
            if let Some(library) = sdl.libraries.first() {
                command = command.define("SDL2_LIBRARY", display(library));
            }
            command = command.define("SDL2_DIR", display(&self.manifest.sdl.root));
        }

        for feature in &self.manifest.features {
            command = command.define(&feature.name, if feature.enabled { "ON" } else { "OFF" });
        }

        for (key, value) in &self.manifest.cmake.defines {
            command = command.define(key, value);
        }

        command
            .define("CMAKE_BUILD_TYPE", profile.cmake_name())
            .define("CMAKE_INSTALL_PREFIX", display(&self.layout.install_prefix))
            .build()
    }

    /// `cmake --build <output> --target install --config <profile>`
    pub fn install_command(&self, profile: BuildProfile) -> CommandLine {
        let mut command = CommandLine::builder(&self.manifest.cmake.program)
            .value("--build", display(&self.layout.output_dir(profile)))
            .value("--target", "install")
            .value("--config", profile.cmake_name());

        if let Some(jobs) = self.manifest.build.jobs {
            command = command.value("--parallel", jobs.to_string());
        }

        command.build()
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
