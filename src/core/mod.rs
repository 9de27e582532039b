//! Core business logic module
//!
//! This module contains the orchestration logic for nativedep. Process
//! execution and platform directories belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`profile`] - Build profiles and their CMake names
//! - [`manifest`] - Manifest (nativedep.toml) parsing and validation
//! - [`machine_config`] - Per-machine overrides
//! - [`layout`] - Source, build and install directories
//! - [`artifacts`] - Required artifact location and presence
//! - [`toolchain`] - Generator, tool and SDK resolution per toolchain
//! - [`command`] - Structured command lines
//! - [`assembler`] - Configure and build+install command assembly
//! - [`linkage`] - Registration with the host build
//! - [`orchestrator`] - The build state machine
//! - [`doctor`] - Build environment diagnosis
//! - [`clean`] - Removal of build output

pub mod artifacts;
pub mod assembler;
pub mod clean;
pub mod command;
pub mod doctor;
pub mod layout;
pub mod linkage;
pub mod machine_config;
pub mod manifest;
pub mod orchestrator;
pub mod profile;
pub mod toolchain;
