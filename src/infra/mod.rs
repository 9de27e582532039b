//! Infrastructure layer
//!
//! Handles side effects that are not plain file reads: external processes
//! and platform directory discovery.

pub mod dirs;
pub mod process;
