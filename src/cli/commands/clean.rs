//! CLI implementation for `nativedep clean`
//!
//! Removes CMake output for the selected profile, or for all of them.

use anyhow::{Context, Result};

use super::Session;
use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::clean::clean_dependency;
use crate::core::layout::DependencyLayout;

/// Execute the clean command
pub fn execute(session: &Session, all: bool) -> Result<()> {
    let layout = DependencyLayout::resolve(
        &session.manifest,
        &session.module_root,
        session.identity.platform,
    );

    let profile = (!all).then_some(session.profile);
    let result = clean_dependency(&layout, profile).context("Failed to clean build output")?;

    if is_json() {
        let body = serde_json::json!({
            "status": "success",
            "removed": result.removed,
            "files": result.files,
            "bytes": result.bytes,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if result.removed.is_empty() {
        print_success("Nothing to clean");
        return Ok(());
    }

    print_success("Cleaned build output:");
    for dir in &result.removed {
        print_detail(&format!("Removed {}", dir.display()));
    }
    print_detail(&format!("{} files, {} bytes freed", result.files, result.bytes));

    Ok(())
}
