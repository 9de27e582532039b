//! Clean logic
//!
//! Removes CMake output so the next `ensure` configures and builds from
//! scratch. Either one profile's output directory or the whole build root.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::layout::DependencyLayout;
use crate::core::profile::BuildProfile;
use crate::error::FilesystemError;

/// Result of clean operation
#[derive(Debug, Default, Serialize)]
pub struct CleanResult {
    /// Directories that were removed
    pub removed: Vec<PathBuf>,
    /// Directories that didn't exist (skipped)
    pub skipped: Vec<PathBuf>,
    /// Files deleted
    pub files: u64,
    /// Bytes freed
    pub bytes: u64,
}

/// Remove the output of `profile`, or of every profile when `None`
pub fn clean_dependency(
    layout: &DependencyLayout,
    profile: Option<BuildProfile>,
) -> Result<CleanResult, FilesystemError> {
    let target = match profile {
        Some(profile) => layout.output_dir(profile),
        None => layout.build_root.clone(),
    };

    let mut result = CleanResult::default();
    if !target.exists() {
        tracing::debug!("Nothing to clean at {}", target.display());
        result.skipped.push(target);
        return Ok(result);
    }

    let (files, bytes) = tree_size(&target);
    std::fs::remove_dir_all(&target).map_err(|e| FilesystemError::RemoveDir {
        path: target.clone(),
        error: e.to_string(),
    })?;

    tracing::info!("Removed {} ({files} files)", target.display());
    result.files = files;
    result.bytes = bytes;
    result.removed.push(target);
    Ok(result)
}

fn tree_size(dir: &Path) -> (u64, u64) {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .fold((0, 0), |(files, bytes), entry| {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            (files + 1, bytes + size)
        })
}
