//! CLI command for `nativedep artifacts`

use anyhow::Result;

use super::Session;
use crate::cli::output::{is_json, print_info, status};
use crate::core::artifacts::{ArtifactLocator, ArtifactSet};
use crate::core::layout::DependencyLayout;

/// Execute the artifacts command
pub fn execute(session: &Session) -> Result<()> {
    let layout = DependencyLayout::resolve(
        &session.manifest,
        &session.module_root,
        session.identity.platform,
    );
    let set = ArtifactLocator::new(&layout.build_root, session.manifest.artifacts.clone())
        .locate(session.profile);

    if is_json() {
        let artifacts: Vec<_> = set
            .artifacts
            .iter()
            .map(|artifact| {
                serde_json::json!({
                    "name": artifact.name,
                    "path": artifact.path,
                    "present": artifact.is_present(),
                })
            })
            .collect();
        let body = serde_json::json!({
            "profile": set.profile,
            "all_present": ArtifactLocator::all_present(&set),
            "artifacts": artifacts,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    print_summary(&set);
    Ok(())
}

fn print_summary(set: &ArtifactSet) {
    let missing = ArtifactLocator::missing(set).len();
    print_info(&format!(
        "{} of {} artifacts present for {}",
        set.len() - missing,
        set.len(),
        set.profile
    ));

    for artifact in &set.artifacts {
        let mark = if artifact.is_present() {
            status::SUCCESS
        } else {
            status::ERROR
        };
        println!("  {mark} {:<32} {}", artifact.name, artifact.path.display());
    }
}
