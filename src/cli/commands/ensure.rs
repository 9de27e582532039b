//! CLI command for `nativedep ensure`
//!
//! Builds the dependency when its artifacts are missing, then prints what
//! the host build must link: as text, as JSON, or as `cargo:` directives
//! for a build script.

use anyhow::{Context, Result};

use super::{EmitFormat, Session};
use crate::cli::output::{is_json, maybe_spinner, print_detail, print_success};
use crate::core::linkage::{CargoDirectives, Linkage};
use crate::core::orchestrator::{BuildState, DependencyBuildOrchestrator};
use crate::infra::process::SystemSupervisor;

/// Execute the ensure command
pub fn execute(session: &Session, force: bool, emit: EmitFormat) -> Result<()> {
    let supervisor = SystemSupervisor::new(&session.module_root)
        .context("Failed to prepare process supervision")?;
    let mut orchestrator = DependencyBuildOrchestrator::new(
        &session.manifest,
        &session.module_root,
        session.identity.clone(),
        session.profile,
        &supervisor,
    )
    .with_force(force);

    let spinner = maybe_spinner(&format!(
        "Building {} ({})...",
        session.manifest.dependency.name, session.profile
    ));
    let mut linkage = Linkage::default();
    let result = orchestrator.ensure(&mut linkage);
    spinner.finish_and_clear();

    let outcome = result.with_context(|| {
        format!(
            "Failed to build {} ({})",
            session.manifest.dependency.name, session.profile
        )
    })?;

    if emit == EmitFormat::Cargo {
        let stdout = std::io::stdout().lock();
        let mut directives = CargoDirectives::new(stdout);
        linkage.apply_to(&mut directives);
        directives
            .finish()
            .context("Failed to write cargo directives")?;
        return Ok(());
    }

    if is_json() {
        let body = serde_json::json!({
            "status": "success",
            "dependency": session.manifest.dependency.name,
            "profile": session.profile,
            "state": outcome.state,
            "built": outcome.built,
            "linkage": outcome.linkage,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    debug_assert_eq!(outcome.state, BuildState::Ready);
    if outcome.built {
        print_success(&format!(
            "Built {} ({})",
            session.manifest.dependency.name, session.profile
        ));
    } else {
        print_success(&format!(
            "{} ({}) is up to date",
            session.manifest.dependency.name, session.profile
        ));
    }
    print_linkage(&linkage);

    Ok(())
}

fn print_linkage(linkage: &Linkage) {
    for definition in &linkage.definitions {
        print_detail(&format!("define  {definition}"));
    }
    for dir in &linkage.include_dirs {
        print_detail(&format!("include {}", dir.display()));
    }
    for library in &linkage.libraries {
        print_detail(&format!("link    {}", library.display()));
    }
    for runtime in &linkage.runtime_dependencies {
        print_detail(&format!("runtime {}", runtime.display()));
    }
}
