//! CLI command for `nativedep plan`
//!
//! Prints the configure and build+install commands a build would run.

use anyhow::Result;

use super::Session;
use crate::cli::output::{is_json, is_quiet, print_info};
use crate::core::orchestrator::DependencyBuildOrchestrator;
use crate::infra::process::ScriptedSupervisor;

/// Execute the plan command
pub fn execute(session: &Session) -> Result<()> {
    // Planning never launches anything; the supervisor is never called.
    let supervisor = ScriptedSupervisor::default();
    let orchestrator = DependencyBuildOrchestrator::new(
        &session.manifest,
        &session.module_root,
        session.identity.clone(),
        session.profile,
        &supervisor,
    );
    let plan = orchestrator.plan();

    if is_json() {
        let body = serde_json::json!({
            "dependency": session.manifest.dependency.name,
            "profile": plan.profile,
            "platform": session.identity.platform,
            "compiler": session.identity.compiler.to_string(),
            "generator": orchestrator.parameters().generator,
            "configure": {
                "program": plan.configure.program(),
                "args": plan.configure.to_argv(),
            },
            "install": {
                "program": plan.install.program(),
                "args": plan.install.to_argv(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if is_quiet() {
        println!("{}", plan.configure);
        println!("{}", plan.install);
        return Ok(());
    }

    let generator = &orchestrator.parameters().generator;
    print_info(&format!(
        "{} ({}) for {} / {} [generator: {}]",
        session.manifest.dependency.name,
        plan.profile,
        session.identity.platform,
        session.identity.compiler,
        if generator.is_empty() { "auto" } else { generator }
    ));
    println!();
    println!("configure:");
    println!("  {}", plan.configure);
    println!("install:");
    println!("  {}", plan.install);

    Ok(())
}
