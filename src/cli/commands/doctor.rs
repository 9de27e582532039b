//! CLI command for `nativedep doctor`
//!
//! Checks the tools and SDKs the native build needs and reports issues
//! with suggestions.

use anyhow::Result;

use super::{absolute, load_manifest, Session};
use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::cli::TargetArgs;
use crate::core::doctor::run_doctor;
use crate::core::manifest::DependencyManifest;

/// Execute the doctor command
pub fn execute(target: &TargetArgs) -> Result<()> {
    let module_root = absolute(&target.module_root)?;

    // A broken manifest is reported, not fatal; the remaining checks run on defaults.
    let mut manifest_issue = None;
    let manifest = load_manifest(target, &module_root).unwrap_or_else(|e| {
        manifest_issue = Some(format!("{e:#}"));
        DependencyManifest::default()
    });
    let session = Session::with_manifest(target, module_root, manifest)?;

    let mut report = run_doctor(&session.manifest, &session.module_root, &session.identity);
    if let Some(issue) = manifest_issue {
        report.add_config_issue(issue);
    }

    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_required_passed() { "success" } else { "error" },
            "checks": report.checks,
            "config_issues": report.config_issues,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);

        if !report.all_required_passed() {
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    // Quiet mode - only show errors
    if is_quiet() {
        let failed_required = report.failed_required();
        for check in &failed_required {
            eprintln!("{} Missing required: {}", status::ERROR, check.name);
        }
        for issue in &report.config_issues {
            eprintln!("{} {issue}", status::ERROR);
        }
        if !report.all_required_passed() {
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    print_info(&format!(
        "Checking build environment for {} on {} / {}...",
        session.manifest.dependency.name, session.identity.platform, session.identity.compiler
    ));
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default();
        let required_str = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!("  {} {}{version_str}{required_str}", status::SUCCESS, check.name);
        } else {
            println!("  {} {}{required_str}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Configuration issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_required_passed() {
        print_success(&format!("All required checks passed ({passed}/{total})"));
        Ok(())
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        Err(anyhow::anyhow!(
            "Build environment is incomplete. Run 'nativedep doctor' for details."
        ))
    }
}
