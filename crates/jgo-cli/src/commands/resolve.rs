//! `jgo resolve` — dry-run graph resolution.

use miette::IntoDiagnostic;

use crate::cli::Target;

use super::support;

pub async fn exec(target: Target) -> miette::Result<()> {
    let (spec, _lock_path, _java) = support::load(&target).into_diagnostic()?;
    let jdk_version = support::detect_jdk_version();
    let result = jgo_ops::resolve::resolve(&spec, &jdk_version).await.into_diagnostic()?;

    for artifact in &result.artifacts {
        println!(
            "{}:{}:{} ({})",
            artifact.group_id, artifact.artifact_id, artifact.version, artifact.scope
        );
    }
    if !result.conflicts.is_empty() {
        eprintln!("{} version conflict(s) resolved by mediation", result.conflicts.len());
    }
    Ok(())
}
