//! `jgo lock` — force a fresh resolution and (re)write the project-level
//! lock file.

use miette::IntoDiagnostic;

use crate::cli::Target;

use super::support;

pub async fn exec(target: Target) -> miette::Result<()> {
    let (spec, lock_path, _java) = support::load(&target).into_diagnostic()?;
    let jdk_version = support::detect_jdk_version();
    let lockfile = jgo_ops::lock::lock(&spec, &lock_path, &jdk_version).await.into_diagnostic()?;

    println!("{} ({} artifacts)", lock_path.display(), lockfile.artifacts.len());
    Ok(())
}
