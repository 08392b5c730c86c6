//! `jgo run` — sync the environment and launch the program.

use std::path::PathBuf;

use miette::IntoDiagnostic;

use crate::cli::{NetworkFlags, Target};

use super::support;

#[allow(clippy::too_many_arguments)]
pub async fn exec(
    target: Target,
    network: NetworkFlags,
    links: Option<String>,
    main_class: Option<String>,
    java_home: Option<PathBuf>,
    java_vendor: Option<String>,
    args: Vec<String>,
) -> miette::Result<()> {
    super::apply_network_flags(network.offline);

    let (mut spec, lock_path, java) = support::load(&target).into_diagnostic()?;
    if let Some(links) = links {
        spec.links = links;
    }
    let jdk_version = support::detect_jdk_version();

    let status = jgo_ops::run::run(
        &spec,
        &lock_path,
        &java,
        main_class,
        args,
        java_home.as_deref(),
        java_vendor.as_deref(),
        &jdk_version,
        network.verify,
    )
    .await
    .into_diagnostic()?;

    std::process::exit(status.code().unwrap_or(1));
}
