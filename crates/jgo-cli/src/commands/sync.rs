//! `jgo sync` — reconcile the project file against its lock, then
//! materialize.

use miette::IntoDiagnostic;

use crate::cli::{NetworkFlags, Target};

use super::support;

pub async fn exec(target: Target, network: NetworkFlags, links: Option<String>) -> miette::Result<()> {
    super::apply_network_flags(network.offline);

    let (mut spec, lock_path, _java) = support::load(&target).into_diagnostic()?;
    if let Some(links) = links {
        spec.links = links;
    }
    let jdk_version = support::detect_jdk_version();
    let env = jgo_ops::sync::sync(&spec, &lock_path, &jdk_version, network.verify)
        .await
        .into_diagnostic()?;

    println!("{}", env.dir.display());
    Ok(())
}
