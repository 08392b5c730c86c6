//! `jgo build` — resolve and materialize the environment.

use miette::IntoDiagnostic;

use crate::cli::{NetworkFlags, Target};

use super::support;

pub async fn exec(target: Target, network: NetworkFlags, links: Option<String>) -> miette::Result<()> {
    super::apply_network_flags(network.offline);

    let (mut spec, _lock_path, _java) = support::load(&target).into_diagnostic()?;
    if let Some(links) = links {
        spec.links = links;
    }
    let jdk_version = support::detect_jdk_version();
    let env = jgo_ops::build::build(&spec, &jdk_version).await.into_diagnostic()?;

    if network.verify {
        jgo_env::materialize::verify(&env.dir).into_diagnostic()?;
    }

    println!("{}", env.dir.display());
    Ok(())
}
