//! Command dispatch and handler modules.

mod build;
mod lock;
mod resolve;
mod run;
mod support;
mod sync;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve { target } => resolve::exec(target).await,
        Command::Build { target, network, links } => build::exec(target, network, links).await,
        Command::Lock { target } => lock::exec(target).await,
        Command::Sync { target, network, links } => sync::exec(target, network, links).await,
        Command::Run {
            target,
            network,
            links,
            main_class,
            java_home,
            java_vendor,
            args,
        } => run::exec(target, network, links, main_class, java_home, java_vendor, args).await,
    }
}

/// Set `JGO_OFFLINE=1` when `--offline` was passed, matching the env-var
/// contract `jgo_util::env::offline` reads (spec §6.5).
fn apply_network_flags(offline: bool) {
    if offline {
        std::env::set_var("JGO_OFFLINE", "1");
    }
}
