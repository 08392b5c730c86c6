//! CLI argument definitions for jgo.
//!
//! The behavioral core (resolution, materialization, launch planning) is
//! fully specified; the CLI surface itself is deliberately thin — one
//! subcommand per Orchestrator operation, no colored tables, trees, or
//! interactive prompts.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "jgo",
    version,
    about = "Environment manager and launcher for JVM programs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How the target to resolve was specified. Every operation accepts either
/// an endpoint string (spec §6.1) or a project file (spec §6.2); when both
/// are omitted, `jgo.toml` in the current directory is used.
#[derive(clap::Args, Debug, Clone)]
pub struct Target {
    /// Endpoint expression, e.g. `org.python:jython-standalone:2.7.4`
    pub endpoint: Option<String>,

    /// Path to a project file (default: `jgo.toml` in the current directory)
    #[arg(short = 'p', long = "project")]
    pub project_file: Option<std::path::PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct NetworkFlags {
    /// Forbid network access; fail with NotAvailableOffline on cache misses
    #[arg(long)]
    pub offline: bool,

    /// Re-checksum every installed JAR against its lock entry
    #[arg(long)]
    pub verify: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the dependency graph without installing anything
    Resolve {
        #[command(flatten)]
        target: Target,
    },

    /// Resolve and materialize the environment
    Build {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        network: NetworkFlags,

        /// Install strategy: hard, soft, copy, or auto
        #[arg(long)]
        links: Option<String>,
    },

    /// Force a fresh resolution and (re)write the project-level lock file
    Lock {
        #[command(flatten)]
        target: Target,
    },

    /// Reconcile the project file against its lock, then materialize
    Sync {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        network: NetworkFlags,

        #[arg(long)]
        links: Option<String>,
    },

    /// Sync the environment and launch the program
    Run {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        network: NetworkFlags,

        #[arg(long)]
        links: Option<String>,

        /// Explicit main class, overriding manifest/bytecode inference
        #[arg(long)]
        main_class: Option<String>,

        /// Path to a specific JDK installation
        #[arg(long)]
        java_home: Option<std::path::PathBuf>,

        /// Required JDK vendor, matched as a case-insensitive substring
        #[arg(long)]
        java_vendor: Option<String>,

        /// Arguments passed through to the launched program
        #[arg(last = true)]
        args: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
