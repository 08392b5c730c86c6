//! The `build` operation: resolve, then materialize the resolved set into
//! a content-addressed environment directory (spec §4.6). Idempotent —
//! re-running against an unchanged spec observes the existing `.ok`
//! sentinel and performs no further writes.

use jgo_env::materialize::{self, Environment, LinkStrategy};
use jgo_maven::cache::LocalCache;
use jgo_maven::download;
use jgo_util::dirs;
use jgo_util::errors::JgoError;
use jgo_util::progress;

use crate::spec::ResolveSpec;

pub async fn build(spec: &ResolveSpec, jdk_version: &str) -> Result<Environment, JgoError> {
    let result = crate::resolve::resolve(spec, jdk_version).await?;
    let strategy = LinkStrategy::parse(&spec.links).unwrap_or(LinkStrategy::Auto);

    let cache = LocalCache::new();
    let client = download::build_client().map_err(|e| JgoError::Network { message: e.to_string() })?;
    let cache_root = dirs::cache_root();
    let spec_hash = spec.spec_hash();

    progress::status("Building", &format!("{}:{}", spec.root.group_id, spec.root.artifact_id));

    let env = materialize::materialize(
        &result.artifacts,
        &spec.root.group_id,
        &spec.root.artifact_id,
        spec.filters.optional_depth,
        &spec_hash,
        env!("CARGO_PKG_VERSION"),
        &spec.repos,
        &cache,
        &client,
        &cache_root,
        strategy,
    )
    .await?;

    progress::status_info("Finished", &format!("{}", env.dir.display()));
    Ok(env)
}
