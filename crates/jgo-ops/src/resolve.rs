//! The `resolve` operation: dry-run dependency resolution (spec §4.3). No
//! artifact is downloaded beyond what POM parsing requires and nothing is
//! written to the environment cache.

use jgo_maven::cache::LocalCache;
use jgo_maven::download;
use jgo_resolver::resolver::{self, ResolutionResult};
use jgo_util::errors::JgoError;
use jgo_util::progress;

use crate::spec::ResolveSpec;

/// Run resolution for `spec` and return the resolved graph/artifact set,
/// without touching the repository cache's write path or materializing an
/// environment.
pub async fn resolve(spec: &ResolveSpec, jdk_version: &str) -> Result<ResolutionResult, JgoError> {
    progress::status("Resolving", &format!("{}:{}", spec.root.group_id, spec.root.artifact_id));

    let cache = LocalCache::new();
    let client = download::build_client().map_err(|e| JgoError::Network { message: e.to_string() })?;
    let root_label = (spec.root.group_id.as_str(), spec.root.artifact_id.as_str(), spec.root.version.as_str());

    let result = resolver::resolve(
        root_label,
        &spec.direct_dependencies,
        &spec.global_exclusions,
        &spec.repos,
        &cache,
        &client,
        &spec.filters,
        jdk_version,
    )
    .await
    .map_err(|e| JgoError::ResolutionError { message: e.to_string() })?;

    progress::status_info("Resolved", &format!("{} artifacts", result.artifacts.len()));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_spec_root_label_matches_endpoint_first_coordinate() {
        let spec = ResolveSpec::from_endpoint("org.python:jython-standalone:2.7.4").unwrap();
        assert_eq!(spec.root.group_id, "org.python");
    }
}
