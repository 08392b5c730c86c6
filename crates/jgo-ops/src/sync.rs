//! The `sync` operation: reconcile the project file against its lock file
//! (spec §4.4 "bypasses resolution when offline use is requested and the
//! spec hash matches"), then materialize the resulting environment.

use std::path::Path;

use jgo_core::dependency::Exclusion;
use jgo_core::lockfile::{Lockfile, LockedArtifact};
use jgo_env::materialize::{self, Environment, LinkStrategy};
use jgo_maven::cache::LocalCache;
use jgo_maven::download;
use jgo_resolver::resolver::ResolvedArtifact;
use jgo_util::dirs;
use jgo_util::errors::JgoError;
use jgo_util::progress;

use crate::lock;
use crate::spec::ResolveSpec;

/// Reuse the project-level lock at `lock_path` when its `spec_hash` still
/// matches `spec`; otherwise resolve fresh and refresh the lock. Either
/// way, materialize the resulting artifact set into an environment. When
/// `verify` is set, re-checksum every installed JAR against the
/// environment's own lock file afterward (spec §8 scenario 6).
pub async fn sync(spec: &ResolveSpec, lock_path: &Path, jdk_version: &str, verify: bool) -> Result<Environment, JgoError> {
    let spec_hash = spec.spec_hash();

    let artifacts = match Lockfile::from_path(lock_path) {
        Ok(existing) if existing.matches_spec_hash(&spec_hash) => {
            progress::status_info("Reusing", &format!("{}", lock_path.display()));
            existing.artifacts.iter().map(locked_to_resolved).collect()
        }
        _ => {
            let fresh = lock::lock(spec, lock_path, jdk_version).await?;
            fresh.artifacts.iter().map(locked_to_resolved).collect::<Vec<_>>()
        }
    };

    let strategy = LinkStrategy::parse(&spec.links).unwrap_or(LinkStrategy::Auto);
    let cache = LocalCache::new();
    let client = download::build_client().map_err(|e| JgoError::Network { message: e.to_string() })?;
    let cache_root = dirs::cache_root();

    let env = materialize::materialize(
        &artifacts,
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

    if verify {
        progress::status_info("Verifying", &format!("{}", env.dir.display()));
        materialize::verify(&env.dir)?;
    }

    Ok(env)
}

fn locked_to_resolved(locked: &LockedArtifact) -> ResolvedArtifact {
    ResolvedArtifact {
        group_id: locked.group_id.clone(),
        artifact_id: locked.artifact_id.clone(),
        version: locked.version.clone(),
        classifier: locked.classifier.clone(),
        packaging: locked.packaging.clone(),
        scope: locked.scope,
        source: locked.source.clone(),
        exclusions: locked.exclusions.iter().filter_map(|s| Exclusion::parse(s)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jgo_core::dependency::DependencyScope;

    #[test]
    fn locked_artifact_round_trips_into_resolved_artifact() {
        let locked = LockedArtifact {
            group_id: "org.python".to_string(),
            artifact_id: "jython-standalone".to_string(),
            version: "2.7.4".to_string(),
            classifier: None,
            packaging: "jar".to_string(),
            scope: DependencyScope::Compile,
            sha256: "sha256:deadbeef".to_string(),
            source: "https://repo.maven.apache.org/maven2".to_string(),
            exclusions: vec!["commons-logging:commons-logging".to_string()],
        };
        let resolved = locked_to_resolved(&locked);
        assert_eq!(resolved.artifact_id, "jython-standalone");
        assert_eq!(resolved.exclusions.len(), 1);
    }
}
