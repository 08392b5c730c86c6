//! The `lock` operation: force a fresh resolution and write a project-level
//! lock file, a sibling of the project file rather than the per-environment
//! `jgo.lock.toml` written by materialization (spec §6.3: "same format,
//! separate file sibling").

use std::path::{Path, PathBuf};

use reqwest::Client;

use jgo_core::lockfile::{LockMetadata, Lockfile, LockedArtifact};

use jgo_maven::cache::LocalCache;
use jgo_maven::{checksum, download};
use jgo_resolver::resolver::ResolvedArtifact;
use jgo_util::errors::JgoError;
use jgo_util::progress;

use crate::spec::ResolveSpec;

/// `<project_file>.lock` — e.g. `jgo.toml` -> `jgo.toml.lock`.
pub fn lock_path_for(project_file: &Path) -> PathBuf {
    let mut name = project_file.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Resolve fresh (bypassing any existing project lock's `spec_hash` fast
/// path) and write the project-level lock file at `lock_path`.
pub async fn lock(spec: &ResolveSpec, lock_path: &Path, jdk_version: &str) -> Result<Lockfile, JgoError> {
    let result = crate::resolve::resolve(spec, jdk_version).await?;
    let cache = LocalCache::new();
    let client = download::build_client().map_err(|e| JgoError::Network { message: e.to_string() })?;

    let pb = progress::progress_bar(result.artifacts.len() as u64, "Checksumming");
    let mut artifacts = Vec::with_capacity(result.artifacts.len());
    for artifact in &result.artifacts {
        let locked = lock_artifact(artifact, &spec.repos, &cache, &client).await?;
        artifacts.push(locked);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let lockfile = Lockfile {
        metadata: LockMetadata {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            spec_hash: spec.spec_hash(),
        },
        artifacts,
    };
    lockfile.write_atomic(lock_path)?;
    progress::status_info("Locked", &format!("{}", lock_path.display()));
    Ok(lockfile)
}

async fn lock_artifact(
    artifact: &ResolvedArtifact,
    repos: &[jgo_maven::repository::MavenRepository],
    cache: &LocalCache,
    client: &Client,
) -> Result<LockedArtifact, JgoError> {
    let (source, sha256) = if let Some(path) = cache.get_jar(
        &artifact.group_id,
        &artifact.artifact_id,
        &artifact.version,
        artifact.classifier.as_deref(),
    ) {
        let data = std::fs::read(&path)?;
        (repos.first().map(|r| r.url.clone()).unwrap_or_default(), jgo_util::hash::sha256_bytes(&data))
    } else {
        fetch_and_cache(artifact, repos, cache, client).await?
    };

    Ok(LockedArtifact {
        group_id: artifact.group_id.clone(),
        artifact_id: artifact.artifact_id.clone(),
        version: artifact.version.clone(),
        classifier: artifact.classifier.clone(),
        packaging: artifact.packaging.clone(),
        scope: artifact.scope,
        sha256: format!("sha256:{sha256}"),
        source,
        exclusions: artifact.exclusions.iter().map(|e| e.to_string()).collect(),
    })
}

async fn fetch_and_cache(
    artifact: &ResolvedArtifact,
    repos: &[jgo_maven::repository::MavenRepository],
    cache: &LocalCache,
    client: &Client,
) -> Result<(String, String), JgoError> {
    if jgo_util::env::offline() {
        return Err(JgoError::NotAvailableOffline {
            message: format!("{}:{}:{}", artifact.group_id, artifact.artifact_id, artifact.version),
        });
    }

    for repo in repos {
        let url = repo.jar_url(&artifact.group_id, &artifact.artifact_id, &artifact.version, artifact.classifier.as_deref());
        let label = format!("{}:{}:{}", artifact.group_id, artifact.artifact_id, artifact.version);

        let data = download::download_artifact(client, repo, &url, &label)
            .await
            .map_err(|e| JgoError::Network { message: e.to_string() })?;
        let Some(bytes) = data else { continue };

        checksum::verify(client, repo, &url, &bytes)
            .await
            .map_err(|e| JgoError::IntegrityError { message: e.to_string() })?;

        cache
            .put_jar(&artifact.group_id, &artifact.artifact_id, &artifact.version, artifact.classifier.as_deref(), &bytes)
            .map_err(|e| JgoError::Generic { message: e.to_string() })?;

        return Ok((repo.url.clone(), jgo_util::hash::sha256_bytes(&bytes)));
    }

    Err(JgoError::NotFound {
        message: format!("{}:{}:{} not found in any configured repository", artifact.group_id, artifact.artifact_id, artifact.version),
    })
}
