//! Environment Builder (spec §4.6): materializes a resolved artifact set
//! into a content-addressed directory, installing JARs with a configurable
//! hard-link/symlink/copy strategy, guarded by a cross-process exclusive
//! lock and an atomic `.ok` completion sentinel.

use std::path::{Path, PathBuf};

use reqwest::Client;

use jgo_core::coordinate::Placement;
use jgo_core::lockfile::{LockMetadata, Lockfile, LockedArtifact};
use jgo_maven::cache::LocalCache;
use jgo_maven::checksum;
use jgo_maven::download;
use jgo_maven::repository::MavenRepository;
use jgo_resolver::resolver::ResolvedArtifact;
use jgo_util::errors::JgoError;
use jgo_util::fs::{ensure_dir, write_sentinel};
use jgo_util::lock::FileLock;

use crate::classify;
use crate::fingerprint;

/// How a JAR is placed into the environment directory (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    Hard,
    Soft,
    Copy,
    Auto,
}

impl LinkStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hard" => Some(Self::Hard),
            "soft" => Some(Self::Soft),
            "copy" => Some(Self::Copy),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// A materialized environment: its directory plus the class-path/module-path
/// split of installed JARs (input to the Launch Planner, spec §4.7).
#[derive(Debug, Clone)]
pub struct Environment {
    pub dir: PathBuf,
    pub fingerprint: String,
    pub class_path_jars: Vec<PathBuf>,
    pub module_path_jars: Vec<PathBuf>,
}

/// Materialize `artifacts` into a content-addressed environment directory
/// under `cache_root`, foldered under `(root_group, root_artifact)` — the
/// first root's coordinates, used only for human-readable layout; identity
/// comes entirely from the fingerprint.
#[allow(clippy::too_many_arguments)]
pub async fn materialize(
    artifacts: &[ResolvedArtifact],
    root_group: &str,
    root_artifact: &str,
    optional_depth: usize,
    spec_hash: &str,
    tool_version: &str,
    repos: &[MavenRepository],
    cache: &LocalCache,
    client: &Client,
    cache_root: &Path,
    strategy: LinkStrategy,
) -> Result<Environment, JgoError> {
    let fp = fingerprint::compute(artifacts, optional_depth);
    let env_dir = fingerprint::env_dir(cache_root, root_group, root_artifact, &fp);
    let lock_path = sibling_with_suffix(&env_dir, ".lock");

    let _lock = FileLock::acquire_exclusive(&lock_path)?;

    let sentinel = env_dir.join(".ok");
    if sentinel.is_file() {
        return load_existing(env_dir, fp);
    }

    // Discard any partial content from a previous crashed build — the
    // absence of `.ok` means nothing here can be trusted.
    if env_dir.is_dir() {
        std::fs::remove_dir_all(&env_dir)?;
    }

    let jars_dir = env_dir.join("jars");
    let modules_dir = env_dir.join("modules");
    ensure_dir(&jars_dir)?;
    ensure_dir(&modules_dir)?;

    let mut class_path_jars = Vec::new();
    let mut module_path_jars = Vec::new();
    let mut locked = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let (cached_jar, sha256) = ensure_cached(artifact, repos, cache, client).await?;
        let placement = classify::classify(&cached_jar)?;
        let target_dir = match placement {
            Placement::ClassPath => &jars_dir,
            Placement::ModulePath => &modules_dir,
        };
        let basename = cached_jar.file_name().ok_or_else(|| JgoError::Generic {
            message: format!("cached artifact path has no filename: {}", cached_jar.display()),
        })?;
        let dest = target_dir.join(basename);
        install(&cached_jar, &dest, strategy)?;

        match placement {
            Placement::ClassPath => class_path_jars.push(dest),
            Placement::ModulePath => module_path_jars.push(dest),
        }

        locked.push(LockedArtifact {
            group_id: artifact.group_id.clone(),
            artifact_id: artifact.artifact_id.clone(),
            version: artifact.version.clone(),
            classifier: artifact.classifier.clone(),
            packaging: artifact.packaging.clone(),
            scope: artifact.scope,
            sha256: format!("sha256:{sha256}"),
            source: artifact.source.clone(),
            exclusions: artifact.exclusions.iter().map(|e| e.to_string()).collect(),
        });
    }

    class_path_jars.sort();
    module_path_jars.sort();

    let lockfile = Lockfile {
        metadata: LockMetadata {
            tool_version: tool_version.to_string(),
            spec_hash: spec_hash.to_string(),
        },
        artifacts: locked,
    };
    lockfile.write_atomic(&env_dir.join("jgo.lock.toml"))?;

    write_sentinel(&sentinel)?;

    Ok(Environment {
        dir: env_dir,
        fingerprint: fp,
        class_path_jars,
        module_path_jars,
    })
}

/// Re-checksum every installed JAR in `env_dir` against its recorded
/// `jgo.lock.toml` entry (spec §8 scenario 6: `--offline --verify`).
/// Returns the first mismatch as an [`JgoError::IntegrityError`].
pub fn verify(env_dir: &Path) -> Result<(), JgoError> {
    let lockfile = Lockfile::from_path(&env_dir.join("jgo.lock.toml"))?;

    for artifact in &lockfile.artifacts {
        let filename = match &artifact.classifier {
            Some(c) => format!("{}-{}-{c}.{}", artifact.artifact_id, artifact.version, artifact.packaging),
            None => format!("{}-{}.{}", artifact.artifact_id, artifact.version, artifact.packaging),
        };

        let jars_path = env_dir.join("jars").join(&filename);
        let modules_path = env_dir.join("modules").join(&filename);
        let installed_path = if jars_path.is_file() {
            jars_path
        } else if modules_path.is_file() {
            modules_path
        } else {
            return Err(JgoError::NotFound {
                message: format!("{} is recorded in jgo.lock.toml but missing from {}", filename, env_dir.display()),
            });
        };

        let data = std::fs::read(&installed_path)?;
        let actual = format!("sha256:{}", jgo_util::hash::sha256_bytes(&data));
        if actual != artifact.sha256 {
            return Err(JgoError::IntegrityError {
                message: format!(
                    "{}:{}:{} checksum mismatch: recorded {}, installed file hashes to {}",
                    artifact.group_id, artifact.artifact_id, artifact.version, artifact.sha256, actual
                ),
            });
        }
    }

    Ok(())
}

/// Rebuild an [`Environment`] from a directory whose `.ok` sentinel is
/// already present, by listing the installed JARs directly.
fn load_existing(env_dir: PathBuf, fingerprint: String) -> Result<Environment, JgoError> {
    let class_path_jars = list_jars(&env_dir.join("jars"))?;
    let module_path_jars = list_jars(&env_dir.join("modules"))?;
    Ok(Environment {
        dir: env_dir,
        fingerprint,
        class_path_jars,
        module_path_jars,
    })
}

fn list_jars(dir: &Path) -> Result<Vec<PathBuf>, JgoError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut jars: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jar"))
        .collect();
    jars.sort();
    Ok(jars)
}

/// `<path>` with `suffix` appended to its final component, as a sibling
/// rather than a child (`envs/g/a/<fp>` → `envs/g/a/<fp>.lock`).
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Ensure an artifact's JAR is present in the repository cache (spec §4.4),
/// downloading and checksum-verifying it if necessary. Returns the cached
/// path and its verified SHA-256 hex digest.
async fn ensure_cached(
    artifact: &ResolvedArtifact,
    repos: &[MavenRepository],
    cache: &LocalCache,
    client: &Client,
) -> Result<(PathBuf, String), JgoError> {
    if let Some(path) = cache.get_jar(
        &artifact.group_id,
        &artifact.artifact_id,
        &artifact.version,
        artifact.classifier.as_deref(),
    ) {
        let data = std::fs::read(&path)?;
        return Ok((path, jgo_util::hash::sha256_bytes(&data)));
    }

    if jgo_util::env::offline() {
        return Err(JgoError::NotAvailableOffline {
            message: format!("{}:{}:{}", artifact.group_id, artifact.artifact_id, artifact.version),
        });
    }

    for repo in repos {
        let url = repo.jar_url(
            &artifact.group_id,
            &artifact.artifact_id,
            &artifact.version,
            artifact.classifier.as_deref(),
        );
        let label = format!("{}:{}:{}", artifact.group_id, artifact.artifact_id, artifact.version);

        let data = download::download_artifact(client, repo, &url, &label)
            .await
            .map_err(|e| JgoError::Network { message: e.to_string() })?;
        let Some(bytes) = data else { continue };

        checksum::verify(client, repo, &url, &bytes)
            .await
            .map_err(|e| JgoError::IntegrityError { message: e.to_string() })?;

        let path = cache
            .put_jar(
                &artifact.group_id,
                &artifact.artifact_id,
                &artifact.version,
                artifact.classifier.as_deref(),
                &bytes,
            )
            .map_err(|e| JgoError::Generic { message: e.to_string() })?;

        return Ok((path, jgo_util::hash::sha256_bytes(&bytes)));
    }

    Err(JgoError::NotFound {
        message: format!(
            "{}:{}:{} not found in any configured repository",
            artifact.group_id, artifact.artifact_id, artifact.version
        ),
    })
}

fn install(src: &Path, dest: &Path, strategy: LinkStrategy) -> Result<(), JgoError> {
    if dest.exists() {
        let _ = std::fs::remove_file(dest);
    }
    match strategy {
        LinkStrategy::Hard => hard_link_or_copy(src, dest),
        LinkStrategy::Soft => symlink(src, dest),
        LinkStrategy::Copy => copy(src, dest),
        LinkStrategy::Auto => {
            if std::fs::hard_link(src, dest).is_ok() {
                return Ok(());
            }
            if symlink(src, dest).is_ok() {
                return Ok(());
            }
            copy(src, dest)
        }
    }
}

fn hard_link_or_copy(src: &Path, dest: &Path) -> Result<(), JgoError> {
    if std::fs::hard_link(src, dest).is_ok() {
        return Ok(());
    }
    copy(src, dest)
}

fn copy(src: &Path, dest: &Path) -> Result<(), JgoError> {
    std::fs::copy(src, dest).map(|_| ()).map_err(JgoError::IOErr)
}

#[cfg(unix)]
fn symlink(src: &Path, dest: &Path) -> Result<(), JgoError> {
    let absolute = std::fs::canonicalize(src)?;
    std::os::unix::fs::symlink(absolute, dest).map_err(JgoError::IOErr)
}

#[cfg(windows)]
fn symlink(src: &Path, dest: &Path) -> Result<(), JgoError> {
    let absolute = std::fs::canonicalize(src)?;
    std::os::windows::fs::symlink_file(absolute, dest).map_err(JgoError::IOErr)
}
