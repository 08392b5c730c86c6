//! On-disk Maven artifact cache (`<repo_cache>`, spec §6.4) mirroring the
//! repository's `group/artifact/version` layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::pom::{self, Pom};
use crate::repository::MavenRepository;

/// The shared, content-addressed-by-coordinate Maven artifact cache.
/// Rooted at `<repo_cache>` (spec §6.4), shared across every environment
/// built on this machine — it is not project-local.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Create a cache rooted at `jgo_util::dirs::repo_cache_root()`.
    pub fn new() -> Self {
        Self {
            root: jgo_util::dirs::repo_cache_root(),
        }
    }

    /// Create a cache rooted at an explicit directory (tests, `JGO_REPO_CACHE` overrides).
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path within the cache for a given Maven coordinate.
    pub fn artifact_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.root
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version)
    }

    /// Path to a specific file in the cache.
    fn artifact_path(&self, group: &str, artifact: &str, version: &str, filename: &str) -> PathBuf {
        self.artifact_dir(group, artifact, version).join(filename)
    }

    /// Check if a JAR is cached and return its path.
    pub fn get_jar(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        classifier: Option<&str>,
    ) -> Option<PathBuf> {
        let filename = match classifier {
            Some(c) => format!("{artifact}-{version}-{c}.jar"),
            None => format!("{artifact}-{version}.jar"),
        };
        let path = self.artifact_path(group, artifact, version, &filename);
        path.is_file().then_some(path)
    }

    /// Check if a POM is cached and parse it.
    pub fn get_pom(&self, group: &str, artifact: &str, version: &str) -> Option<Pom> {
        let filename = format!("{artifact}-{version}.pom");
        let path = self.artifact_path(group, artifact, version, &filename);
        if !path.is_file() {
            return None;
        }
        let content = fs::read_to_string(&path).ok()?;
        pom::parse_pom(&content).ok()
    }

    /// Store artifact data in the cache, creating directories as needed.
    pub fn put(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        filename: &str,
        data: &[u8],
    ) -> miette::Result<PathBuf> {
        let dir = self.artifact_dir(group, artifact, version);
        fs::create_dir_all(&dir).map_err(jgo_util::errors::JgoError::IOErr)?;
        let path = dir.join(filename);
        fs::write(&path, data).map_err(jgo_util::errors::JgoError::IOErr)?;
        Ok(path)
    }

    /// Store a POM file in the cache.
    pub fn put_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        pom_xml: &str,
    ) -> miette::Result<PathBuf> {
        let filename = format!("{artifact}-{version}.pom");
        self.put(group, artifact, version, &filename, pom_xml.as_bytes())
    }

    /// Store a JAR file in the cache.
    pub fn put_jar(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        classifier: Option<&str>,
        data: &[u8],
    ) -> miette::Result<PathBuf> {
        let filename = match classifier {
            Some(c) => format!("{artifact}-{version}-{c}.jar"),
            None => format!("{artifact}-{version}.jar"),
        };
        self.put(group, artifact, version, &filename, data)
    }

    /// Check whether the JAR for this coordinate exists in cache.
    pub fn has_artifact(&self, group: &str, artifact: &str, version: &str) -> bool {
        self.get_jar(group, artifact, version, None).is_some()
    }

    /// Check if artifact-level `maven-metadata.xml` is cached.
    pub fn get_metadata(&self, group: &str, artifact: &str) -> Option<String> {
        let path = self.root.join(group.replace('.', "/")).join(artifact).join("maven-metadata.xml");
        if path.is_file() {
            fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    /// Store artifact-level `maven-metadata.xml` in the cache.
    pub fn put_metadata(&self, group: &str, artifact: &str, xml: &str) -> miette::Result<PathBuf> {
        let dir = self.root.join(group.replace('.', "/")).join(artifact);
        fs::create_dir_all(&dir).map_err(jgo_util::errors::JgoError::IOErr)?;
        let path = dir.join("maven-metadata.xml");
        fs::write(&path, xml).map_err(jgo_util::errors::JgoError::IOErr)?;
        Ok(path)
    }

    /// Fetch `maven-metadata.xml` for `LATEST`/`RELEASE`/range resolution,
    /// using the cache unless `force` requests a fresh copy (spec §6.5
    /// `JGO_UPDATE`).
    pub async fn fetch_metadata(
        &self,
        client: &reqwest::Client,
        repo: &MavenRepository,
        group: &str,
        artifact: &str,
        force: bool,
    ) -> miette::Result<Option<String>> {
        if !force {
            if let Some(xml) = self.get_metadata(group, artifact) {
                return Ok(Some(xml));
            }
        }

        let url = repo.metadata_url(group, artifact);
        let xml = crate::download::download_text(client, repo, &url).await?;
        if let Some(ref content) = xml {
            self.put_metadata(group, artifact, content)?;
        }
        Ok(xml)
    }

    /// Fetch or download a POM, using cache when available.
    pub async fn fetch_pom(
        &self,
        client: &reqwest::Client,
        repo: &MavenRepository,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> miette::Result<Option<Pom>> {
        if let Some(pom) = self.get_pom(group, artifact, version) {
            return Ok(Some(pom));
        }

        let url = repo.pom_url(group, artifact, version);
        let xml = crate::download::download_text(client, repo, &url).await?;
        match xml {
            Some(content) => {
                self.put_pom(group, artifact, version, &content)?;
                let pom = pom::parse_pom(&content)?;
                Ok(Some(pom))
            }
            None => Ok(None),
        }
    }

    /// Remove cached artifacts not present in the resolved set.
    ///
    /// `keep` contains `(group, artifact, version)` tuples of artifacts
    /// that should be retained. Everything else gets deleted.
    /// Returns the number of version directories removed.
    pub fn prune(&self, keep: &std::collections::HashSet<(String, String, String)>) -> u32 {
        let mut removed = 0u32;
        if !self.root.is_dir() {
            return removed;
        }
        collect_version_dirs(&self.root, &self.root, keep, &mut removed);
        removed
    }

    /// Total size of the cache directory in bytes.
    pub fn size(&self) -> u64 {
        dir_size(&self.root)
    }
}

/// Walk the cache tree to find version directories (leaf dirs containing files)
/// and remove those not in the `keep` set.
///
/// Cache layout: `<root>/<group-path>/<artifact>/<version>/`
/// We reconstruct the coordinate by tracking depth from root.
fn collect_version_dirs(
    root: &Path,
    current: &Path,
    keep: &std::collections::HashSet<(String, String, String)>,
    removed: &mut u32,
) {
    let Ok(entries) = fs::read_dir(current) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let has_files = fs::read_dir(&path)
            .map(|rd| rd.flatten().any(|e| e.path().is_file()))
            .unwrap_or(false);

        if has_files {
            // This is a version dir: reconstruct group:artifact:version from path
            if let Some(coord) = reconstruct_coordinate(root, &path) {
                if !keep.contains(&coord) {
                    let _ = fs::remove_dir_all(&path);
                    *removed += 1;
                }
            }
        } else {
            collect_version_dirs(root, &path, keep, removed);
            // Remove empty parent dirs after pruning children
            if fs::read_dir(&path)
                .map(|mut rd| rd.next().is_none())
                .unwrap_or(true)
            {
                let _ = fs::remove_dir(&path);
            }
        }
    }
}

/// Reconstruct `(group, artifact, version)` from a cache path.
///
/// Path: `<root>/org/jetbrains/kotlin/kotlin-stdlib/2.3.0`
/// Result: `("org.jetbrains.kotlin", "kotlin-stdlib", "2.3.0")`
fn reconstruct_coordinate(root: &Path, version_dir: &Path) -> Option<(String, String, String)> {
    let rel = version_dir.strip_prefix(root).ok()?;
    let components: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if components.len() < 3 {
        return None;
    }
    let version = components.last()?.clone();
    let artifact = components[components.len() - 2].clone();
    let group = components[..components.len() - 2].join(".");
    Some((group, artifact, version))
}

fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let meta = entry.metadata();
            if let Ok(m) = meta {
                if m.is_dir() {
                    total += dir_size(&entry.path());
                } else {
                    total += m.len();
                }
            }
        }
    }
    total
}
