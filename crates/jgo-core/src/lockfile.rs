//! The lock file (spec §4.5, §6.3): a declarative, deterministic record of
//! a resolved dependency set, written atomically next to the environment it
//! describes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use jgo_util::errors::JgoError;

use crate::dependency::DependencyScope;

/// Top-level lock file: a header plus the locked artifact set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockfile {
    pub metadata: LockMetadata,
    #[serde(default, rename = "artifact")]
    pub artifacts: Vec<LockedArtifact>,
}

/// Header identifying the tool version and the hash of the *unresolved*
/// spec (root coordinates, global exclusions, BOMs, filters) that produced
/// this lock file. Used to validate offline reuse (spec §4.4, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    pub tool_version: String,
    pub spec_hash: String,
}

/// One locked artifact: full coordinates, scope, checksum, source
/// repository, and the exclusions carried to this node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub classifier: Option<String>,
    pub packaging: String,
    pub scope: DependencyScope,
    /// `sha256:<hex>`.
    pub sha256: String,
    /// The repository URL the artifact was fetched from.
    pub source: String,
    /// Carried exclusions, each `G:A` (either side may be `*`).
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl LockedArtifact {
    pub fn ga_key(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }
}

impl Lockfile {
    /// Load and parse a lock file from the given path.
    pub fn from_path(path: &Path) -> Result<Self, JgoError> {
        let content = std::fs::read_to_string(path).map_err(|e| JgoError::ParseError {
            message: format!("failed to read lock file {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self, JgoError> {
        toml::from_str(content).map_err(|e| JgoError::ParseError {
            message: format!("failed to parse lock file: {e}"),
        })
    }

    pub fn to_string_pretty(&self) -> Result<String, JgoError> {
        toml::to_string_pretty(self).map_err(|e| JgoError::Generic {
            message: format!("failed to serialize lock file: {e}"),
        })
    }

    /// Write the lock file atomically (temp file + rename) next to the
    /// environment directory it describes.
    pub fn write_atomic(&self, path: &Path) -> Result<(), JgoError> {
        let rendered = self.to_string_pretty()?;
        jgo_util::fs::write_atomic(path, rendered.as_bytes())
    }

    /// Does this lock file's spec hash match `spec_hash`? Reading the lock
    /// file is only a valid substitute for re-resolving (spec §4.3) when
    /// this holds.
    pub fn matches_spec_hash(&self, spec_hash: &str) -> bool {
        self.metadata.spec_hash == spec_hash
    }

    pub fn find(&self, group_id: &str, artifact_id: &str) -> Option<&LockedArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.group_id == group_id && a.artifact_id == artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lockfile {
        Lockfile {
            metadata: LockMetadata {
                tool_version: "0.2.0".to_string(),
                spec_hash: "abc123".to_string(),
            },
            artifacts: vec![LockedArtifact {
                group_id: "org.python".to_string(),
                artifact_id: "jython-standalone".to_string(),
                version: "2.7.4".to_string(),
                classifier: None,
                packaging: "jar".to_string(),
                scope: DependencyScope::Compile,
                sha256: "sha256:deadbeef".to_string(),
                source: "https://repo.maven.apache.org/maven2".to_string(),
                exclusions: vec![],
            }],
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let lock = sample();
        let rendered = lock.to_string_pretty().unwrap();
        let parsed = Lockfile::parse_toml(&rendered).unwrap();
        assert_eq!(parsed.metadata.spec_hash, "abc123");
        assert_eq!(parsed.artifacts.len(), 1);
        assert_eq!(parsed.artifacts[0].artifact_id, "jython-standalone");
    }

    #[test]
    fn matches_spec_hash_checks_header() {
        let lock = sample();
        assert!(lock.matches_spec_hash("abc123"));
        assert!(!lock.matches_spec_hash("other"));
    }

    #[test]
    fn find_locates_by_ga_key() {
        let lock = sample();
        assert!(lock.find("org.python", "jython-standalone").is_some());
        assert!(lock.find("org.python", "missing").is_none());
    }

    #[test]
    fn write_atomic_produces_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jgo.lock.toml");
        let lock = sample();
        lock.write_atomic(&path).unwrap();
        let reloaded = Lockfile::from_path(&path).unwrap();
        assert_eq!(reloaded.artifacts.len(), 1);
    }
}
