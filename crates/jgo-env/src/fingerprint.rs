//! Content-addressed environment fingerprinting (spec §4.5): the resolved
//! artifact set, together with the optional-dependency depth used to
//! produce it, is hashed into a short cache key that names the environment
//! directory under the cache root.

use std::path::PathBuf;

use jgo_resolver::resolver::ResolvedArtifact;
use jgo_util::hash::sha256_bytes;

/// Render one artifact's canonical descriptor: `g:a:v:c:p[:excl=<g:a,...>]`.
/// Exclusions are sorted and comma-joined so that equivalent exclusion sets
/// carried through different traversal orders render identically.
fn render_artifact(artifact: &ResolvedArtifact) -> String {
    let classifier = artifact.classifier.as_deref().unwrap_or("");
    let mut rendered = format!(
        "{}:{}:{}:{}:{}",
        artifact.group_id, artifact.artifact_id, artifact.version, classifier, artifact.packaging
    );

    if !artifact.exclusions.is_empty() {
        let mut excl: Vec<String> = artifact.exclusions.iter().map(|e| e.to_string()).collect();
        excl.sort();
        rendered.push_str(":excl=");
        rendered.push_str(&excl.join(","));
    }

    rendered
}

/// Compute the 16-hex-character fingerprint identifying an environment
/// materialized from `artifacts` under the given `optional_depth`.
///
/// The artifact set is sorted by `(group, artifact, version, classifier,
/// packaging)` before rendering so that the fingerprint is independent of
/// resolution traversal order, then hashed with SHA-256 and truncated —
/// sixteen hex characters is ample collision resistance for a cache key
/// while keeping directory names short.
pub fn compute(artifacts: &[ResolvedArtifact], optional_depth: usize) -> String {
    let mut sorted: Vec<&ResolvedArtifact> = artifacts.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.group_id, &a.artifact_id, &a.version, &a.classifier, &a.packaging).cmp(&(
            &b.group_id,
            &b.artifact_id,
            &b.version,
            &b.classifier,
            &b.packaging,
        ))
    });

    let mut rendered: Vec<String> = sorted.iter().map(|a| render_artifact(a)).collect();
    rendered.push(format!("optional_depth={optional_depth}"));
    let joined = rendered.join("+");

    let digest = sha256_bytes(joined.as_bytes());
    digest[..16].to_string()
}

/// The directory an environment with the given fingerprint materializes
/// into: `<cache_root>/envs/<group>/<artifact>/<fingerprint>/` (spec §4.5).
pub fn env_dir(cache_root: &std::path::Path, root_group: &str, root_artifact: &str, fingerprint: &str) -> PathBuf {
    cache_root
        .join("envs")
        .join(root_group)
        .join(root_artifact)
        .join(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jgo_core::dependency::{DependencyScope, Exclusion};

    fn artifact(group: &str, artifact_id: &str, version: &str) -> ResolvedArtifact {
        ResolvedArtifact {
            group_id: group.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: None,
            packaging: "jar".to_string(),
            scope: DependencyScope::Compile,
            source: "https://repo.maven.apache.org/maven2".to_string(),
            exclusions: Vec::new(),
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let artifacts = vec![artifact("org.slf4j", "slf4j-api", "2.0.13")];
        let a = compute(&artifacts, 0);
        let b = compute(&artifacts, 0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = vec![
            artifact("org.slf4j", "slf4j-api", "2.0.13"),
            artifact("com.google.guava", "guava", "33.2.1-jre"),
        ];
        let b = vec![
            artifact("com.google.guava", "guava", "33.2.1-jre"),
            artifact("org.slf4j", "slf4j-api", "2.0.13"),
        ];
        assert_eq!(compute(&a, 0), compute(&b, 0));
    }

    #[test]
    fn fingerprint_changes_with_optional_depth() {
        let artifacts = vec![artifact("org.slf4j", "slf4j-api", "2.0.13")];
        assert_ne!(compute(&artifacts, 0), compute(&artifacts, 1));
    }

    #[test]
    fn fingerprint_changes_with_exclusions() {
        let mut with_excl = artifact("org.slf4j", "slf4j-api", "2.0.13");
        with_excl.exclusions.push(Exclusion::new("commons-logging", "commons-logging"));
        let without = vec![artifact("org.slf4j", "slf4j-api", "2.0.13")];
        assert_ne!(compute(&[with_excl], 0), compute(&without, 0));
    }

    #[test]
    fn env_dir_layout() {
        let root = std::path::Path::new("/home/user/.cache/jgo");
        let dir = env_dir(root, "org.example", "app", "abc123");
        assert_eq!(dir, root.join("envs/org.example/app/abc123"));
    }
}
