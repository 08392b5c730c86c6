use jgo_core::dependency::DependencyScope;
use jgo_core::lockfile::{LockMetadata, LockedArtifact, Lockfile};

fn sample_lockfile() -> Lockfile {
    Lockfile {
        metadata: LockMetadata {
            tool_version: "0.2.0".to_string(),
            spec_hash: "f00dcafe".to_string(),
        },
        artifacts: vec![LockedArtifact {
            group_id: "org.apache.httpcomponents".to_string(),
            artifact_id: "httpclient".to_string(),
            version: "4.5.14".to_string(),
            classifier: None,
            packaging: "jar".to_string(),
            scope: DependencyScope::Compile,
            sha256: "sha256:abc".to_string(),
            source: "https://repo.maven.apache.org/maven2".to_string(),
            exclusions: vec!["commons-logging:commons-logging".to_string()],
        }],
    }
}

#[test]
fn write_then_read_back_preserves_exclusions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jgo.lock.toml");
    sample_lockfile().write_atomic(&path).unwrap();

    let reloaded = Lockfile::from_path(&path).unwrap();
    let artifact = reloaded.find("org.apache.httpcomponents", "httpclient").unwrap();
    assert_eq!(artifact.exclusions, vec!["commons-logging:commons-logging"]);
}

#[test]
fn spec_hash_mismatch_rejects_offline_reuse() {
    let lock = sample_lockfile();
    assert!(!lock.matches_spec_hash("different-hash"));
}

#[test]
fn empty_artifact_list_round_trips() {
    let lock = Lockfile {
        metadata: LockMetadata {
            tool_version: "0.2.0".to_string(),
            spec_hash: "empty".to_string(),
        },
        artifacts: vec![],
    };
    let rendered = lock.to_string_pretty().unwrap();
    let parsed = Lockfile::parse_toml(&rendered).unwrap();
    assert!(parsed.artifacts.is_empty());
}
