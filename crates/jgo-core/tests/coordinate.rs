use jgo_core::coordinate::{Coordinate, Endpoint, Placement};

#[test]
fn parses_seed_scenario_single_jar_endpoint() {
    let endpoint = Endpoint::parse("org.python:jython-standalone:2.7.4").unwrap();
    assert_eq!(endpoint.coordinates.len(), 1);
    let spec = &endpoint.coordinates[0];
    assert_eq!(spec.coordinate.group_id, "org.python");
    assert_eq!(spec.coordinate.artifact_id, "jython-standalone");
    assert_eq!(spec.coordinate.version.as_deref(), Some("2.7.4"));
}

#[test]
fn parses_exclusion_seed_scenario() {
    let endpoint = Endpoint::parse(
        "org.apache.httpcomponents:httpclient:4.5.14(x:commons-logging:commons-logging)",
    )
    .unwrap();
    let spec = &endpoint.coordinates[0];
    assert_eq!(spec.coordinate.artifact_id, "httpclient");
    assert_eq!(
        spec.exclusions(),
        vec![("commons-logging".to_string(), "commons-logging".to_string())]
    );
}

#[test]
fn multi_coordinate_endpoint_with_placement_overrides() {
    let endpoint = Endpoint::parse("g1:a1:1.0(cp)+g2:a2:2.0(mp)@com.example.Main").unwrap();
    assert_eq!(endpoint.main_class.as_deref(), Some("com.example.Main"));
    assert_eq!(endpoint.coordinates[0].placement(), Some(Placement::ClassPath));
    assert_eq!(endpoint.coordinates[1].placement(), Some(Placement::ModulePath));
}

#[test]
fn coordinate_identity_ignores_version() {
    let a = Coordinate::parse("g:a:1.0").unwrap();
    let b = Coordinate::parse("g:a:2.0").unwrap();
    assert_eq!(a.ga_key(), b.ga_key());
}

#[test]
fn rejects_malformed_endpoint() {
    assert!(Endpoint::parse("").is_err());
    assert!(Endpoint::parse("g:a(unterminated").is_err());
}
