use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Maven-compatible dependency scope (spec §3: `compile, provided, runtime,
/// test, system`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
}

impl Default for DependencyScope {
    fn default() -> Self {
        Self::Compile
    }
}

impl DependencyScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compile" => Some(Self::Compile),
            "provided" => Some(Self::Provided),
            "runtime" => Some(Self::Runtime),
            "test" => Some(Self::Test),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(groupId, artifactId)` pattern excluded from the transitive graph
/// rooted at the node carrying it. Either field may be `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse a `G:A` string (either side may be `*`).
    pub fn parse(s: &str) -> Option<Self> {
        let (g, a) = s.split_once(':')?;
        if g.is_empty() || a.is_empty() {
            return None;
        }
        Some(Self::new(g, a))
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        crate::coordinate::exclusion_matches(
            &(self.group_id.clone(), self.artifact_id.clone()),
            group_id,
            artifact_id,
        )
    }
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// `(artifact, scope, optional, exclusions)` — one declared or resolved
/// dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub coordinate: Coordinate,
    pub scope: DependencyScope,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            scope: DependencyScope::default(),
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn is_excluded_by(&self, exclusions: &[Exclusion]) -> bool {
        exclusions
            .iter()
            .any(|e| e.matches(&self.coordinate.group_id, &self.coordinate.artifact_id))
    }
}
