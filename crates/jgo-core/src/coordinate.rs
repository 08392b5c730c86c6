//! Maven coordinates and the endpoint string grammar (spec-facing §6.1):
//!
//! ```text
//! endpoint   := coord ('+' coord)* ('@' mainClass)?
//! coord      := G ':' A (':' V)? (':' C)? (':' P)? modifiers? '!'?
//! modifiers  := '(' modifier (',' modifier)* ')'
//! modifier   := 'c' | 'cp' | 'm' | 'mp' | 'p'          // placement
//!             | 'x'                                     // this coord IS a global exclusion
//!             | 'x:' G ':' A                            // this coord HAS this exclusion
//! ```
//!
//! Modifier order is irrelevant. `*` is allowed for either `G` or `A` inside
//! an exclusion pattern.

use std::fmt;

use jgo_util::errors::JgoError;

/// Default packaging when none is specified.
pub const DEFAULT_PACKAGING: &str = "jar";

/// `(groupId, artifactId, version?, classifier?, packaging?)`.
///
/// Two coordinates with identical `(g, a, c, p)` refer to the same artifact
/// track regardless of version — version comparisons never enter identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    /// `None` means "unspecified" — the version must come from dependency
    /// management. `Some` may still be a version spec (`LATEST`, `RELEASE`,
    /// a range) rather than a concrete version.
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub packaging: String,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            classifier: None,
            packaging: DEFAULT_PACKAGING.to_string(),
        }
    }

    /// Identity key independent of version: `(groupId, artifactId)`.
    pub fn ga_key(&self) -> (String, String) {
        (self.group_id.clone(), self.artifact_id.clone())
    }

    /// Identity key including classifier/packaging: `(g, a, c, p)`.
    pub fn gacp_key(&self) -> (String, String, Option<String>, String) {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.classifier.clone(),
            self.packaging.clone(),
        )
    }

    /// Parse a bare `G:A(:V)?(:C)?(:P)?` string, without modifiers or `!`.
    pub fn parse(s: &str) -> Result<Self, JgoError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 5 {
            return Err(JgoError::ParseError {
                message: format!("coordinate '{s}' must have 2 to 5 colon-separated fields"),
            });
        }
        let group_id = non_empty(parts[0], "groupId", s)?;
        let artifact_id = non_empty(parts[1], "artifactId", s)?;
        let version = parts.get(2).filter(|v| !v.is_empty()).map(|v| v.to_string());
        let classifier = parts.get(3).filter(|v| !v.is_empty()).map(|v| v.to_string());
        let packaging = parts
            .get(4)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|| DEFAULT_PACKAGING.to_string());

        Ok(Self {
            group_id,
            artifact_id,
            version,
            classifier,
            packaging,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(ref v) = self.version {
            write!(f, ":{v}")?;
        }
        if let Some(ref c) = self.classifier {
            write!(f, ":{c}")?;
        }
        if self.packaging != DEFAULT_PACKAGING {
            write!(f, ":{}", self.packaging)?;
        }
        Ok(())
    }
}

fn non_empty(s: &str, field: &str, whole: &str) -> Result<String, JgoError> {
    if s.is_empty() {
        Err(JgoError::ParseError {
            message: format!("{field} must not be empty in coordinate '{whole}'"),
        })
    } else {
        Ok(s.to_string())
    }
}

/// A [`Coordinate`] pinned to a concrete version (no `LATEST`/`RELEASE`/range).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub packaging: String,
}

impl Artifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
            packaging: DEFAULT_PACKAGING.to_string(),
        }
    }

    pub fn from_coordinate(coord: &Coordinate, version: impl Into<String>) -> Self {
        Self {
            group_id: coord.group_id.clone(),
            artifact_id: coord.artifact_id.clone(),
            version: version.into(),
            classifier: coord.classifier.clone(),
            packaging: coord.packaging.clone(),
        }
    }

    /// Repository-relative path: `g/with/slashes/a/v/a-v[-classifier].packaging`.
    pub fn repository_path(&self) -> String {
        let group_path = self.group_id.replace('.', "/");
        let mut filename = format!("{}-{}", self.artifact_id, self.version);
        if let Some(ref c) = self.classifier {
            filename.push('-');
            filename.push_str(c);
        }
        filename.push('.');
        filename.push_str(&self.packaging);
        format!("{group_path}/{}/{}/{filename}", self.artifact_id, self.version)
    }

    pub fn jar_filename(&self) -> String {
        let mut filename = format!("{}-{}", self.artifact_id, self.version);
        if let Some(ref c) = self.classifier {
            filename.push('-');
            filename.push_str(c);
        }
        filename.push('.');
        filename.push_str(&self.packaging);
        filename
    }

    pub fn pom_filename(&self) -> String {
        format!("{}-{}.pom", self.artifact_id, self.version)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(ref c) = self.classifier {
            write!(f, ":{c}")?;
        }
        if self.packaging != DEFAULT_PACKAGING {
            write!(f, ":{}", self.packaging)?;
        }
        Ok(())
    }
}

/// Placement override carried by a `(c|cp|m|mp|p)` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    ClassPath,
    ModulePath,
}

/// One parsed `modifier` from a coordinate's `(...)` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Placement(Placement),
    /// `x` — this coordinate is itself a global exclusion pattern.
    GlobalExclusion,
    /// `x:G:A` — this coordinate carries a per-coordinate exclusion.
    Exclusion { group: String, artifact: String },
}

/// One `coord` term of an endpoint expression: a bare coordinate plus its
/// modifiers and the trailing `!` (raw / no dependency management) marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSpec {
    pub coordinate: Coordinate,
    pub modifiers: Vec<Modifier>,
    pub raw: bool,
}

impl CoordinateSpec {
    pub fn placement(&self) -> Option<Placement> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Placement(p) => Some(*p),
            _ => None,
        })
    }

    pub fn is_global_exclusion(&self) -> bool {
        self.modifiers.iter().any(|m| matches!(m, Modifier::GlobalExclusion))
    }

    pub fn exclusions(&self) -> Vec<(String, String)> {
        self.modifiers
            .iter()
            .filter_map(|m| match m {
                Modifier::Exclusion { group, artifact } => Some((group.clone(), artifact.clone())),
                _ => None,
            })
            .collect()
    }
}

/// A full endpoint expression: one or more coordinates joined by `+`, with
/// an optional `@MainClass` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub coordinates: Vec<CoordinateSpec>,
    pub main_class: Option<String>,
}

impl Endpoint {
    pub fn parse(s: &str) -> Result<Self, JgoError> {
        let (body, main_class) = match s.split_once('@') {
            Some((b, m)) => (b, Some(m.to_string())),
            None => (s, None),
        };
        if body.is_empty() {
            return Err(JgoError::ParseError {
                message: format!("endpoint '{s}' has no coordinates"),
            });
        }
        let coordinates = body
            .split('+')
            .map(parse_coord_term)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            coordinates,
            main_class,
        })
    }
}

fn parse_coord_term(term: &str) -> Result<CoordinateSpec, JgoError> {
    let mut rest = term;
    let raw = rest.ends_with('!');
    if raw {
        rest = &rest[..rest.len() - 1];
    }

    let (coord_part, modifiers) = match rest.find('(') {
        Some(open) => {
            let close = rest.rfind(')').ok_or_else(|| JgoError::ParseError {
                message: format!("unterminated modifier group in '{term}'"),
            })?;
            if close < open {
                return Err(JgoError::ParseError {
                    message: format!("malformed modifier group in '{term}'"),
                });
            }
            (&rest[..open], parse_modifiers(&rest[open + 1..close], term)?)
        }
        None => (rest, Vec::new()),
    };

    let coordinate = Coordinate::parse(coord_part)?;
    Ok(CoordinateSpec {
        coordinate,
        modifiers,
        raw,
    })
}

fn parse_modifiers(body: &str, term: &str) -> Result<Vec<Modifier>, JgoError> {
    body.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|m| parse_modifier(m, term))
        .collect()
}

fn parse_modifier(m: &str, term: &str) -> Result<Modifier, JgoError> {
    match m {
        "c" | "cp" => Ok(Modifier::Placement(Placement::ClassPath)),
        "m" | "mp" | "p" => Ok(Modifier::Placement(Placement::ModulePath)),
        "x" => Ok(Modifier::GlobalExclusion),
        _ if m.starts_with("x:") => {
            let fields: Vec<&str> = m[2..].split(':').collect();
            if fields.len() != 2 || fields[0].is_empty() || fields[1].is_empty() {
                return Err(JgoError::ParseError {
                    message: format!("malformed exclusion modifier '{m}' in '{term}' (expected x:G:A)"),
                });
            }
            Ok(Modifier::Exclusion {
                group: fields[0].to_string(),
                artifact: fields[1].to_string(),
            })
        }
        _ => Err(JgoError::ParseError {
            message: format!("unknown modifier '{m}' in '{term}'"),
        }),
    }
}

/// Does an exclusion pattern `(group, artifact)` (each possibly `*`) match
/// a concrete `(group_id, artifact_id)`?
pub fn exclusion_matches(pattern: &(String, String), group_id: &str, artifact_id: &str) -> bool {
    let (pg, pa) = pattern;
    (pg == "*" || pg == group_id) && (pa == "*" || pa == artifact_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_ga() {
        let c = Coordinate::parse("org.python:jython-standalone").unwrap();
        assert_eq!(c.group_id, "org.python");
        assert_eq!(c.artifact_id, "jython-standalone");
        assert_eq!(c.version, None);
        assert_eq!(c.packaging, "jar");
    }

    #[test]
    fn parses_full_gacp() {
        let c = Coordinate::parse("g:a:1.0:sources:jar").unwrap();
        assert_eq!(c.version.as_deref(), Some("1.0"));
        assert_eq!(c.classifier.as_deref(), Some("sources"));
        assert_eq!(c.packaging, "jar");
    }

    #[test]
    fn rejects_empty_group() {
        assert!(Coordinate::parse(":a:1.0").is_err());
    }

    #[test]
    fn endpoint_single_coord() {
        let e = Endpoint::parse("org.python:jython-standalone:2.7.4").unwrap();
        assert_eq!(e.coordinates.len(), 1);
        assert!(e.main_class.is_none());
    }

    #[test]
    fn endpoint_multi_coord_with_main_class() {
        let e = Endpoint::parse("g1:a1:1.0+g2:a2:2.0@com.example.Main").unwrap();
        assert_eq!(e.coordinates.len(), 2);
        assert_eq!(e.main_class.as_deref(), Some("com.example.Main"));
    }

    #[test]
    fn endpoint_with_exclusion_modifier() {
        let e = Endpoint::parse(
            "org.apache.httpcomponents:httpclient:4.5.14(x:commons-logging:commons-logging)",
        )
        .unwrap();
        let spec = &e.coordinates[0];
        assert_eq!(
            spec.exclusions(),
            vec![("commons-logging".to_string(), "commons-logging".to_string())]
        );
    }

    #[test]
    fn endpoint_with_placement_and_raw() {
        let e = Endpoint::parse("g:a:1.0(mp)!").unwrap();
        let spec = &e.coordinates[0];
        assert!(spec.raw);
        assert_eq!(spec.placement(), Some(Placement::ModulePath));
    }

    #[test]
    fn endpoint_global_exclusion_modifier() {
        let e = Endpoint::parse("g:a(x)").unwrap();
        assert!(e.coordinates[0].is_global_exclusion());
    }

    #[test]
    fn exclusion_matches_wildcards() {
        let pattern = ("*".to_string(), "commons-logging".to_string());
        assert!(exclusion_matches(&pattern, "anything", "commons-logging"));
        assert!(!exclusion_matches(&pattern, "anything", "other"));
    }

    #[test]
    fn rejects_unknown_modifier() {
        assert!(Endpoint::parse("g:a(bogus)").is_err());
    }

    #[test]
    fn display_roundtrips_bare_coordinate() {
        let c = Coordinate::parse("g:a:1.0").unwrap();
        assert_eq!(c.to_string(), "g:a:1.0");
    }
}
