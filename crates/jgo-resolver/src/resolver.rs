//! Core dependency resolution algorithm: layered-BFS nearest-wins mediation,
//! scope propagation, exclusions, optional-dependency depth gating, and
//! dependency-management (BOM) precedence.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use jgo_core::dependency::{Dependency, DependencyScope, Exclusion};
use jgo_maven::cache::LocalCache;
use jgo_maven::metadata;
use jgo_maven::pom::{build_effective_pom, ActivationContext, Pom, PomLoader};
use jgo_maven::repository::MavenRepository;
use jgo_util::errors::JgoError;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{DepEdge, DependencyGraph, ResolvedNode};
use crate::version::{MavenVersion, VersionRange};

/// Filters controlling which transitive edges a resolution follows
/// (spec §3 Environment Spec, §4.3).
#[derive(Debug, Clone, Default)]
pub struct ResolutionFilters {
    /// Pull in `test`-scoped dependencies (normally excluded from a launch environment).
    pub include_test: bool,
    /// Follow optional dependencies at all.
    pub include_optional: bool,
    /// Optional edges are only followed when declared at a depth strictly
    /// less than this value. `0` (the default) means never.
    pub optional_depth: usize,
    /// Downgrade unresolvable mediation conflicts to a recorded
    /// [`VersionConflict`] instead of a hard error.
    pub lenient: bool,
}

/// The output of a resolution run.
pub struct ResolutionResult {
    pub graph: DependencyGraph,
    pub conflicts: ConflictReport,
    /// Flat, sorted list of every resolved artifact (lockfile/environment input).
    pub artifacts: Vec<ResolvedArtifact>,
}

/// One resolved artifact: concrete coordinates plus the scope and
/// exclusions it carries into environment materialization.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub packaging: String,
    pub scope: DependencyScope,
    pub source: String,
    pub exclusions: Vec<Exclusion>,
}

/// Entry in the BFS queue.
struct QueueEntry {
    group: String,
    artifact: String,
    version: String,
    classifier: Option<String>,
    packaging: String,
    scope: DependencyScope,
    optional: bool,
    depth: usize,
    parent_key: Option<String>,
    exclusions: Vec<Exclusion>,
    /// Dependency-management layers inherited from ancestors, outermost
    /// (highest precedence) first. A node's own effective POM is appended
    /// as the new innermost layer when its children are enqueued.
    dep_mgmt_stack: Vec<Arc<Pom>>,
}

/// Resolve `direct_dependencies` into a full dependency graph (spec §4.3).
///
/// `root_label` names the project itself, purely for the graph's root node;
/// no POM is fetched for it. Runs on a tokio runtime: POMs for each BFS
/// depth level are prefetched concurrently (bounded by `min(8, cpus*2)`,
/// spec §5), then each level is mediated and expanded synchronously.
pub async fn resolve(
    root_label: (&str, &str, &str),
    direct_dependencies: &[Dependency],
    global_exclusions: &[Exclusion],
    repos: &[MavenRepository],
    cache: &LocalCache,
    client: &Client,
    filters: &ResolutionFilters,
    jdk_version: &str,
) -> miette::Result<ResolutionResult> {
    let mut graph = DependencyGraph::new();
    let mut conflicts = ConflictReport::new();

    let (root_group, root_artifact, root_version) = root_label;
    let root = graph.add_node(ResolvedNode {
        group: root_group.to_string(),
        artifact: root_artifact.to_string(),
        version: root_version.to_string(),
        scope: DependencyScope::Compile.as_str().to_string(),
    });
    graph.set_root(root);

    let loader = NetworkPomLoader {
        client,
        repos,
        cache,
        jdk_version,
    };

    let mut queue: VecDeque<QueueEntry> = VecDeque::new();
    for dep in direct_dependencies {
        if dep.scope == DependencyScope::Test && !filters.include_test {
            continue;
        }
        if dep.optional && !(filters.include_optional && filters.optional_depth > 0) {
            continue;
        }
        let version_spec = dep.coordinate.version.clone().ok_or_else(|| JgoError::ResolutionError {
            message: format!(
                "{}:{} has no version and there is no dependency management to supply one",
                dep.coordinate.group_id, dep.coordinate.artifact_id
            ),
        })?;
        let version = resolve_version(
            client,
            repos,
            cache,
            &dep.coordinate.group_id,
            &dep.coordinate.artifact_id,
            &version_spec,
        )
        .await?;

        let mut exclusions = global_exclusions.to_vec();
        exclusions.extend(dep.exclusions.clone());

        queue.push_back(QueueEntry {
            group: dep.coordinate.group_id.clone(),
            artifact: dep.coordinate.artifact_id.clone(),
            version,
            classifier: dep.coordinate.classifier.clone(),
            packaging: dep.coordinate.packaging.clone(),
            scope: dep.scope,
            optional: false,
            depth: 0,
            parent_key: None,
            exclusions,
            dep_mgmt_stack: Vec::new(),
        });
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrent_fetches()));
    let mut resolved: HashMap<(String, String), (String, usize)> = HashMap::new();
    let mut artifacts: Vec<ResolvedArtifact> = Vec::new();

    while !queue.is_empty() {
        let current_depth = queue.front().map(|e| e.depth).unwrap_or(0);
        let mut level: Vec<QueueEntry> = Vec::new();
        while queue.front().is_some_and(|e| e.depth == current_depth) {
            level.push(queue.pop_front().unwrap());
        }

        let mut to_fetch: Vec<(String, String, String)> = level
            .iter()
            .map(|e| (e.group.clone(), e.artifact.clone(), e.version.clone()))
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|(g, a, v)| cache.get_pom(g, a, v).is_none())
            .collect();
        to_fetch.sort();

        if !to_fetch.is_empty() {
            let mut joins = JoinSet::new();
            for (group, artifact, version) in to_fetch {
                let client = client.clone();
                let repos = repos.to_vec();
                let cache = cache.clone();
                let sem = semaphore.clone();
                joins.spawn(async move {
                    let _permit = sem.acquire().await;
                    let _ = fetch_raw_pom(&client, &repos, &cache, &group, &artifact, &version).await;
                });
            }
            while joins.join_next().await.is_some() {}
        }

        for entry in level {
            let key = (entry.group.clone(), entry.artifact.clone());

            if let Some((existing_version, existing_depth)) = resolved.get(&key) {
                if entry.version != *existing_version {
                    let conflict = VersionConflict {
                        group: entry.group.clone(),
                        artifact: entry.artifact.clone(),
                        requested: entry.version.clone(),
                        resolved: existing_version.clone(),
                        reason: format!("nearest wins (depth {existing_depth} vs {})", entry.depth),
                    };
                    if filters.lenient {
                        conflicts.add(conflict);
                    } else {
                        return Err(JgoError::Conflict {
                            message: conflict.to_string(),
                        }
                        .into());
                    }
                }
                continue;
            }
            resolved.insert(key.clone(), (entry.version.clone(), entry.depth));

            let node = graph.add_node(ResolvedNode {
                group: entry.group.clone(),
                artifact: entry.artifact.clone(),
                version: entry.version.clone(),
                scope: entry.scope.as_str().to_string(),
            });
            let parent_idx = entry
                .parent_key
                .as_ref()
                .and_then(|k| graph.find(k))
                .unwrap_or(root);
            graph.add_edge(
                parent_idx,
                node,
                DepEdge {
                    scope: entry.scope.as_str().to_string(),
                    optional: entry.optional,
                },
            );

            let raw = match fetch_raw_pom(client, repos, cache, &entry.group, &entry.artifact, &entry.version).await {
                Ok(pom) => pom,
                Err(e) if filters.lenient => {
                    tracing::warn!("skipping {}:{}:{}: {e}", entry.group, entry.artifact, entry.version);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let empty_props = BTreeMap::new();
            let file_checker = |_: &str| false;
            let ctx = ActivationContext {
                os_name: std::env::consts::OS,
                os_arch: std::env::consts::ARCH,
                jdk_version,
                properties: &empty_props,
                file_exists_checker: &file_checker,
            };
            let effective = build_effective_pom(raw, &loader, &ctx)?;

            let source = repos.first().map(|r| r.url.clone()).unwrap_or_default();
            artifacts.push(ResolvedArtifact {
                group_id: entry.group.clone(),
                artifact_id: entry.artifact.clone(),
                version: entry.version.clone(),
                classifier: entry.classifier.clone(),
                packaging: entry.packaging.clone(),
                scope: entry.scope,
                source,
                exclusions: entry.exclusions.clone(),
            });

            for dep in &effective.dependencies {
                if dep.optional && !(filters.include_optional && entry.depth < filters.optional_depth) {
                    continue;
                }
                let dep_scope = DependencyScope::parse(dep.scope.as_deref().unwrap_or("compile"))
                    .unwrap_or(DependencyScope::Compile);
                let Some(child_scope) = propagate_scope(entry.scope, dep_scope) else {
                    continue;
                };
                if child_scope == DependencyScope::Test && !filters.include_test {
                    continue;
                }

                if global_exclusions.iter().any(|e| e.matches(&dep.group_id, &dep.artifact_id))
                    || entry.exclusions.iter().any(|e| e.matches(&dep.group_id, &dep.artifact_id))
                {
                    continue;
                }

                let version_spec = managed_version_from_stack(&entry.dep_mgmt_stack, &dep.group_id, &dep.artifact_id)
                    .or_else(|| effective.managed_version(&dep.group_id, &dep.artifact_id).map(str::to_string))
                    .or_else(|| dep.version.clone());

                let Some(version_spec) = version_spec else {
                    tracing::warn!(
                        "{}:{} (declared by {}:{}:{}) has no version and no managing BOM; skipping",
                        dep.group_id,
                        dep.artifact_id,
                        entry.group,
                        entry.artifact,
                        entry.version
                    );
                    continue;
                };

                let version =
                    resolve_version(client, repos, cache, &dep.group_id, &dep.artifact_id, &version_spec).await?;

                let mut child_exclusions = entry.exclusions.clone();
                for excl in &dep.exclusions {
                    child_exclusions.push(Exclusion::new(
                        excl.group_id.clone(),
                        excl.artifact_id.clone().unwrap_or_else(|| "*".to_string()),
                    ));
                }

                let mut child_stack = entry.dep_mgmt_stack.clone();
                child_stack.push(Arc::new(effective.clone()));

                queue.push_back(QueueEntry {
                    group: dep.group_id.clone(),
                    artifact: dep.artifact_id.clone(),
                    version,
                    classifier: dep.classifier.clone(),
                    packaging: dep.type_.clone().unwrap_or_else(|| "jar".to_string()),
                    scope: child_scope,
                    optional: dep.optional,
                    depth: entry.depth + 1,
                    parent_key: Some(format!("{}:{}", entry.group, entry.artifact)),
                    exclusions: child_exclusions,
                    dep_mgmt_stack: child_stack,
                });
            }
        }
    }

    artifacts.sort_by(|a, b| (&a.group_id, &a.artifact_id).cmp(&(&b.group_id, &b.artifact_id)));

    Ok(ResolutionResult {
        graph,
        conflicts,
        artifacts,
    })
}

fn max_concurrent_fetches() -> usize {
    std::thread::available_parallelism()
        .map(|n| (n.get() * 2).min(8))
        .unwrap_or(4)
}

/// Maven scope propagation (spec §4.3): `provided`/`test`/`system` are not
/// transitive — a dependency declared with one of those scopes contributes
/// nothing beyond itself. Everything else inherits the carrying node's
/// scope, except a `compile` parent preserves the dependency's own
/// compile/runtime distinction.
fn propagate_scope(parent: DependencyScope, dep: DependencyScope) -> Option<DependencyScope> {
    use DependencyScope::*;
    match dep {
        Test | Provided | System => return None,
        Compile | Runtime => {}
    }
    match parent {
        Compile => Some(dep),
        Runtime => Some(Runtime),
        Test => Some(Test),
        Provided => Some(Provided),
        System => None,
    }
}

/// Look up a managed version by walking the dep-mgmt stack outermost-first;
/// the first (most ancestral) match wins (spec §4.1 step 6, §4.3).
fn managed_version_from_stack(stack: &[Arc<Pom>], group_id: &str, artifact_id: &str) -> Option<String> {
    stack
        .iter()
        .find_map(|pom| pom.managed_version(group_id, artifact_id).map(str::to_string))
}

/// Resolve a version spec (`LATEST`, `RELEASE`, a range, or a concrete
/// version) against cross-repository `maven-metadata.xml` (spec §4.2).
///
/// jgo compares candidate versions across every configured repository
/// rather than stopping at the first repo that publishes metadata — a
/// deliberate deviation from plain Maven, which resolves per-repository.
async fn resolve_version(
    client: &Client,
    repos: &[MavenRepository],
    cache: &LocalCache,
    group_id: &str,
    artifact_id: &str,
    spec: &str,
) -> Result<String, JgoError> {
    let is_range = VersionRange::parse(spec).is_some();
    if spec != "LATEST" && spec != "RELEASE" && !is_range {
        return Ok(spec.to_string());
    }

    let force = jgo_util::env::force_update();
    let mut all_versions: Vec<String> = Vec::new();
    for repo in repos {
        let xml = cache
            .fetch_metadata(client, repo, group_id, artifact_id, force)
            .await
            .map_err(|e| JgoError::Network { message: e.to_string() })?;
        if let Some(xml) = xml {
            if let Ok(meta) = metadata::parse_metadata(&xml) {
                all_versions.extend(meta.versions);
            }
        }
    }

    let candidates: Vec<MavenVersion> = match spec {
        "LATEST" => all_versions.iter().map(|v| MavenVersion::parse(v)).collect(),
        "RELEASE" => all_versions
            .iter()
            .filter(|v| !v.ends_with("-SNAPSHOT"))
            .map(|v| MavenVersion::parse(v))
            .collect(),
        _ => {
            let range = VersionRange::parse(spec).expect("checked above");
            all_versions
                .iter()
                .map(|v| MavenVersion::parse(v))
                .filter(|v| range.contains(v))
                .collect()
        }
    };

    candidates
        .into_iter()
        .max()
        .map(|v| v.original)
        .ok_or_else(|| JgoError::NotFound {
            message: format!("no version of {group_id}:{artifact_id} satisfies '{spec}' across configured repositories"),
        })
}

/// Fetch a raw (pre-effective) POM, cache first then each repo in
/// declaration order (spec §4.4).
async fn fetch_raw_pom(
    client: &Client,
    repos: &[MavenRepository],
    cache: &LocalCache,
    group_id: &str,
    artifact_id: &str,
    version: &str,
) -> Result<Pom, JgoError> {
    if !jgo_util::env::no_cache() {
        if let Some(pom) = cache.get_pom(group_id, artifact_id, version) {
            return Ok(pom);
        }
    }
    if jgo_util::env::offline() {
        return Err(JgoError::NotAvailableOffline {
            message: format!("{group_id}:{artifact_id}:{version}"),
        });
    }
    for repo in repos {
        match cache.fetch_pom(client, repo, group_id, artifact_id, version).await {
            Ok(Some(pom)) => return Ok(pom),
            Ok(None) => continue,
            Err(e) => return Err(JgoError::Network { message: e.to_string() }),
        }
    }
    Err(JgoError::NotFound {
        message: format!("POM not found for {group_id}:{artifact_id}:{version} in any configured repository"),
    })
}

/// Production [`PomLoader`]: fetches parent/BOM POMs over the network (or
/// repo cache) on demand and recursively builds their effective form.
///
/// `PomLoader::load_effective` is synchronous so the builder stays testable
/// without network access; this impl bridges to async I/O with
/// `block_in_place` + `Handle::block_on`, which requires the resolver to
/// run on a multi-threaded tokio runtime (the CLI entry point's default).
struct NetworkPomLoader<'a> {
    client: &'a Client,
    repos: &'a [MavenRepository],
    cache: &'a LocalCache,
    jdk_version: &'a str,
}

impl<'a> PomLoader for NetworkPomLoader<'a> {
    fn load_effective(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Pom, JgoError> {
        let raw = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(fetch_raw_pom(
                self.client,
                self.repos,
                self.cache,
                group_id,
                artifact_id,
                version,
            ))
        })?;
        let empty_props = BTreeMap::new();
        let file_checker = |_: &str| false;
        let ctx = ActivationContext {
            os_name: std::env::consts::OS,
            os_arch: std::env::consts::ARCH,
            jdk_version: self.jdk_version,
            properties: &empty_props,
            file_exists_checker: &file_checker,
        };
        build_effective_pom(raw, self, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jgo_core::coordinate::Coordinate;

    #[test]
    fn scope_propagation_compile_preserves_dep_scope() {
        assert_eq!(
            propagate_scope(DependencyScope::Compile, DependencyScope::Compile),
            Some(DependencyScope::Compile)
        );
        assert_eq!(
            propagate_scope(DependencyScope::Compile, DependencyScope::Runtime),
            Some(DependencyScope::Runtime)
        );
    }

    #[test]
    fn scope_propagation_runtime_parent_forces_runtime() {
        assert_eq!(
            propagate_scope(DependencyScope::Runtime, DependencyScope::Compile),
            Some(DependencyScope::Runtime)
        );
    }

    #[test]
    fn scope_propagation_test_and_provided_are_not_transitive() {
        assert_eq!(propagate_scope(DependencyScope::Compile, DependencyScope::Test), None);
        assert_eq!(propagate_scope(DependencyScope::Compile, DependencyScope::Provided), None);
        assert_eq!(propagate_scope(DependencyScope::Compile, DependencyScope::System), None);
    }

    #[test]
    fn scope_propagation_test_parent_tags_descendants_test() {
        assert_eq!(
            propagate_scope(DependencyScope::Test, DependencyScope::Compile),
            Some(DependencyScope::Test)
        );
    }

    #[test]
    fn scope_propagation_system_parent_is_a_dead_end() {
        assert_eq!(propagate_scope(DependencyScope::System, DependencyScope::Compile), None);
    }

    #[test]
    fn managed_version_outer_layer_wins() {
        let outer = Arc::new(Pom {
            dependency_management: vec![jgo_maven::pom::PomDependency {
                group_id: "com.example".into(),
                artifact_id: "shared".into(),
                version: Some("1.0-outer".into()),
                scope: None,
                optional: false,
                classifier: None,
                type_: None,
                exclusions: vec![],
            }],
            ..Default::default()
        });
        let inner = Arc::new(Pom {
            dependency_management: vec![jgo_maven::pom::PomDependency {
                group_id: "com.example".into(),
                artifact_id: "shared".into(),
                version: Some("2.0-inner".into()),
                scope: None,
                optional: false,
                classifier: None,
                type_: None,
                exclusions: vec![],
            }],
            ..Default::default()
        });
        let stack = vec![outer, inner];
        assert_eq!(
            managed_version_from_stack(&stack, "com.example", "shared"),
            Some("1.0-outer".to_string())
        );
    }

    fn dep(group: &str, artifact: &str, version: &str) -> Dependency {
        Dependency::new(Coordinate {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            version: Some(version.to_string()),
            classifier: None,
            packaging: "jar".to_string(),
        })
    }

    #[tokio::test]
    async fn resolves_transitive_dependency_entirely_from_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = LocalCache::at(tmp.path().to_path_buf());

        cache
            .put_pom(
                "com.example",
                "a",
                "1.0",
                r#"<project>
                    <groupId>com.example</groupId><artifactId>a</artifactId><version>1.0</version>
                    <dependencies>
                        <dependency>
                            <groupId>com.example</groupId><artifactId>b</artifactId><version>1.0</version>
                        </dependency>
                    </dependencies>
                </project>"#,
            )
            .unwrap();
        cache
            .put_pom(
                "com.example",
                "b",
                "1.0",
                r#"<project>
                    <groupId>com.example</groupId><artifactId>b</artifactId><version>1.0</version>
                </project>"#,
            )
            .unwrap();

        let direct = vec![dep("com.example", "a", "1.0")];
        let result = resolve(
            ("demo", "demo", "0.1.0"),
            &direct,
            &[],
            &[],
            &cache,
            &reqwest::Client::new(),
            &ResolutionFilters::default(),
            "21",
        )
        .await
        .unwrap();

        assert_eq!(result.graph.len(), 2);
        assert!(result.artifacts.iter().any(|a| a.artifact_id == "a"));
        assert!(result.artifacts.iter().any(|a| a.artifact_id == "b"));
        assert!(result.conflicts.is_empty());
    }

    #[tokio::test]
    async fn exclusion_on_direct_dependency_drops_transitive_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = LocalCache::at(tmp.path().to_path_buf());

        cache
            .put_pom(
                "com.example",
                "x",
                "1.0",
                r#"<project>
                    <groupId>com.example</groupId><artifactId>x</artifactId><version>1.0</version>
                    <dependencies>
                        <dependency>
                            <groupId>com.example</groupId><artifactId>y</artifactId><version>1.0</version>
                        </dependency>
                    </dependencies>
                </project>"#,
            )
            .unwrap();
        cache
            .put_pom(
                "com.example",
                "y",
                "1.0",
                r#"<project><groupId>com.example</groupId><artifactId>y</artifactId><version>1.0</version></project>"#,
            )
            .unwrap();

        let mut x = dep("com.example", "x", "1.0");
        x.exclusions.push(Exclusion::new("com.example", "y"));
        let direct = vec![x];

        let result = resolve(
            ("demo", "demo", "0.1.0"),
            &direct,
            &[],
            &[],
            &cache,
            &reqwest::Client::new(),
            &ResolutionFilters::default(),
            "21",
        )
        .await
        .unwrap();

        assert!(result.artifacts.iter().any(|a| a.artifact_id == "x"));
        assert!(!result.artifacts.iter().any(|a| a.artifact_id == "y"));
    }

    #[tokio::test]
    async fn test_scope_dependency_is_skipped_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = LocalCache::at(tmp.path().to_path_buf());
        let mut d = dep("com.example", "junit-like", "1.0");
        d.scope = DependencyScope::Test;
        let direct = vec![d];

        let result = resolve(
            ("demo", "demo", "0.1.0"),
            &direct,
            &[],
            &[],
            &cache,
            &reqwest::Client::new(),
            &ResolutionFilters::default(),
            "21",
        )
        .await
        .unwrap();

        assert!(result.artifacts.is_empty());
    }
}
