//! POM file parsing and the effective-POM builder: parent inheritance,
//! property interpolation, profile activation, and BOM imports.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use jgo_util::errors::JgoError;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub profiles: Vec<Profile>,
    pub repositories: Vec<String>,
    pub modules: Vec<String>,
    pub licenses: Vec<PomLicense>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: Option<String>,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

/// A license declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// A `<profile>` block: conditional overlay of properties, dependencies,
/// dependency management, and repositories (spec §4.1 step 5).
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub id: String,
    pub activation: Activation,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub repositories: Vec<String>,
}

/// Supported `<activation>` conditions. An unrecognized activator is
/// represented as `None` (the profile is simply never auto-active).
#[derive(Debug, Clone, Default)]
pub struct Activation {
    pub jdk: Option<String>,
    pub os_name: Option<String>,
    pub os_family: Option<String>,
    pub os_arch: Option<String>,
    pub os_version: Option<String>,
    pub property_name: Option<String>,
    pub property_value: Option<String>,
    pub file_exists: Option<String>,
    pub file_missing: Option<String>,
}

/// Caller-provided platform facts used to evaluate `os.*`/`jdk` activators.
/// Injected rather than read globally so tests can simulate any platform.
#[derive(Debug, Clone)]
pub struct ActivationContext<'a> {
    pub os_name: &'a str,
    pub os_arch: &'a str,
    pub jdk_version: &'a str,
    pub properties: &'a BTreeMap<String, String>,
    pub file_exists_checker: &'a dyn Fn(&str) -> bool,
}

impl Activation {
    /// Is this profile active given `ctx`? Unrecognized/absent activation
    /// means "inactive" (spec: unknown activators are tolerated, profile
    /// stays inactive, caller logs a warning).
    pub fn is_active(&self, ctx: &ActivationContext) -> bool {
        if let Some(ref jdk_range) = self.jdk {
            if !version_range_contains(jdk_range, ctx.jdk_version) {
                return false;
            }
        }
        if let Some(ref name) = self.os_name {
            if !name.eq_ignore_ascii_case(ctx.os_name) {
                return false;
            }
        }
        if let Some(ref family) = self.os_family {
            if !os_family_matches(family, ctx.os_name) {
                return false;
            }
        }
        if let Some(ref arch) = self.os_arch {
            if !arch.eq_ignore_ascii_case(ctx.os_arch) {
                return false;
            }
        }
        if let Some(ref name) = self.property_name {
            match &self.property_value {
                Some(expected) => {
                    if ctx.properties.get(name).map(String::as_str) != Some(expected.as_str()) {
                        return false;
                    }
                }
                None => {
                    if !ctx.properties.contains_key(name) {
                        return false;
                    }
                }
            }
        }
        if let Some(ref path) = self.file_exists {
            if !(ctx.file_exists_checker)(path) {
                return false;
            }
        }
        if let Some(ref path) = self.file_missing {
            if (ctx.file_exists_checker)(path) {
                return false;
            }
        }
        self.jdk.is_some()
            || self.os_name.is_some()
            || self.os_family.is_some()
            || self.os_arch.is_some()
            || self.property_name.is_some()
            || self.file_exists.is_some()
            || self.file_missing.is_some()
    }
}

/// Evaluate a `<jdk>` activation value against the running JDK's version.
///
/// Accepts a bare version (`"1.8"`, `"17"`) — matched as a numeric-segment
/// prefix, per Maven's JDK activation semantics — or a Maven version range
/// (`"[11,)"`, `"[1.8,9)"`). Ranges are evaluated by comparing dot-separated
/// numeric segments left-to-right; a bound shorter than the compared version
/// is padded with zeros.
fn version_range_contains(range: &str, version: &str) -> bool {
    let range = range.trim();
    if !range.starts_with('[') && !range.starts_with('(') {
        return numeric_segments(version).starts_with(&numeric_segments(range)[..]);
    }

    let open_inclusive = range.starts_with('[');
    let close_inclusive = range.ends_with(']');
    let inner = &range[1..range.len().saturating_sub(1)];
    let v = numeric_segments(version);

    let (lower, upper) = match inner.split_once(',') {
        Some((l, u)) => (l.trim(), u.trim()),
        None => (inner.trim(), inner.trim()),
    };

    if !lower.is_empty() {
        let bound = numeric_segments(lower);
        let cmp = compare_numeric_segments(&v, &bound);
        let ok = if open_inclusive {
            cmp != std::cmp::Ordering::Less
        } else {
            cmp == std::cmp::Ordering::Greater
        };
        if !ok {
            return false;
        }
    }
    if !upper.is_empty() {
        let bound = numeric_segments(upper);
        let cmp = compare_numeric_segments(&v, &bound);
        let ok = if close_inclusive {
            cmp != std::cmp::Ordering::Greater
        } else {
            cmp == std::cmp::Ordering::Less
        };
        if !ok {
            return false;
        }
    }
    true
}

fn numeric_segments(version: &str) -> Vec<u64> {
    version
        .split(|c: char| c == '.' || c == '-' || c == '_')
        .map(|seg| seg.parse::<u64>().unwrap_or(0))
        .collect()
}

fn compare_numeric_segments(a: &[u64], b: &[u64]) -> std::cmp::Ordering {
    let max_len = a.len().max(b.len());
    for i in 0..max_len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        let ord = av.cmp(&bv);
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    std::cmp::Ordering::Equal
}

fn os_family_matches(family: &str, os_name: &str) -> bool {
    let os_lower = os_name.to_lowercase();
    match family.to_lowercase().as_str() {
        "windows" => os_lower.contains("windows"),
        "mac" | "macos" | "macosx" => os_lower.contains("mac"),
        "unix" => !os_lower.contains("windows"),
        other => os_lower.contains(other),
    }
}

/// Fetches parent POMs and BOM imports by coordinate, fully resolved
/// (effective) already. A trait so the effective-POM builder is testable
/// without network access.
pub trait PomLoader {
    fn load_effective(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Pom, JgoError>;
}

/// In-memory loader backed by a fixed map, for tests.
#[derive(Default)]
pub struct StaticPomLoader {
    pub poms: BTreeMap<(String, String, String), Pom>,
}

impl StaticPomLoader {
    pub fn insert(&mut self, group_id: &str, artifact_id: &str, version: &str, pom: Pom) {
        self.poms
            .insert((group_id.to_string(), artifact_id.to_string(), version.to_string()), pom);
    }
}

impl PomLoader for StaticPomLoader {
    fn load_effective(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Pom, JgoError> {
        self.poms
            .get(&(group_id.to_string(), artifact_id.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| JgoError::NotFound {
                message: format!("{group_id}:{artifact_id}:{version} (no POM registered)"),
            })
    }
}

const MAX_PARENT_DEPTH: usize = 50;
const MAX_INTERPOLATION_ITERATIONS: usize = 16;
const MAX_BOM_DEPTH: usize = 16;

/// Build the effective POM for `raw` per spec §4.1 steps 1-6: parent merge,
/// property seeding/interpolation, profile activation, then BOM inlining.
pub fn build_effective_pom(
    raw: Pom,
    loader: &dyn PomLoader,
    ctx: &ActivationContext,
) -> Result<Pom, JgoError> {
    let mut pom = merge_parents(raw, loader, 0, &mut Vec::new())?;
    seed_well_known_properties(&mut pom);
    interpolate_pom(&mut pom)?;
    apply_active_profiles(&mut pom, ctx);
    inline_bom_imports(&mut pom, loader, 0)?;
    Ok(pom)
}

fn merge_parents(
    mut pom: Pom,
    loader: &dyn PomLoader,
    depth: usize,
    seen: &mut Vec<(String, String, String)>,
) -> Result<Pom, JgoError> {
    let Some(parent_ref) = pom.parent.clone() else {
        return Ok(pom);
    };
    if depth >= MAX_PARENT_DEPTH {
        return Err(JgoError::ResolutionError {
            message: format!(
                "parent chain exceeds depth {MAX_PARENT_DEPTH} at {}:{}",
                pom.group_id.clone().unwrap_or_default(),
                pom.artifact_id.clone().unwrap_or_default()
            ),
        });
    }
    let key = (
        parent_ref.group_id.clone(),
        parent_ref.artifact_id.clone(),
        parent_ref.version.clone(),
    );
    if seen.contains(&key) {
        return Err(JgoError::ResolutionError {
            message: format!(
                "cycle in parent chain at {}:{}:{}",
                key.0, key.1, key.2
            ),
        });
    }
    seen.push(key);

    let parent = loader.load_effective(&parent_ref.group_id, &parent_ref.artifact_id, &parent_ref.version)?;
    pom.apply_parent(&parent);
    Ok(pom)
}

fn seed_well_known_properties(pom: &mut Pom) {
    if let Some(ref g) = pom.group_id.clone() {
        pom.properties.entry("project.groupId".to_string()).or_insert_with(|| g.clone());
    }
    if let Some(ref a) = pom.artifact_id.clone() {
        pom.properties.entry("project.artifactId".to_string()).or_insert_with(|| a.clone());
    }
    if let Some(ref v) = pom.version.clone() {
        pom.properties.entry("project.version".to_string()).or_insert_with(|| v.clone());
    }
    pom.properties.entry("project.basedir".to_string()).or_insert_default();
}

fn interpolate_pom(pom: &mut Pom) -> Result<(), JgoError> {
    for _ in 0..MAX_INTERPOLATION_ITERATIONS {
        let before = pom.properties.clone();
        let snapshot = pom.clone();
        for (_, v) in pom.properties.iter_mut() {
            *v = snapshot.interpolate(v);
        }
        if pom.properties == before {
            break;
        }
    }
    pom.resolve_properties();
    if let Some(ref mut g) = pom.group_id {
        *g = pom.properties.get("project.groupId").cloned().unwrap_or_else(|| g.clone());
    }
    Ok(())
}

fn apply_active_profiles(pom: &mut Pom, ctx: &ActivationContext) {
    let active: Vec<Profile> = pom
        .profiles
        .iter()
        .filter(|p| p.activation.is_active(ctx))
        .cloned()
        .collect();
    for profile in active {
        for (k, v) in profile.properties {
            pom.properties.insert(k, v);
        }
        for dep in profile.dependencies {
            pom.dependencies.retain(|d| !(d.group_id == dep.group_id && d.artifact_id == dep.artifact_id));
            pom.dependencies.push(dep);
        }
        for dm in profile.dependency_management {
            pom.dependency_management.retain(|d| !(d.group_id == dm.group_id && d.artifact_id == dm.artifact_id));
            pom.dependency_management.push(dm);
        }
        for repo in profile.repositories {
            if !pom.repositories.contains(&repo) {
                pom.repositories.push(repo);
            }
        }
    }
}

/// Replace every BOM-import entry in `pom.dependency_management` in-place
/// with the imported POM's own effective `dependencyManagement`, honoring
/// left-to-right declaration order (spec §4.1 step 6).
fn inline_bom_imports(pom: &mut Pom, loader: &dyn PomLoader, depth: usize) -> Result<(), JgoError> {
    if depth >= MAX_BOM_DEPTH {
        return Err(JgoError::ResolutionError {
            message: format!("BOM import chain exceeds depth {MAX_BOM_DEPTH}"),
        });
    }

    let mut result: Vec<PomDependency> = Vec::new();
    let mut seen_keys: std::collections::HashSet<(String, String, Option<String>, String)> =
        std::collections::HashSet::new();

    for entry in std::mem::take(&mut pom.dependency_management) {
        let is_bom = entry.scope.as_deref() == Some("import") && entry.type_.as_deref().unwrap_or("jar") == "pom";
        if !is_bom {
            let key = (
                entry.group_id.clone(),
                entry.artifact_id.clone(),
                entry.classifier.clone(),
                entry.type_.clone().unwrap_or_else(|| "jar".to_string()),
            );
            if seen_keys.insert(key) {
                result.push(entry);
            }
            continue;
        }

        let Some(ref version) = entry.version else {
            continue;
        };
        let mut imported = loader.load_effective(&entry.group_id, &entry.artifact_id, version)?;
        inline_bom_imports(&mut imported, loader, depth + 1)?;

        for imported_entry in imported.dependency_management {
            let key = (
                imported_entry.group_id.clone(),
                imported_entry.artifact_id.clone(),
                imported_entry.classifier.clone(),
                imported_entry.type_.clone().unwrap_or_else(|| "jar".to_string()),
            );
            // Earlier imports are not overridden by later ones.
            if seen_keys.insert(key) {
                result.push(imported_entry);
            }
        }
    }

    pom.dependency_management = result;
    Ok(())
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references in a string using POM properties
    /// and built-in project variables.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < MAX_INTERPOLATION_ITERATIONS {
            iterations += 1;
            let mut new = result.clone();
            while let Some(start) = new.find("${") {
                let Some(end) = new[start..].find('}') else {
                    break;
                };
                let key = &new[start + 2..start + end];
                let value = self.resolve_property(key);
                if let Some(val) = value {
                    new = format!("{}{}{}", &new[..start], val, &new[start + end + 1..]);
                } else {
                    break;
                }
            }
            if new == result {
                break;
            }
            result = new;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(|s| s.to_string()),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(|s| s.to_string()),
            "project.packaging" | "pom.packaging" => self.packaging.clone(),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate all property references in dependencies and dependency management.
    pub fn resolve_properties(&mut self) {
        let pom_snapshot = self.clone();
        for dep in &mut self.dependencies {
            dep.group_id = pom_snapshot.interpolate(&dep.group_id);
            dep.artifact_id = pom_snapshot.interpolate(&dep.artifact_id);
            if let Some(ref v) = dep.version {
                dep.version = Some(pom_snapshot.interpolate(v));
            }
        }
        for dep in &mut self.dependency_management {
            dep.group_id = pom_snapshot.interpolate(&dep.group_id);
            dep.artifact_id = pom_snapshot.interpolate(&dep.artifact_id);
            if let Some(ref v) = dep.version {
                dep.version = Some(pom_snapshot.interpolate(v));
            }
        }
    }

    /// Merge a parent POM's properties, scalar fields, dependencies, and
    /// dependency management into this POM. Child wins on every conflict
    /// (spec §4.1 step 2).
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties.entry(k.clone()).or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(|s| s.to_string());
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(|s| s.to_string());
        }
        if self.packaging.is_none() {
            self.packaging = parent.packaging.clone();
        }
        for dm in &parent.dependency_management {
            let dominated = self
                .dependency_management
                .iter()
                .any(|d| d.group_id == dm.group_id && d.artifact_id == dm.artifact_id);
            if !dominated {
                self.dependency_management.push(dm.clone());
            }
        }
        for pd in &parent.dependencies {
            let overridden = self
                .dependencies
                .iter()
                .any(|d| d.group_id == pd.group_id && d.artifact_id == pd.artifact_id);
            if !overridden {
                self.dependencies.push(pd.clone());
            }
        }
    }

    /// Look up a version from dependency management for a given group:artifact.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.dependency_management
            .iter()
            .find(|d| d.group_id == group_id && d.artifact_id == artifact_id)
            .and_then(|d| d.version.as_deref())
    }

    /// Return BOM imports from dependency management
    /// (entries with `scope = "import"` and `type = "pom"`).
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| {
                d.scope.as_deref() == Some("import") && d.type_.as_deref().unwrap_or("jar") == "pom"
            })
            .collect()
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> Result<Pom, JgoError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_exclusion: Option<PomExclusion> = None;
    let mut current_parent: Option<ParentRef> = None;
    let mut current_license: Option<PomLicense> = None;
    let mut current_profile: Option<Profile> = None;
    let mut in_dep_mgmt = false;
    let mut in_profile_dep_mgmt = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag.clone());
                text_buf.clear();

                let depth = path.len();
                let ctx = path_context(&path);

                match ctx.as_str() {
                    "project>dependencyManagement>dependencies>dependency"
                    | "project>dependencies>dependency" => {
                        if ctx.contains("dependencyManagement") {
                            in_dep_mgmt = true;
                        }
                        current_dep = Some(new_dep());
                    }
                    _ if ctx.ends_with("profile>dependencyManagement>dependencies>dependency")
                        || ctx.ends_with("profile>dependencies>dependency") =>
                    {
                        if ctx.contains("dependencyManagement") {
                            in_profile_dep_mgmt = true;
                        }
                        current_dep = Some(new_dep());
                    }
                    _ if ctx.ends_with(">exclusion") && current_dep.is_some() => {
                        current_exclusion = Some(PomExclusion {
                            group_id: String::new(),
                            artifact_id: None,
                        });
                    }
                    "project>parent" => {
                        current_parent = Some(ParentRef {
                            group_id: String::new(),
                            artifact_id: String::new(),
                            version: String::new(),
                            relative_path: None,
                        });
                    }
                    "project>licenses>license" => {
                        current_license = Some(PomLicense { name: None, url: None });
                    }
                    "project>profiles>profile" => {
                        current_profile = Some(Profile::default());
                    }
                    _ => {}
                }
                let _ = depth;
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(ref _e)) => {
                let ctx = path_context(&path);
                let depth = path.len();

                if depth == 3 && path.get(1).map(|s| s.as_str()) == Some("properties") {
                    let prop_name = path.last().cloned().unwrap_or_default();
                    pom.properties.insert(prop_name, text_buf.clone());
                }

                if let Some(ref mut profile) = current_profile {
                    handle_profile_fields(profile, &path, &ctx, &text_buf);
                }

                if let Some(ref mut dep) = current_dep {
                    if let Some(ref mut excl) = current_exclusion {
                        match path.last().map(|s| s.as_str()) {
                            Some("groupId") => excl.group_id = text_buf.clone(),
                            Some("artifactId") => excl.artifact_id = Some(text_buf.clone()),
                            _ => {}
                        }
                        if ctx.ends_with(">exclusion") {
                            if let Some(excl) = current_exclusion.take() {
                                dep.exclusions.push(excl);
                            }
                        }
                    } else {
                        match path.last().map(|s| s.as_str()) {
                            Some("groupId") if ctx.ends_with(">dependency>groupId") => dep.group_id = text_buf.clone(),
                            Some("artifactId") if ctx.ends_with(">dependency>artifactId") => {
                                dep.artifact_id = text_buf.clone()
                            }
                            Some("version") if ctx.ends_with(">dependency>version") => {
                                dep.version = Some(text_buf.clone())
                            }
                            Some("scope") if ctx.ends_with(">dependency>scope") => dep.scope = Some(text_buf.clone()),
                            Some("optional") if ctx.ends_with(">dependency>optional") => {
                                dep.optional = text_buf.trim() == "true"
                            }
                            Some("classifier") if ctx.ends_with(">dependency>classifier") => {
                                dep.classifier = Some(text_buf.clone())
                            }
                            Some("type") if ctx.ends_with(">dependency>type") => dep.type_ = Some(text_buf.clone()),
                            _ => {}
                        }
                    }

                    let is_profile_dep = ctx.ends_with("profile>dependencies>dependency")
                        || ctx.ends_with("profile>dependencyManagement>dependencies>dependency");
                    let is_top_dep = ctx == "project>dependencies>dependency"
                        || ctx == "project>dependencyManagement>dependencies>dependency";

                    if is_top_dep {
                        if let Some(dep) = current_dep.take() {
                            if in_dep_mgmt {
                                pom.dependency_management.push(dep);
                            } else {
                                pom.dependencies.push(dep);
                            }
                        }
                        in_dep_mgmt = false;
                    } else if is_profile_dep {
                        if let (Some(dep), Some(ref mut profile)) = (current_dep.take(), current_profile.as_mut()) {
                            if in_profile_dep_mgmt {
                                profile.dependency_management.push(dep);
                            } else {
                                profile.dependencies.push(dep);
                            }
                        }
                        in_profile_dep_mgmt = false;
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") if ctx == "project>parent>groupId" => parent.group_id = text_buf.clone(),
                        Some("artifactId") if ctx == "project>parent>artifactId" => {
                            parent.artifact_id = text_buf.clone()
                        }
                        Some("version") if ctx == "project>parent>version" => parent.version = text_buf.clone(),
                        Some("relativePath") if ctx == "project>parent>relativePath" => {
                            parent.relative_path = Some(text_buf.clone())
                        }
                        _ => {}
                    }
                    if ctx == "project>parent" {
                        pom.parent = current_parent.take();
                    }
                }

                if let Some(ref mut license) = current_license {
                    match path.last().map(|s| s.as_str()) {
                        Some("name") if ctx == "project>licenses>license>name" => license.name = Some(text_buf.clone()),
                        Some("url") if ctx == "project>licenses>license>url" => license.url = Some(text_buf.clone()),
                        _ => {}
                    }
                    if ctx == "project>licenses>license" {
                        if let Some(lic) = current_license.take() {
                            pom.licenses.push(lic);
                        }
                    }
                }

                if ctx == "project>profiles>profile" {
                    if let Some(profile) = current_profile.take() {
                        pom.profiles.push(profile);
                    }
                }

                if depth == 2 {
                    match path.last().map(|s| s.as_str()) {
                        Some("groupId") => pom.group_id = Some(text_buf.clone()),
                        Some("artifactId") => pom.artifact_id = Some(text_buf.clone()),
                        Some("version") => pom.version = Some(text_buf.clone()),
                        Some("packaging") => pom.packaging = Some(text_buf.clone()),
                        Some("name") => pom.name = Some(text_buf.clone()),
                        Some("description") => pom.description = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                if ctx == "project>modules>module" {
                    pom.modules.push(text_buf.clone());
                }
                if ctx == "project>repositories>repository>url" {
                    pom.repositories.push(text_buf.clone());
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(JgoError::ParseError {
                    message: format!("failed to parse POM XML: {e}"),
                });
            }
            _ => {}
        }
    }

    Ok(pom)
}

fn new_dep() -> PomDependency {
    PomDependency {
        group_id: String::new(),
        artifact_id: String::new(),
        version: None,
        scope: None,
        optional: false,
        classifier: None,
        type_: None,
        exclusions: Vec::new(),
    }
}

fn handle_profile_fields(profile: &mut Profile, path: &[String], ctx: &str, text: &str) {
    if ctx.ends_with("profile>id") {
        profile.id = text.to_string();
    } else if ctx.ends_with("activation>jdk") {
        profile.activation.jdk = Some(text.to_string());
    } else if ctx.ends_with("activation>os>name") {
        profile.activation.os_name = Some(text.to_string());
    } else if ctx.ends_with("activation>os>family") {
        profile.activation.os_family = Some(text.to_string());
    } else if ctx.ends_with("activation>os>arch") {
        profile.activation.os_arch = Some(text.to_string());
    } else if ctx.ends_with("activation>os>version") {
        profile.activation.os_version = Some(text.to_string());
    } else if ctx.ends_with("activation>property>name") {
        profile.activation.property_name = Some(text.to_string());
    } else if ctx.ends_with("activation>property>value") {
        profile.activation.property_value = Some(text.to_string());
    } else if ctx.ends_with("activation>file>exists") {
        profile.activation.file_exists = Some(text.to_string());
    } else if ctx.ends_with("activation>file>missing") {
        profile.activation.file_missing = Some(text.to_string());
    } else if path.len() >= 2 && path[path.len() - 2] == "properties" && ctx.contains("profile>properties>") {
        let prop_name = path.last().cloned().unwrap_or_default();
        profile.properties.insert(prop_name, text.to_string());
    } else if ctx.ends_with("repositories>repository>url") {
        profile.repositories.push(text.to_string());
    }
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}
