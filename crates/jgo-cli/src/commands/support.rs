//! Shared plumbing for turning a [`Target`] into a [`ResolveSpec`] plus the
//! project-level lock path it resolves against (spec §6.3).

use std::path::PathBuf;

use jgo_core::project::{JavaSection, ProjectFile};
use jgo_ops::spec::ResolveSpec;
use jgo_util::errors::JgoError;

use crate::cli::Target;

const DEFAULT_PROJECT_FILE: &str = "jgo.toml";

/// Resolve a [`Target`] into a spec, its project-level lock path, and the
/// `[java]` section to launch with (default when the target is a bare
/// endpoint, since endpoints carry no JVM options of their own).
pub fn load(target: &Target) -> Result<(ResolveSpec, PathBuf, JavaSection), JgoError> {
    if let Some(endpoint) = &target.endpoint {
        let spec = ResolveSpec::from_endpoint(endpoint)?;
        let lock_path = endpoint_lock_path(&spec);
        return Ok((spec, lock_path, JavaSection::default()));
    }

    let project_path = target.project_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE));
    let project_file = ProjectFile::from_path(&project_path)?;
    let root_name = project_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("project")
        .to_string();
    let spec = ResolveSpec::from_project_file(&project_file, &root_name)?;
    let lock_path = jgo_ops::lock::lock_path_for(&project_path);
    Ok((spec, lock_path, project_file.java))
}

/// A bare endpoint names no project file to sit beside, so its project-level
/// lock lives under the shared cache root, keyed by root coordinate —
/// `<cache_root>/locks/<group>/<artifact>/<version>.lock`.
fn endpoint_lock_path(spec: &ResolveSpec) -> PathBuf {
    jgo_util::dirs::cache_root()
        .join("locks")
        .join(&spec.root.group_id)
        .join(&spec.root.artifact_id)
        .join(format!("{}.lock", spec.root.version))
}

/// Detect the running JDK's major version for Maven POM profile activation
/// (spec §4.2); falls back to a recent LTS when no JDK can be found, since
/// resolution itself should not hard-fail on toolchain absence.
pub fn detect_jdk_version() -> String {
    jgo_toolchain::locate::locate(None, 0, None)
        .map(|jdk| jdk.major_version.to_string())
        .unwrap_or_else(|| "17".to_string())
}
