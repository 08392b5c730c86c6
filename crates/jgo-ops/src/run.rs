//! The `run` operation: sync the environment, plan the launch, locate a
//! satisfying JDK, and spawn `java` with inherited stdio (spec §4.7).

use std::path::Path;
use std::process::ExitStatus;

use jgo_core::project::JavaSection;
use jgo_env::launch::{self, LaunchOptions};
use jgo_toolchain::locate;
use jgo_util::errors::JgoError;
use jgo_util::process::CommandBuilder;
use jgo_util::progress;

use crate::spec::ResolveSpec;
use crate::sync;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    spec: &ResolveSpec,
    lock_path: &Path,
    java: &JavaSection,
    explicit_main_class: Option<String>,
    program_args: Vec<String>,
    explicit_java_home: Option<&Path>,
    java_vendor: Option<&str>,
    jdk_version: &str,
    verify: bool,
) -> Result<ExitStatus, JgoError> {
    let env = sync::sync(spec, lock_path, jdk_version, verify).await?;

    let options = LaunchOptions {
        explicit_main_class: explicit_main_class.or_else(|| spec.main_class.clone()),
        program_args,
    };
    let plan = launch::plan(&env.class_path_jars, &env.module_path_jars, java, &options)?;

    let jdk = locate::locate(explicit_java_home, plan.required_java_version, java_vendor).ok_or_else(|| {
        JgoError::LaunchError {
            message: format!(
                "no installed JDK satisfies Java SE {} (vendor: {})",
                plan.required_java_version,
                java_vendor.unwrap_or("any")
            ),
        }
    })?;

    let java_bin = jdk.home.join("bin").join(if cfg!(windows) { "java.exe" } else { "java" });
    progress::status("Running", &format!("{} ({})", plan.args.join(" "), jdk));

    CommandBuilder::new(java_bin.to_string_lossy().into_owned())
        .args(plan.args.clone())
        .spawn_and_wait()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_binary_name_is_platform_specific() {
        let home = Path::new("/opt/jdk");
        let bin = home.join("bin").join(if cfg!(windows) { "java.exe" } else { "java" });
        assert!(bin.ends_with(if cfg!(windows) { "java.exe" } else { "java" }));
    }
}
