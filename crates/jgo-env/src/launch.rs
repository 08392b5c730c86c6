//! Launch Planner (spec §4.7): combines JAR classification and bytecode
//! inspection to synthesize a deterministic JVM command line and infer the
//! entry point when none is given explicitly.

use std::path::PathBuf;

use jgo_core::project::JavaSection;
use jgo_util::errors::JgoError;

use crate::bytecode;
use crate::classify;
use crate::classpath;

/// `java.gc` preset → flag (spec §4.7). Anything outside the two named
/// presets is passed through verbatim as an explicit flag; `"none"` emits
/// nothing.
fn gc_flag(preset: &str) -> Option<String> {
    match preset {
        "G1" => Some("-XX:+UseG1GC".to_string()),
        "Z" => Some("-XX:+UseZGC".to_string()),
        "none" => None,
        other => Some(other.to_string()),
    }
}

/// What the synthesized command line ultimately launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    MainClass(String),
    Jar(PathBuf),
}

/// Caller-supplied overrides to main-class inference and the trailing
/// program arguments (spec §4.7 Inputs).
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub explicit_main_class: Option<String>,
    pub program_args: Vec<String>,
}

/// A fully synthesized launch: the minimum Java SE version every JAR on
/// the path requires, plus the JVM argument vector in spec-mandated
/// emission order.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub required_java_version: u16,
    pub entry_point: EntryPoint,
    pub args: Vec<String>,
}

/// Build a launch plan from a materialized environment's class-path and
/// module-path JARs.
pub fn plan(
    class_path_jars: &[PathBuf],
    module_path_jars: &[PathBuf],
    java: &JavaSection,
    options: &LaunchOptions,
) -> Result<LaunchPlan, JgoError> {
    let all_jars: Vec<PathBuf> = class_path_jars.iter().chain(module_path_jars).cloned().collect();
    let required_java_version = bytecode::required_java_version(&all_jars)?;
    let entry_point = resolve_entry_point(&all_jars, options)?;

    let mut args = Vec::new();

    if let Some(gc) = &java.gc {
        if let Some(flag) = gc_flag(gc) {
            args.push(flag);
        }
    }
    if let Some(min_heap) = &java.min_heap {
        args.push(format!("-Xms{min_heap}"));
    }
    let max_heap = java.max_heap.clone().unwrap_or_else(auto_max_heap);
    args.push(format!("-Xmx{max_heap}"));

    for (key, value) in java.flattened_properties() {
        args.push(format!("-D{key}={value}"));
    }

    if !class_path_jars.is_empty() {
        args.push("-cp".to_string());
        args.push(classpath::join_paths(class_path_jars));
    }
    if !module_path_jars.is_empty() {
        args.push("--module-path".to_string());
        args.push(classpath::join_paths(module_path_jars));
    }

    match &entry_point {
        EntryPoint::MainClass(class) => args.push(class.clone()),
        EntryPoint::Jar(jar) => {
            args.push("-jar".to_string());
            args.push(jar.to_string_lossy().to_string());
        }
    }

    args.extend(options.program_args.iter().cloned());

    Ok(LaunchPlan {
        required_java_version,
        entry_point,
        args,
    })
}

/// Auto-detect `-Xmx` from host RAM when `java.max_heap` is unset: a
/// quarter of total physical memory, mirroring the JVM's own default heap
/// sizing heuristic.
fn auto_max_heap() -> String {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    let total_bytes = system.total_memory();
    let quarter_mb = (total_bytes / 4 / (1024 * 1024)).max(256);
    format!("{quarter_mb}m")
}

fn resolve_entry_point(all_jars: &[PathBuf], options: &LaunchOptions) -> Result<EntryPoint, JgoError> {
    if let Some(explicit) = &options.explicit_main_class {
        return Ok(EntryPoint::MainClass(explicit.clone()));
    }

    let mut manifest_mains = Vec::new();
    for jar in all_jars {
        if let Some(main_class) = read_main_class_attribute(jar)? {
            manifest_mains.push(main_class);
        }
    }
    if manifest_mains.len() == 1 {
        return Ok(EntryPoint::MainClass(manifest_mains.remove(0)));
    }

    let candidates = bytecode::scan_main_classes(all_jars)?;
    match candidates.len() {
        1 => Ok(EntryPoint::MainClass(candidates.into_iter().next().unwrap())),
        0 => Err(JgoError::LaunchError {
            message: "no main class found: no JAR manifest declares Main-Class and no class \
                      defines public static void main(String[])"
                .to_string(),
        }),
        _ => Err(JgoError::LaunchError {
            message: format!("ambiguous main class, candidates: {}", candidates.join(", ")),
        }),
    }
}

fn read_main_class_attribute(jar_path: &std::path::Path) -> Result<Option<String>, JgoError> {
    let mut archive = classify::open_jar(jar_path)?;
    let Some(manifest) = classify::read_manifest(&mut archive) else {
        return Ok(None);
    };
    Ok(classify::manifest_main_attribute(&manifest, "Main-Class"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_presets_map_to_flags() {
        assert_eq!(gc_flag("G1"), Some("-XX:+UseG1GC".to_string()));
        assert_eq!(gc_flag("Z"), Some("-XX:+UseZGC".to_string()));
        assert_eq!(gc_flag("none"), None);
        assert_eq!(gc_flag("-XX:+UseParallelGC"), Some("-XX:+UseParallelGC".to_string()));
    }

    #[test]
    fn explicit_main_class_wins_without_touching_jars() {
        let options = LaunchOptions {
            explicit_main_class: Some("com.example.Main".to_string()),
            program_args: vec![],
        };
        let entry = resolve_entry_point(&[], &options).unwrap();
        assert_eq!(entry, EntryPoint::MainClass("com.example.Main".to_string()));
    }

    #[test]
    fn flag_order_matches_spec() {
        let java = JavaSection {
            gc: Some("G1".to_string()),
            min_heap: Some("256m".to_string()),
            max_heap: Some("1g".to_string()),
            properties: Default::default(),
        };
        let options = LaunchOptions {
            explicit_main_class: Some("com.example.Main".to_string()),
            program_args: vec!["--verbose".to_string()],
        };
        let cp = vec![PathBuf::from("/env/jars/a.jar")];
        let plan = plan(&cp, &[], &java, &options).unwrap();

        assert_eq!(
            plan.args,
            vec![
                "-XX:+UseG1GC".to_string(),
                "-Xms256m".to_string(),
                "-Xmx1g".to_string(),
                "-cp".to_string(),
                "/env/jars/a.jar".to_string(),
                "com.example.Main".to_string(),
                "--verbose".to_string(),
            ]
        );
    }
}
