//! Platform classpath and module-path string joining (spec §4.7 JVM flag
//! synthesis).

use std::path::PathBuf;

/// Join JAR paths into a single string suitable for `-cp`/`--module-path`,
/// using the platform path-list separator (`;` on Windows, `:` elsewhere).
pub fn join_paths(jars: &[PathBuf]) -> String {
    jars.iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(path_list_separator())
}

fn path_list_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_platform_separator() {
        let jars = vec![PathBuf::from("/a/b.jar"), PathBuf::from("/c/d.jar")];
        let s = join_paths(&jars);
        assert!(s.contains("/a/b.jar"));
        assert!(s.contains("/c/d.jar"));
    }

    #[test]
    fn empty_list_is_empty_string() {
        assert_eq!(join_paths(&[]), "");
    }
}
