use std::path::PathBuf;

/// Root directory under which content-addressed environment directories
/// are created (spec §6.4 `<cache_root>`). Honors `JGO_CACHE_DIR`; falls
/// back to the platform cache directory plus `jgo`.
pub fn cache_root() -> PathBuf {
    if let Ok(dir) = std::env::var("JGO_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    platform_cache_dir().join("jgo")
}

/// Root directory of the per-repository on-disk artifact cache (spec §6.4
/// `<repo_cache>`), mirroring Maven's `group/artifact/version` layout.
/// Honors `JGO_REPO_CACHE`; falls back to `<cache_root>/repository`.
pub fn repo_cache_root() -> PathBuf {
    if let Ok(dir) = std::env::var("JGO_REPO_CACHE") {
        return PathBuf::from(dir);
    }
    cache_root().join("repository")
}

fn platform_cache_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg);
    }
    if cfg!(target_os = "macos") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library").join("Caches");
        }
    }
    if cfg!(target_os = "windows") {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(local);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cache");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_env_override_wins() {
        std::env::set_var("JGO_CACHE_DIR", "/tmp/jgo-test-cache");
        assert_eq!(cache_root(), PathBuf::from("/tmp/jgo-test-cache"));
        std::env::remove_var("JGO_CACHE_DIR");
    }

    #[test]
    fn repo_cache_defaults_under_cache_root() {
        std::env::remove_var("JGO_CACHE_DIR");
        std::env::remove_var("JGO_REPO_CACHE");
        assert_eq!(repo_cache_root(), cache_root().join("repository"));
    }
}
