use std::path::{Path, PathBuf};

use crate::errors::JgoError;

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `contents` to a temp file in `dir` and atomically rename it to
/// `dest`. Used for sentinel files (`.ok`), `.part` downloads, and any other
/// artifact that must never be observed half-written (spec §4.6, §9
/// "atomic sentinel-commit").
pub fn write_atomic(dest: &Path, contents: &[u8]) -> Result<(), JgoError> {
    let dir = dest.parent().ok_or_else(|| JgoError::Generic {
        message: format!("destination {} has no parent directory", dest.display()),
    })?;
    ensure_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    use std::io::Write as _;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| JgoError::IOErr(e.error))?;
    Ok(())
}

/// Touch an empty sentinel file at `path`, atomically. Used to mark an
/// environment directory build as complete (the `.ok` file).
pub fn write_sentinel(path: &Path) -> Result<(), JgoError> {
    write_atomic(path, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parent_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("file.txt");
        write_atomic(&dest, b"hello").unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
    }

    #[test]
    fn write_sentinel_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let sentinel = dir.path().join(".ok");
        write_sentinel(&sentinel).unwrap();
        assert!(sentinel.is_file());
        assert_eq!(std::fs::metadata(&sentinel).unwrap().len(), 0);
    }

    #[test]
    fn find_ancestor_with_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("marker.toml"), b"").unwrap();
        assert_eq!(
            find_ancestor_with(&nested, "marker.toml"),
            Some(dir.path().to_path_buf())
        );
    }
}
