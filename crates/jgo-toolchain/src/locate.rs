//! JDK discovery: the `JavaLocator` black box (spec §1 Non-goals — JDK
//! provisioning is explicitly out of scope; this crate only finds an
//! already-installed `java` given a version/vendor requirement).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One discovered JDK installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkInfo {
    pub home: PathBuf,
    /// Java SE major version, e.g. `21`.
    pub major_version: u16,
    /// `IMPLEMENTOR` from the JDK's `release` file, when present
    /// (`"Eclipse Adoptium"`, `"Amazon.com Inc."`, `"Azul Systems, Inc."`, ...).
    pub vendor: Option<String>,
}

impl fmt::Display for JdkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vendor {
            Some(v) => write!(f, "{v} {} ({})", self.major_version, self.home.display()),
            None => write!(f, "JDK {} ({})", self.major_version, self.home.display()),
        }
    }
}

/// Find a JDK satisfying `required_major` (and, if given, `vendor` as a
/// case-insensitive substring match against the discovered vendor string).
///
/// Search order: `explicit_home` (a caller/config-supplied `JAVA_HOME`-like
/// path) -> the `JAVA_HOME` environment variable -> common per-OS
/// installation directories. The first candidate meeting both constraints
/// wins; ties are broken by preferring the highest available major version.
pub fn locate(explicit_home: Option<&Path>, required_major: u16, vendor: Option<&str>) -> Option<JdkInfo> {
    let accepts = |info: &JdkInfo| {
        info.major_version >= required_major
            && vendor.is_none_or(|want| {
                info.vendor
                    .as_deref()
                    .is_some_and(|have| have.to_ascii_lowercase().contains(&want.to_ascii_lowercase()))
            })
    };

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(home) = explicit_home {
        candidates.push(home.to_path_buf());
    }
    if let Ok(home) = std::env::var("JAVA_HOME") {
        candidates.push(PathBuf::from(home));
    }
    candidates.extend(common_jdk_paths());

    let mut found: Vec<JdkInfo> = candidates.iter().filter_map(|p| validate_jdk(p)).filter(accepts).collect();
    found.sort_by(|a, b| b.major_version.cmp(&a.major_version));
    found.into_iter().next()
}

/// Inspect a candidate JDK home directory. Prefers the `release` file
/// JDK distributions ship at their root (`JAVA_VERSION=`, `IMPLEMENTOR=`);
/// falls back to parsing `java -version` stderr when no `release` file is
/// present (some minimal/custom-built JDKs omit it).
pub fn validate_jdk(home: &Path) -> Option<JdkInfo> {
    let java = java_binary(home);
    if !java.is_file() {
        return None;
    }

    if let Some((major, vendor)) = read_release_file(home) {
        return Some(JdkInfo {
            home: home.to_path_buf(),
            major_version: major,
            vendor,
        });
    }

    let output = Command::new(&java).arg("-version").output().ok()?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    let major = parse_java_version(&stderr)?;
    Some(JdkInfo {
        home: home.to_path_buf(),
        major_version: major,
        vendor: None,
    })
}

fn java_binary(home: &Path) -> PathBuf {
    if cfg!(windows) {
        home.join("bin").join("java.exe")
    } else {
        home.join("bin").join("java")
    }
}

/// Parse `JAVA_VERSION`/`IMPLEMENTOR` out of a JDK's `release` file, a
/// simple `KEY="VALUE"` text format every mainstream distribution ships.
fn read_release_file(home: &Path) -> Option<(u16, Option<String>)> {
    let content = fs::read_to_string(home.join("release")).ok()?;
    let mut version_str = None;
    let mut vendor = None;
    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key {
            "JAVA_VERSION" => version_str = Some(value.to_string()),
            "IMPLEMENTOR" => vendor = Some(value.to_string()),
            _ => {}
        }
    }
    let major = java_major_from_version_string(&version_str?)?;
    Some((major, vendor))
}

/// `"21.0.2"` -> 21, `"1.8.0_392"` (pre-JEP 223) -> 8.
fn java_major_from_version_string(version: &str) -> Option<u16> {
    let mut parts = version.split(['.', '+']);
    let first: u16 = parts.next()?.parse().ok()?;
    if first == 1 {
        return parts.next()?.parse().ok();
    }
    Some(first)
}

/// Parse a version string from `java -version` stderr output, e.g.
/// `openjdk version "21.0.2" 2024-01-16` -> `21`.
fn parse_java_version(output: &str) -> Option<u16> {
    for line in output.lines() {
        let start = line.find('"')?;
        let rest = &line[start + 1..];
        let end = rest.find('"')?;
        return java_major_from_version_string(&rest[..end]);
    }
    None
}

fn common_jdk_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "macos")]
    {
        let lib_jvm = PathBuf::from("/Library/Java/JavaVirtualMachines");
        if let Ok(entries) = fs::read_dir(&lib_jvm) {
            for entry in entries.filter_map(|e| e.ok()) {
                let contents = entry.path().join("Contents/Home");
                if contents.is_dir() {
                    paths.push(contents);
                }
            }
        }
        paths.push(PathBuf::from("/opt/homebrew/opt/openjdk/libexec/openjdk.jdk/Contents/Home"));
        paths.push(PathBuf::from("/usr/local/opt/openjdk/libexec/openjdk.jdk/Contents/Home"));
    }

    #[cfg(target_os = "linux")]
    {
        let jvm_dir = PathBuf::from("/usr/lib/jvm");
        if let Ok(entries) = fs::read_dir(&jvm_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                paths.push(entry.path());
            }
        }
        paths.push(PathBuf::from("/usr/local/java"));
    }

    #[cfg(target_os = "windows")]
    {
        for base in &["C:\\Program Files\\Java", "C:\\Program Files\\Eclipse Adoptium"] {
            let dir = PathBuf::from(base);
            if let Ok(entries) = fs::read_dir(&dir) {
                for entry in entries.filter_map(|e| e.ok()) {
                    paths.push(entry.path());
                }
            }
        }
    }

    paths
}
