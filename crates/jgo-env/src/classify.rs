//! Module-path vs class-path JAR classification (spec §4.7).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use jgo_core::coordinate::Placement;
use jgo_util::errors::JgoError;

/// Classify a JAR by inspecting its contents: a `module-info.class` at the
/// archive root wins, else an `Automatic-Module-Name` manifest attribute,
/// else class-path.
pub fn classify(jar_path: &Path) -> Result<Placement, JgoError> {
    let mut archive = open_jar(jar_path)?;

    if archive.by_name("module-info.class").is_ok() {
        return Ok(Placement::ModulePath);
    }

    if let Some(manifest) = read_manifest(&mut archive) {
        if manifest_main_attribute(&manifest, "Automatic-Module-Name").is_some() {
            return Ok(Placement::ModulePath);
        }
    }

    Ok(Placement::ClassPath)
}

pub(crate) fn open_jar(jar_path: &Path) -> Result<zip::ZipArchive<File>, JgoError> {
    let file = File::open(jar_path).map_err(JgoError::IOErr)?;
    zip::ZipArchive::new(file).map_err(|e| JgoError::ParseError {
        message: format!("{}: not a valid JAR archive: {e}", jar_path.display()),
    })
}

pub(crate) fn read_manifest(archive: &mut zip::ZipArchive<File>) -> Option<String> {
    let mut manifest = archive.by_name("META-INF/MANIFEST.MF").ok()?;
    let mut contents = String::new();
    manifest.read_to_string(&mut contents).ok()?;
    Some(contents)
}

/// Read a main-section manifest attribute, honoring the JAR manifest line
/// continuation rule (a line starting with a single space extends the
/// previous attribute's value) and stopping at the first blank line, which
/// terminates the main attributes section.
pub(crate) fn manifest_main_attribute(manifest: &str, key: &str) -> Option<String> {
    let mut current_key: Option<&str> = None;
    let mut current_value = String::new();

    for line in manifest.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }

        if let Some(rest) = line.strip_prefix(' ') {
            if current_key.is_some() {
                current_value.push_str(rest);
            }
            continue;
        }

        if let Some(k) = current_key.take() {
            if k.trim().eq_ignore_ascii_case(key) {
                return Some(current_value.trim().to_string());
            }
        }
        current_value.clear();

        let Some((k, v)) = line.split_once(':') else {
            continue;
        };
        current_key = Some(k);
        current_value.push_str(v.trim_start());
    }

    if let Some(k) = current_key {
        if k.trim().eq_ignore_ascii_case(key) {
            return Some(current_value.trim().to_string());
        }
    }
    None
}
