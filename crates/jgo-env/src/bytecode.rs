//! Java `.class` file inspection: major-version inference and
//! `public static void main(String[])` discovery (spec §4.7).

use std::io::Read;
use std::path::{Path, PathBuf};

use jgo_util::errors::JgoError;

/// Maximum `.class` entries sampled per JAR when inferring the required
/// Java version or scanning for a main method.
const MAX_SAMPLE_ENTRIES: usize = 200;

const CLASS_MAGIC: u32 = 0xCAFE_BABE;
const ACC_PUBLIC: u16 = 0x0001;
const ACC_STATIC: u16 = 0x0008;
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// `major_version` → Java SE version, e.g. `52` → `8`.
fn java_se_version(major: u16) -> u16 {
    major.saturating_sub(44)
}

/// Infer the minimum Java SE version required to run every JAR on a path.
///
/// Samples up to [`MAX_SAMPLE_ENTRIES`] `.class` entries per JAR, including
/// `META-INF/versions/<N>/...` trees of a Multi-Release JAR — the highest
/// major version observed anywhere wins.
pub fn required_java_version(jars: &[PathBuf]) -> Result<u16, JgoError> {
    let mut max_major: u16 = 0;
    for jar in jars {
        if let Some(major) = jar_max_major_version(jar)? {
            max_major = max_major.max(major);
        }
    }
    if max_major == 0 {
        return Ok(8);
    }
    Ok(java_se_version(max_major))
}

fn jar_max_major_version(jar_path: &Path) -> Result<Option<u16>, JgoError> {
    let file = std::fs::File::open(jar_path).map_err(JgoError::IOErr)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| JgoError::ParseError {
        message: format!("{}: not a valid JAR archive: {e}", jar_path.display()),
    })?;

    let mut max_major: Option<u16> = None;
    let mut sampled = 0usize;
    for i in 0..archive.len() {
        if sampled >= MAX_SAMPLE_ENTRIES {
            break;
        }
        let Ok(mut entry) = archive.by_index(i) else {
            continue;
        };
        if entry.is_dir() || !entry.name().ends_with(".class") {
            continue;
        }
        sampled += 1;

        let mut header = [0u8; 8];
        if entry.read_exact(&mut header).is_err() {
            continue;
        }
        let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        if magic != CLASS_MAGIC {
            continue;
        }
        let major = u16::from_be_bytes([header[6], header[7]]);
        max_major = Some(max_major.map_or(major, |m| m.max(major)));
    }
    Ok(max_major)
}

/// Fully-qualified name (dotted) of every class on the path declaring a
/// `public static void main(String[])` method, bounded to
/// [`MAX_SAMPLE_ENTRIES`] `.class` files per JAR (spec §4.7 main-class
/// inference step 2).
pub fn scan_main_classes(jars: &[PathBuf]) -> Result<Vec<String>, JgoError> {
    let mut found = Vec::new();
    for jar in jars {
        found.extend(jar_main_classes(jar)?);
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn jar_main_classes(jar_path: &Path) -> Result<Vec<String>, JgoError> {
    let file = std::fs::File::open(jar_path).map_err(JgoError::IOErr)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| JgoError::ParseError {
        message: format!("{}: not a valid JAR archive: {e}", jar_path.display()),
    })?;

    let mut found = Vec::new();
    let mut sampled = 0usize;
    for i in 0..archive.len() {
        if sampled >= MAX_SAMPLE_ENTRIES {
            break;
        }
        let Ok(mut entry) = archive.by_index(i) else {
            continue;
        };
        if entry.is_dir() || !entry.name().ends_with(".class") {
            continue;
        }
        sampled += 1;

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        if entry.read_to_end(&mut bytes).is_err() {
            continue;
        }
        if let Some(parsed) = parse_class(&bytes) {
            if has_main_method(&parsed) {
                found.push(parsed.this_class_name.replace('/', "."));
            }
        }
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Minimal class file reader: just enough of the constant pool, `this_class`,
// and the method table to answer "does this class declare main(String[])".
// ---------------------------------------------------------------------------

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn u1(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn u2(&mut self) -> Option<u16> {
        Some(u16::from_be_bytes([self.u1()?, self.u1()?]))
    }

    fn u4(&mut self) -> Option<u32> {
        let hi = self.u2()?;
        let lo = self.u2()?;
        Some(((hi as u32) << 16) | lo as u32)
    }

    fn bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        if end > self.data.len() {
            return None;
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    fn skip(&mut self, n: usize) -> Option<()> {
        self.bytes(n).map(|_| ())
    }
}

enum CpEntry {
    Unused,
    Utf8(String),
    Class { name_index: u16 },
    Other,
}

struct MethodInfo {
    access_flags: u16,
    name: String,
    descriptor: String,
}

struct ParsedClass {
    this_class_name: String,
    methods: Vec<MethodInfo>,
}

fn parse_class(data: &[u8]) -> Option<ParsedClass> {
    let mut r = ClassReader::new(data);
    if r.u4()? != CLASS_MAGIC {
        return None;
    }
    r.u2()?; // minor_version
    r.u2()?; // major_version

    let cp_count = r.u2()?;
    let mut pool: Vec<CpEntry> = Vec::with_capacity(cp_count as usize);
    pool.push(CpEntry::Unused); // constant_pool[0] is unused
    let mut i = 1u16;
    while i < cp_count {
        let tag = r.u1()?;
        match tag {
            1 => {
                let len = r.u2()? as usize;
                let bytes = r.bytes(len)?;
                pool.push(CpEntry::Utf8(String::from_utf8_lossy(bytes).into_owned()));
            }
            7 | 8 | 16 | 19 | 20 => {
                if tag == 7 {
                    let name_index = r.u2()?;
                    pool.push(CpEntry::Class { name_index });
                } else {
                    r.u2()?;
                    pool.push(CpEntry::Other);
                }
            }
            3 | 4 => {
                r.u4()?;
                pool.push(CpEntry::Other);
            }
            5 | 6 => {
                r.u4()?;
                r.u4()?;
                // 8-byte constants occupy two constant_pool slots.
                pool.push(CpEntry::Other);
                pool.push(CpEntry::Unused);
                i += 1;
            }
            9 | 10 | 11 | 12 | 17 | 18 => {
                r.u2()?;
                r.u2()?;
                pool.push(CpEntry::Other);
            }
            15 => {
                r.u1()?;
                r.u2()?;
                pool.push(CpEntry::Other);
            }
            _ => return None,
        }
        i += 1;
    }

    r.u2()?; // access_flags
    let this_class_index = r.u2()?;
    r.u2()?; // super_class
    let interfaces_count = r.u2()?;
    r.skip(interfaces_count as usize * 2)?;

    let fields_count = r.u2()?;
    for _ in 0..fields_count {
        skip_member(&mut r)?;
    }

    let methods_count = r.u2()?;
    let mut methods = Vec::with_capacity(methods_count as usize);
    for _ in 0..methods_count {
        let access_flags = r.u2()?;
        let name_index = r.u2()?;
        let descriptor_index = r.u2()?;
        let attrs_count = r.u2()?;
        for _ in 0..attrs_count {
            r.u2()?;
            let len = r.u4()?;
            r.skip(len as usize)?;
        }
        methods.push(MethodInfo {
            access_flags,
            name: utf8_at(&pool, name_index)?,
            descriptor: utf8_at(&pool, descriptor_index)?,
        });
    }

    let this_class_name = match pool.get(this_class_index as usize)? {
        CpEntry::Class { name_index } => utf8_at(&pool, *name_index)?,
        _ => return None,
    };

    Some(ParsedClass {
        this_class_name,
        methods,
    })
}

fn skip_member(r: &mut ClassReader) -> Option<()> {
    r.u2()?; // access_flags
    r.u2()?; // name_index
    r.u2()?; // descriptor_index
    let attrs_count = r.u2()?;
    for _ in 0..attrs_count {
        r.u2()?;
        let len = r.u4()?;
        r.skip(len as usize)?;
    }
    Some(())
}

fn utf8_at(pool: &[CpEntry], index: u16) -> Option<String> {
    match pool.get(index as usize)? {
        CpEntry::Utf8(s) => Some(s.clone()),
        _ => None,
    }
}

fn has_main_method(parsed: &ParsedClass) -> bool {
    parsed.methods.iter().any(|m| {
        m.name == "main"
            && m.descriptor == MAIN_DESCRIPTOR
            && m.access_flags & ACC_PUBLIC != 0
            && m.access_flags & ACC_STATIC != 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::<()>::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    /// Build a minimal but well-formed `.class` file: an empty constant pool
    /// except one `Utf8`+`Class` pair for `this_class`, and optionally one
    /// `public static void main(String[])` method.
    fn build_class(binary_name: &str, with_main: bool) -> Vec<u8> {
        let mut cp_utf8: Vec<&str> = vec![binary_name];
        if with_main {
            cp_utf8.push("main");
            cp_utf8.push(MAIN_DESCRIPTOR);
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes()); // minor
        buf.extend_from_slice(&52u16.to_be_bytes()); // major = Java 8

        // constant_pool_count = entries + 2 (slot 0 unused, Class entry).
        let class_utf8_index = 1u16;
        let class_index = (cp_utf8.len() + 1) as u16;
        buf.extend_from_slice(&(class_index + 1).to_be_bytes());

        for s in &cp_utf8 {
            buf.push(1); // CONSTANT_Utf8
            buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
            buf.extend_from_slice(s.as_bytes());
        }
        buf.push(7); // CONSTANT_Class
        buf.extend_from_slice(&class_utf8_index.to_be_bytes());

        buf.extend_from_slice(&0u16.to_be_bytes()); // access_flags
        buf.extend_from_slice(&class_index.to_be_bytes()); // this_class
        buf.extend_from_slice(&0u16.to_be_bytes()); // super_class
        buf.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
        buf.extend_from_slice(&0u16.to_be_bytes()); // fields_count

        if with_main {
            buf.extend_from_slice(&1u16.to_be_bytes()); // methods_count
            buf.extend_from_slice(&(ACC_PUBLIC | ACC_STATIC).to_be_bytes());
            buf.extend_from_slice(&2u16.to_be_bytes()); // name_index -> "main"
            buf.extend_from_slice(&3u16.to_be_bytes()); // descriptor_index
            buf.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        } else {
            buf.extend_from_slice(&0u16.to_be_bytes()); // methods_count
        }
        buf.extend_from_slice(&0u16.to_be_bytes()); // attributes_count

        buf
    }

    #[test]
    fn required_java_version_reads_class_major() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("a.jar");
        write_jar(&jar, &[("com/example/Foo.class", &build_class("com/example/Foo", false))]);
        assert_eq!(required_java_version(&[jar]).unwrap(), 8);
    }

    #[test]
    fn required_java_version_takes_max_across_jars() {
        let dir = tempfile::tempdir().unwrap();
        let mut class17 = build_class("com/example/Bar", false);
        class17[6..8].copy_from_slice(&61u16.to_be_bytes()); // major 61 -> Java 17

        let jar8 = dir.path().join("a.jar");
        write_jar(&jar8, &[("com/example/Foo.class", &build_class("com/example/Foo", false))]);
        let jar17 = dir.path().join("b.jar");
        write_jar(&jar17, &[("com/example/Bar.class", &class17)]);

        assert_eq!(required_java_version(&[jar8, jar17]).unwrap(), 17);
    }

    #[test]
    fn scan_main_classes_finds_public_static_void_main() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("a.jar");
        write_jar(
            &jar,
            &[
                ("com/example/Foo.class", &build_class("com/example/Foo", false)),
                ("com/example/Main.class", &build_class("com/example/Main", true)),
            ],
        );
        let mains = scan_main_classes(&[jar]).unwrap();
        assert_eq!(mains, vec!["com.example.Main".to_string()]);
    }

    #[test]
    fn no_class_entries_defaults_to_java_8() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("empty.jar");
        write_jar(&jar, &[("README.txt", b"hi")]);
        assert_eq!(required_java_version(&[jar]).unwrap(), 8);
    }
}
