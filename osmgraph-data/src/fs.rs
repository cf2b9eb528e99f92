//! Capability-based filesystem access for UTF-8 paths.

use std::{fs::File, io};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open `path` for reading.
pub(crate) fn open_file(path: &Utf8Path) -> io::Result<File> {
    fs_utf8::File::open_ambient(path, ambient_authority()).map(fs_utf8::File::into_std)
}

/// Whether the entry at `path` is a regular file.
///
/// # Errors
///
/// Returns the I/O error when the parent directory cannot be opened or the
/// entry cannot be inspected. A missing entry surfaces as
/// [`io::ErrorKind::NotFound`].
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let Some(name) = path.file_name() else {
        return Ok(false);
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|metadata| metadata.is_file())
}

/// Create every missing directory above `path`.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (base, relative) = split_root(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Split a path into the directory capabilities are rooted at and the rest.
///
/// Absolute paths are rooted at their prefix and root; relative paths at
/// the working directory.
fn split_root(path: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut base = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => base.push(component.as_str()),
            Utf8Component::CurDir => {}
            other => relative.push(other.as_str()),
        }
    }
    if base.as_str().is_empty() {
        base.push(".");
    }
    (base, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    #[case("/var/data/osm", "/", "var/data/osm")]
    #[case("data/osm", ".", "data/osm")]
    #[case("./osm", ".", "osm")]
    fn roots_are_split_from_the_remainder(
        #[case] path: &str,
        #[case] base: &str,
        #[case] relative: &str,
    ) {
        let (found_base, found_relative) = split_root(Utf8Path::new(path));
        assert_eq!(found_base, Utf8PathBuf::from(base));
        assert_eq!(found_relative, Utf8PathBuf::from(relative));
    }

    #[rstest]
    fn creates_nested_parents() {
        let temp = TempDir::new().expect("create temp dir");
        let target = utf8(&temp).join("a/b/graph.db");
        ensure_parent_dir(&target).expect("create parents");
        assert!(target.parent().is_some_and(Utf8Path::is_dir));
    }

    #[rstest]
    fn regular_file_checks() {
        let temp = TempDir::new().expect("create temp dir");
        let root = utf8(&temp);
        let file = root.join("extract.osm");
        std::fs::write(&file, "<osm/>").expect("write file");

        assert!(is_regular_file(&file).expect("inspect file"));
        let missing = is_regular_file(&root.join("missing.osm")).expect_err("missing entry");
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
        assert!(!is_regular_file(&root).expect("inspect directory"));
    }
}
