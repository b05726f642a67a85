//! Zip archive access with modification-time based invalidation.
//!
//! # Caching Strategy
//!
//! ```text
//! ARCHIVE_INDEX (shared across all loaders)
//! └── FxHashMap<PathBuf, Arc<ArchiveIndex>>
//!     └── ArchiveIndex
//!         ├── modified: Option<SystemTime>  ── invalidation key
//!         └── entries: FxHashSet<String>    ── file entries only
//! ```
//!
//! Lookups only consult the index. Entry content is read on demand when a
//! resource is opened, so the archive file is never held open between calls.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use std::time::SystemTime;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use zip::ZipArchive;

use super::error::{ResourceError, ResourceResult};

/// Global archive index cache.
static ARCHIVE_INDEX: LazyLock<RwLock<FxHashMap<PathBuf, Arc<ArchiveIndex>>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Clear the global archive index cache.
///
/// Archives are re-indexed on their next lookup.
pub fn clear_archive_cache() {
    ARCHIVE_INDEX.write().clear();
}

/// Names of the file entries of one archive.
#[derive(Debug)]
struct ArchiveIndex {
    modified: Option<SystemTime>,
    entries: FxHashSet<String>,
}

impl ArchiveIndex {
    fn build(archive: &Path, modified: Option<SystemTime>) -> ResourceResult<Self> {
        let zip = open(archive)?;
        let entries: FxHashSet<String> = zip
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_owned)
            .collect();
        debug!(archive = %archive.display(), entries = entries.len(), "indexed archive");
        Ok(Self { modified, entries })
    }
}

/// Check whether `archive` holds a file entry named `entry`.
pub(crate) fn contains(archive: &Path, entry: &str) -> ResourceResult<bool> {
    Ok(index(archive)?.entries.contains(entry))
}

/// Read the content of one archive entry.
pub(crate) fn read_entry(archive: &Path, entry: &str) -> ResourceResult<Vec<u8>> {
    let mut zip = open(archive)?;
    let mut file = zip
        .by_name(entry)
        .map_err(|e| ResourceError::archive(archive, e))?;
    let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut content)?;
    trace!(archive = %archive.display(), entry, bytes = content.len(), "read archive entry");
    Ok(content)
}

fn index(archive: &Path) -> ResourceResult<Arc<ArchiveIndex>> {
    let modified = std::fs::metadata(archive)?.modified().ok();

    // Fast path: index still matches the file on disk
    if let Some(index) = ARCHIVE_INDEX.read().get(archive)
        && modified.is_some()
        && index.modified == modified
    {
        return Ok(Arc::clone(index));
    }

    let index = Arc::new(ArchiveIndex::build(archive, modified)?);
    ARCHIVE_INDEX
        .write()
        .insert(archive.to_path_buf(), Arc::clone(&index));
    Ok(index)
}

fn open(archive: &Path) -> ResourceResult<ZipArchive<BufReader<File>>> {
    let file = File::open(archive)?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| ResourceError::archive(archive, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.add_directory("dir/", options).unwrap();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_contains_skips_directories() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("test.jar");
        write_archive(&archive, &[("dir/a.txt", "a")]);

        assert!(contains(&archive, "dir/a.txt").unwrap());
        assert!(!contains(&archive, "dir/").unwrap());
        assert!(!contains(&archive, "missing.txt").unwrap());
    }

    #[test]
    fn test_read_entry() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("test.jar");
        write_archive(&archive, &[("a.txt", "line1\r\nline2")]);

        assert_eq!(read_entry(&archive, "a.txt").unwrap(), b"line1\r\nline2");
        assert!(matches!(
            read_entry(&archive, "b.txt"),
            Err(ResourceError::Archive { .. })
        ));
    }

    #[test]
    fn test_not_an_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.jar");
        std::fs::write(&archive, "not a zip").unwrap();

        assert!(matches!(
            contains(&archive, "a.txt"),
            Err(ResourceError::Archive { .. })
        ));
    }

    #[test]
    fn test_missing_archive() {
        assert!(matches!(
            contains(Path::new("/nonexistent/archive.jar"), "a.txt"),
            Err(ResourceError::Io(_))
        ));
    }
}
