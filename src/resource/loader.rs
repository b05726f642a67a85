//! Classpath lookup.
//!
//! Two addressing styles are supported:
//!
//! - [`ResourceLoader`] takes *classloader names*: a path from the classpath
//!   root without a leading `/`. A name starting with `/` is never found.
//! - [`Anchor`] takes *anchored names*: `/name` is absolute, anything else is
//!   resolved against the anchor's package directory.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, trace, warn};
use url::Url;

use super::archive;
use super::error::ResourceResult;
use super::uri::{file_uri, jar_uri};
use crate::config::{self, ClasspathEntry};

// =============================================================================
// Resource
// =============================================================================

/// Where a located resource is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A loose file on the host filesystem.
    File(PathBuf),
    /// An entry inside a zip archive.
    Archive {
        /// The archive on the classpath.
        archive: PathBuf,
        /// The entry name inside the archive.
        entry: String,
    },
}

/// A resource located on the classpath.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    uri: Url,
    origin: Origin,
}

impl Resource {
    /// The classloader name the resource was found under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource URI (`file:` or `jar:file:`).
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Where the resource is stored.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Whether the resource is packed inside an archive.
    pub fn is_archived(&self) -> bool {
        matches!(self.origin, Origin::Archive { .. })
    }

    /// Open the resource for reading.
    pub fn open(&self) -> ResourceResult<ResourceStream> {
        match &self.origin {
            Origin::File(path) => {
                let file = File::open(path)?;
                Ok(ResourceStream::File(BufReader::new(file)))
            }
            Origin::Archive { archive, entry } => {
                let content = archive::read_entry(archive, entry)?;
                Ok(ResourceStream::Archived(Cursor::new(content)))
            }
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri.as_str())
    }
}

/// An open resource.
///
/// Loose files are streamed from disk; archive entries are inflated into
/// memory when opened. Dropping the stream releases the file handle.
#[derive(Debug)]
pub enum ResourceStream {
    /// Stream over a loose file.
    File(BufReader<File>),
    /// Inflated archive entry.
    Archived(Cursor<Vec<u8>>),
}

impl Read for ResourceStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(reader) => reader.read(buf),
            Self::Archived(cursor) => cursor.read(buf),
        }
    }
}

// =============================================================================
// ResourceLoader
// =============================================================================

/// Looks up resources along an ordered classpath.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    classpath: Arc<[ClasspathEntry]>,
}

impl ResourceLoader {
    /// Create a loader over the given classpath.
    ///
    /// Relative entries are made absolute against the current directory so
    /// that resource URIs are well formed.
    pub fn new(classpath: impl IntoIterator<Item = ClasspathEntry>) -> Self {
        let classpath = classpath
            .into_iter()
            .map(|entry| match entry {
                ClasspathEntry::Directory(dir) => ClasspathEntry::Directory(absolute(dir)),
                ClasspathEntry::Archive(jar) => ClasspathEntry::Archive(absolute(jar)),
            })
            .collect();
        Self { classpath }
    }

    /// Create a loader over the configured classpath.
    ///
    /// See [`crate::config`].
    pub fn system() -> Self {
        Self::new(config::get().classpath.iter().cloned())
    }

    /// The classpath searched by this loader.
    pub fn classpath(&self) -> &[ClasspathEntry] {
        &self.classpath
    }

    /// Locate a resource by classloader name.
    ///
    /// Returns `None` if the name starts with `/`, escapes the classpath root,
    /// or is not present on any classpath entry.
    pub fn resource(&self, name: &str) -> Option<Resource> {
        if !is_valid_name(name) {
            debug!(name, "rejected resource name");
            return None;
        }

        let found = self.classpath.iter().find_map(|entry| locate(entry, name));
        match &found {
            Some(resource) => trace!(name, uri = %resource.uri, "resource found"),
            None => debug!(name, "resource not found"),
        }
        found
    }

    /// Locate and open a resource by classloader name.
    pub fn open(&self, name: &str) -> Option<ResourceResult<ResourceStream>> {
        self.resource(name).map(|resource| resource.open())
    }

    /// Anchor lookups on a package directory.
    pub fn anchor(&self, package: impl Into<String>) -> Anchor {
        Anchor {
            loader: self.clone(),
            package: package.into().trim_matches('/').to_owned(),
        }
    }

    /// Anchor lookups on the module path of `T`.
    ///
    /// `my_crate::inner::Thing` anchors on `my_crate/inner`.
    pub fn anchor_for<T: ?Sized>(&self) -> Anchor {
        self.anchor(package_of(std::any::type_name::<T>()))
    }
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::system()
    }
}

// =============================================================================
// Anchor
// =============================================================================

/// Resolves names relative to a package directory.
#[derive(Debug, Clone)]
pub struct Anchor {
    loader: ResourceLoader,
    package: String,
}

impl Anchor {
    /// The package directory names are resolved against.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Translate an anchored name into a classloader name.
    pub fn resolve_name(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('/') {
            absolute.to_owned()
        } else if self.package.is_empty() {
            name.to_owned()
        } else {
            format!("{}/{}", self.package, name)
        }
    }

    /// Locate a resource by anchored name.
    pub fn resource(&self, name: &str) -> Option<Resource> {
        self.loader.resource(&self.resolve_name(name))
    }

    /// Locate and open a resource by anchored name.
    pub fn open(&self, name: &str) -> Option<ResourceResult<ResourceStream>> {
        self.loader.open(&self.resolve_name(name))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.split('/').any(|segment| segment == ".." || segment.contains('\\'))
}

fn locate(entry: &ClasspathEntry, name: &str) -> Option<Resource> {
    let located = match entry {
        ClasspathEntry::Directory(dir) => {
            let path = dir.join(name);
            if !path.is_file() {
                return None;
            }
            file_uri(&path).map(|uri| (uri, Origin::File(path)))
        }
        ClasspathEntry::Archive(jar) => match archive::contains(jar, name) {
            Ok(true) => jar_uri(jar, name).map(|uri| {
                let origin = Origin::Archive {
                    archive: jar.clone(),
                    entry: name.to_owned(),
                };
                (uri, origin)
            }),
            Ok(false) => return None,
            Err(e) => Err(e),
        },
    };

    match located {
        Ok((uri, origin)) => Some(Resource {
            name: name.to_owned(),
            uri,
            origin,
        }),
        Err(e) => {
            warn!(entry = %entry.path().display(), name, error = %e, "skipping classpath entry");
            None
        }
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn package_of(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    match base.rsplit_once("::") {
        Some((module, _)) => module.replace("::", "/"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::read::{read_lines, read_to_string, transfer_to};
    use crate::resource::uri::{read_uri_bytes, uri_to_path};
    use crate::resource::ResourceError;
    use std::io::Write;
    use tempfile::TempDir;

    const LINE_SEPARATOR: &str = crate::vfs::LINE_SEPARATOR;

    fn bundled() -> ResourceLoader {
        ResourceLoader::new(crate::config::Config::default().classpath)
    }

    fn anchor() -> Anchor {
        bundled().anchor("classpath")
    }

    fn read(stream: Option<ResourceResult<ResourceStream>>) -> String {
        read_to_string(stream.unwrap().unwrap()).unwrap()
    }

    fn lines(stream: Option<ResourceResult<ResourceStream>>) -> Vec<String> {
        read_lines(stream.unwrap().unwrap())
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_read_as_bytes_absolute_and_classloader_agree() {
        let loader = bundled();
        let anchored = read(anchor().open("/classpath-file.txt"));
        let plain = read(loader.open("classpath-file.txt"));

        assert_eq!(anchored, "classpathLine1\nclasspathLine2");
        assert_eq!(anchored, plain);
    }

    #[test]
    fn test_read_via_transfer_to() {
        let mut sink = Vec::new();
        let stream = anchor().open("/classpath-file.txt").unwrap().unwrap();
        transfer_to(stream, &mut sink).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), "classpathLine1\nclasspathLine2");
    }

    #[test]
    fn test_read_as_bytes_from_archive() {
        assert_eq!(read(anchor().open("/jar-file.txt")), "jarLine1\njarLine2");
    }

    #[test]
    fn test_read_as_bytes_preserves_original_separator() {
        let anchor = anchor();
        assert_eq!(read(anchor.open("/unix-file.txt")), "unixLine1\nunixLine2");
        assert_eq!(read(anchor.open("/windows-file.txt")), "windowsLine1\r\nwindowsLine2");
    }

    #[test]
    fn test_read_as_lines() {
        assert_eq!(
            lines(anchor().open("/classpath-file.txt")),
            ["classpathLine1", "classpathLine2"]
        );
        assert_eq!(lines(anchor().open("/jar-file.txt")), ["jarLine1", "jarLine2"]);
    }

    #[test]
    fn test_read_as_lines_joins_with_system_separator() {
        let joined = lines(anchor().open("/classpath-file.txt")).join(LINE_SEPARATOR);
        assert_eq!(joined, format!("classpathLine1{LINE_SEPARATOR}classpathLine2"));
    }

    #[test]
    fn test_read_as_lines_cannot_preserve_original_separator() {
        let anchor = anchor();
        let unix = lines(anchor.open("/unix-file.txt")).join("\n");
        let windows = lines(anchor.open("/windows-file.txt")).join("\n");

        assert_eq!(unix, "unixLine1\nunixLine2");
        assert_ne!(windows, "windowsLine1\r\nwindowsLine2");
    }

    #[test]
    fn test_read_via_host_path() {
        let resource = anchor().resource("/classpath-file.txt").unwrap();
        let bytes = read_uri_bytes(resource.uri()).unwrap();
        assert_eq!(bytes, b"classpathLine1\nclasspathLine2");

        let windows = anchor().resource("/windows-file.txt").unwrap();
        assert_eq!(read_uri_bytes(windows.uri()).unwrap(), b"windowsLine1\r\nwindowsLine2");
    }

    #[test]
    fn test_read_via_host_path_cannot_read_from_archive() {
        let resource = anchor().resource("/jar-file.txt").unwrap();
        let uri = resource.uri().as_str();
        assert!(resource.is_archived());
        assert!(uri.starts_with("jar:file:"));
        assert!(uri.ends_with("jar-file.txt"));

        assert!(matches!(
            uri_to_path(resource.uri()),
            Err(ResourceError::FileSystemNotFound { .. })
        ));
    }

    #[test]
    fn test_read_lines_from_classpath_host_path() {
        let resource = bundled().resource("classpath-file.txt").unwrap();
        let path = uri_to_path(resource.uri()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), ["classpathLine1", "classpathLine2"]);
    }

    #[test]
    fn test_load_from_root() {
        let loader = bundled();
        let anchored = anchor().resource("/classpath-root.txt").unwrap();
        let plain = loader.resource("classpath-root.txt").unwrap();

        assert_eq!(read_uri_bytes(anchored.uri()).unwrap(), b"i am at classpath root");
        assert_eq!(read_uri_bytes(plain.uri()).unwrap(), b"i am at classpath root");
    }

    #[test]
    fn test_load_from_inner_package() {
        let anchored = anchor().resource("inner/classpath-inner.txt").unwrap();
        let plain = bundled().resource("classpath/inner/classpath-inner.txt").unwrap();

        assert_eq!(anchored.uri(), plain.uri());
        assert_eq!(read_uri_bytes(plain.uri()).unwrap(), b"i am at classpath/inner");
    }

    #[test]
    fn test_classloader_name_cannot_start_with_root() {
        assert!(bundled().resource("/classpath-root.txt").is_none());
        assert!(bundled().open("/classpath-root.txt").is_none());
    }

    #[test]
    fn test_missing_and_escaping_names() {
        let loader = bundled();
        assert!(loader.resource("missing.txt").is_none());
        assert!(loader.resource("").is_none());
        assert!(loader.resource("classpath/../classpath-root.txt").is_none());
    }

    #[test]
    fn test_resolve_name() {
        let anchor = bundled().anchor("/classpath/");
        assert_eq!(anchor.package(), "classpath");
        assert_eq!(anchor.resolve_name("/root.txt"), "root.txt");
        assert_eq!(anchor.resolve_name("inner/a.txt"), "classpath/inner/a.txt");
        assert_eq!(bundled().anchor("").resolve_name("a.txt"), "a.txt");
    }

    #[test]
    fn test_anchor_for_type() {
        let anchor = bundled().anchor_for::<Resource>();
        assert_eq!(anchor.package(), "stdlib_tour/resource/loader");
        assert_eq!(package_of("u8"), "");
        assert_eq!(package_of("a::b::C<d::E>"), "a/b");
    }

    #[test]
    fn test_directory_shadows_archive() {
        let dir = TempDir::new().unwrap();
        let classes = dir.path().join("classes");
        std::fs::create_dir(&classes).unwrap();
        std::fs::write(classes.join("shared.txt"), "from directory").unwrap();

        let jar = dir.path().join("lib.jar");
        let mut zip = zip::ZipWriter::new(File::create(&jar).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("shared.txt", options).unwrap();
        zip.write_all(b"from archive").unwrap();
        zip.start_file("only-in-jar.txt", options).unwrap();
        zip.write_all(b"archived").unwrap();
        zip.finish().unwrap();

        let loader = ResourceLoader::new([
            ClasspathEntry::Directory(classes),
            ClasspathEntry::Archive(jar),
        ]);
        assert_eq!(read(loader.open("shared.txt")), "from directory");
        assert_eq!(read(loader.open("only-in-jar.txt")), "archived");
        assert!(loader.resource("only-in-jar.txt").unwrap().is_archived());
    }

    #[test]
    fn test_broken_archive_is_skipped() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("broken.jar");
        std::fs::write(&jar, "not a zip").unwrap();

        let loader = ResourceLoader::new([ClasspathEntry::Archive(jar)]);
        assert!(loader.resource("anything.txt").is_none());
    }
}
