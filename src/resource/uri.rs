//! Resource URIs and their conversion to host paths.

use std::path::{Path, PathBuf};

use url::Url;

use super::error::{ResourceError, ResourceResult};

/// Scheme of resources stored as loose files.
pub const FILE_SCHEME: &str = "file";

/// Scheme of resources stored inside an archive.
pub const JAR_SCHEME: &str = "jar";

/// Separator between the archive URI and the entry name in a `jar:` URI.
const JAR_SEPARATOR: &str = "!/";

/// Build the `file:` URI of a loose resource.
pub(crate) fn file_uri(path: &Path) -> ResourceResult<Url> {
    Url::from_file_path(path).map_err(|()| ResourceError::InvalidPath {
        path: path.to_path_buf(),
    })
}

/// Build the `jar:file:<archive>!/<entry>` URI of an archived resource.
pub(crate) fn jar_uri(archive: &Path, entry: &str) -> ResourceResult<Url> {
    let archive_uri = file_uri(archive)?;
    let text = format!("{JAR_SCHEME}:{archive_uri}{JAR_SEPARATOR}{entry}");
    Url::parse(&text).map_err(|_| ResourceError::InvalidPath {
        path: archive.join(entry),
    })
}

/// Convert a resource URI into a host filesystem path.
///
/// Only the `file` scheme has a filesystem provider. Any other scheme,
/// notably `jar`, fails with [`ResourceError::FileSystemNotFound`].
pub fn uri_to_path(uri: &Url) -> ResourceResult<PathBuf> {
    match uri.scheme() {
        FILE_SCHEME => uri
            .to_file_path()
            .map_err(|()| ResourceError::InvalidUri { uri: uri.clone() }),
        scheme => Err(ResourceError::FileSystemNotFound {
            scheme: scheme.to_owned(),
            uri: uri.clone(),
        }),
    }
}

/// Read the bytes behind a URI through the host filesystem.
pub fn read_uri_bytes(uri: &Url) -> ResourceResult<Vec<u8>> {
    let path = uri_to_path(uri)?;
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_uri_round_trip() {
        let path = std::env::temp_dir().join("some-file.txt");
        let uri = file_uri(&path).unwrap();
        assert_eq!(uri.scheme(), FILE_SCHEME);
        assert_eq!(uri_to_path(&uri).unwrap(), path);
    }

    #[test]
    fn test_relative_path_has_no_uri() {
        assert!(matches!(
            file_uri(Path::new("relative/file.txt")),
            Err(ResourceError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_jar_uri_shape() {
        let archive = std::env::temp_dir().join("lib.jar");
        let uri = jar_uri(&archive, "inner/entry.txt").unwrap();
        let text = uri.as_str();
        assert!(text.starts_with("jar:file:"));
        assert!(text.contains("lib.jar!/"));
        assert!(text.ends_with("inner/entry.txt"));
    }

    #[test]
    fn test_jar_uri_has_no_filesystem() {
        let archive = std::env::temp_dir().join("lib.jar");
        let uri = jar_uri(&archive, "entry.txt").unwrap();
        let err = uri_to_path(&uri).unwrap_err();
        assert!(matches!(&err, ResourceError::FileSystemNotFound { scheme, .. } if scheme == JAR_SCHEME));
        assert_eq!(err.uri(), Some(&uri));
        assert!(err.to_string().starts_with("filesystem not found for scheme `jar`"));
    }

    #[test]
    fn test_unknown_scheme_has_no_filesystem() {
        let uri = Url::parse("memory:/some/file").unwrap();
        assert!(matches!(
            read_uri_bytes(&uri),
            Err(ResourceError::FileSystemNotFound { .. })
        ));
    }
}
