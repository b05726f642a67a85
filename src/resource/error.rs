//! Resource error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Result alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Error type for classpath resource access.
///
/// A missing resource is not an error: lookups return `None` for it, the same
/// way a classloader does. These variants cover failures after a resource was
/// located, and the conversion of resource URIs to host paths.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No filesystem provider is registered for the URI scheme.
    ///
    /// Only `file:` URIs map onto the host filesystem. Resources packed in an
    /// archive carry a `jar:` URI and always end up here.
    #[error("filesystem not found for scheme `{scheme}`: {uri}")]
    FileSystemNotFound {
        /// The unsupported scheme.
        scheme: String,
        /// The full URI.
        uri: Url,
    },

    /// The URI has a `file` scheme but does not name a host path.
    #[error("URI does not name a host path: {uri}")]
    InvalidUri {
        /// The offending URI.
        uri: Url,
    },

    /// The path cannot be expressed as a `file:` URI.
    #[error("path cannot be expressed as a URI: {}", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
    },

    /// Reading a zip archive failed.
    #[error("failed to read archive {}: {source}", archive.display())]
    Archive {
        /// The archive on the classpath.
        archive: PathBuf,
        /// The underlying zip error.
        source: zip::result::ZipError,
    },

    /// Resource content is not valid UTF-8.
    #[error("resource content is not valid UTF-8")]
    InvalidUtf8,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ResourceError {
    pub(crate) fn archive(archive: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            archive: archive.into(),
            source,
        }
    }

    /// The URI this error refers to, if any.
    pub fn uri(&self) -> Option<&Url> {
        match self {
            Self::FileSystemNotFound { uri, .. } | Self::InvalidUri { uri } => Some(uri),
            _ => None,
        }
    }
}
