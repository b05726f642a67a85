//! Filesystem error type.

use std::io;

use thiserror::Error;

/// Result alias for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Error type for in-memory filesystem operations.
///
/// Every variant carries the path it refers to, rendered with the
/// filesystem's separator.
///
/// # Example
///
/// ```
/// use stdlib_tour::vfs::{Configuration, FsError, MemoryFs};
///
/// let fs = MemoryFs::new(Configuration::unix());
/// match fs.delete(&fs.path("/missing")) {
///     Err(FsError::NoSuchFile { path }) => assert_eq!(path, "/missing"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// The path, or one of its parents, does not exist.
    #[error("no such file: {path}")]
    NoSuchFile {
        /// The offending path.
        path: String,
    },

    /// The target of a create, copy or move already exists.
    #[error("file already exists: {path}")]
    FileAlreadyExists {
        /// The offending path.
        path: String,
    },

    /// A directory that must be empty still has entries.
    #[error("directory not empty: {path}")]
    DirectoryNotEmpty {
        /// The offending path.
        path: String,
    },

    /// A directory was required.
    #[error("not a directory: {path}")]
    NotDirectory {
        /// The offending path.
        path: String,
    },

    /// A regular file was required.
    #[error("is a directory: {path}")]
    IsDirectory {
        /// The offending path.
        path: String,
    },

    /// The entry's accessibility flags forbid the operation.
    #[error("access denied: {path}")]
    AccessDenied {
        /// The offending path.
        path: String,
    },

    /// The operation cannot be applied to the root directory.
    #[error("operation not permitted on root directory: {path}")]
    RootDirectory {
        /// The offending path.
        path: String,
    },

    /// A directory cannot be moved into itself.
    #[error("cannot move {source_path} into {target}")]
    InvalidMove {
        /// The entry being moved.
        source_path: String,
        /// The requested destination.
        target: String,
    },

    /// One path is absolute and the other relative, or the start climbs
    /// above a name it cannot know.
    #[error("cannot relativize {to} against {from}")]
    InvalidRelativize {
        /// The starting path.
        from: String,
        /// The requested destination.
        to: String,
    },

    /// File content is not valid UTF-8.
    #[error("invalid UTF-8 in {path}")]
    InvalidUtf8 {
        /// The offending path.
        path: String,
    },

    /// Unknown attribute name or view.
    #[error("unsupported attribute: {name}")]
    UnsupportedAttribute {
        /// The requested attribute.
        name: String,
    },

    /// The filesystem has been closed.
    #[error("filesystem is closed")]
    Closed,
}

impl FsError {
    pub(crate) fn no_such_file(path: impl ToString) -> Self {
        Self::NoSuchFile {
            path: path.to_string(),
        }
    }

    pub(crate) fn already_exists(path: impl ToString) -> Self {
        Self::FileAlreadyExists {
            path: path.to_string(),
        }
    }

    pub(crate) fn not_empty(path: impl ToString) -> Self {
        Self::DirectoryNotEmpty {
            path: path.to_string(),
        }
    }

    pub(crate) fn not_directory(path: impl ToString) -> Self {
        Self::NotDirectory {
            path: path.to_string(),
        }
    }

    pub(crate) fn is_directory(path: impl ToString) -> Self {
        Self::IsDirectory {
            path: path.to_string(),
        }
    }

    pub(crate) fn access_denied(path: impl ToString) -> Self {
        Self::AccessDenied {
            path: path.to_string(),
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NoSuchFile { path }
            | Self::FileAlreadyExists { path }
            | Self::DirectoryNotEmpty { path }
            | Self::NotDirectory { path }
            | Self::IsDirectory { path }
            | Self::AccessDenied { path }
            | Self::RootDirectory { path }
            | Self::InvalidUtf8 { path } => Some(path),
            Self::InvalidMove { source_path, .. } => Some(source_path),
            Self::InvalidRelativize { from, .. } => Some(from),
            Self::UnsupportedAttribute { .. } | Self::Closed => None,
        }
    }

    /// The closest standard I/O error kind.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::NoSuchFile { .. } => io::ErrorKind::NotFound,
            Self::FileAlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            Self::DirectoryNotEmpty { .. } => io::ErrorKind::DirectoryNotEmpty,
            Self::NotDirectory { .. } => io::ErrorKind::NotADirectory,
            Self::IsDirectory { .. } => io::ErrorKind::IsADirectory,
            Self::AccessDenied { .. } | Self::RootDirectory { .. } => {
                io::ErrorKind::PermissionDenied
            }
            Self::InvalidUtf8 { .. } => io::ErrorKind::InvalidData,
            Self::InvalidMove { .. }
            | Self::InvalidRelativize { .. }
            | Self::UnsupportedAttribute { .. } => io::ErrorKind::InvalidInput,
            Self::Closed => io::ErrorKind::Other,
        }
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path() {
        let err = FsError::no_such_file("/dirOne/missing");
        assert_eq!(err.to_string(), "no such file: /dirOne/missing");
        assert_eq!(err.path(), Some("/dirOne/missing"));
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err: io::Error = FsError::not_empty("/dir").into();
        assert_eq!(err.kind(), io::ErrorKind::DirectoryNotEmpty);

        let err: io::Error = FsError::already_exists("/file").into();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(err.to_string().contains("/file"));
    }
}
