//! File attributes: timestamps, accessibility flags and the basic view.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::error::{FsError, FsResult};

// =============================================================================
// FileTime
// =============================================================================

/// A file timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime {
    millis: i64,
}

impl FileTime {
    /// Timestamp from milliseconds since the Unix epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Timestamp of an instant, truncated to the millisecond.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self::from_millis(instant.timestamp_millis())
    }

    /// Milliseconds since the Unix epoch.
    pub const fn to_millis(self) -> i64 {
        self.millis
    }

    /// The timestamp as an instant, if it is within chrono's range.
    pub fn to_instant(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.millis)
    }
}

impl fmt::Display for FileTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_instant() {
            Some(instant) => f.write_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.millis),
        }
    }
}

/// Creation, modification and access timestamps of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileTimes {
    pub(crate) creation: FileTime,
    pub(crate) last_modified: FileTime,
    pub(crate) last_access: FileTime,
}

impl FileTimes {
    pub(crate) fn at(now: FileTime) -> Self {
        Self {
            creation: now,
            last_modified: now,
            last_access: now,
        }
    }
}

// =============================================================================
// Permissions
// =============================================================================

/// Accessibility flags of one entry.
///
/// New entries are readable, writable and executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    /// Content may be read.
    pub readable: bool,
    /// Content may be written.
    pub writable: bool,
    /// Entry may be executed or traversed.
    pub executable: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: true,
        }
    }
}

impl Permissions {
    /// Read-only, non-executable flags.
    pub const fn read_only() -> Self {
        Self {
            readable: true,
            writable: false,
            executable: false,
        }
    }
}

// =============================================================================
// BasicAttributes
// =============================================================================

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A regular file with byte content.
    Regular,
    /// A directory.
    Directory,
}

/// Snapshot of the basic attributes of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicAttributes {
    /// Entry kind.
    pub kind: FileKind,
    /// Content length in bytes; 0 for directories.
    pub size: u64,
    /// Creation timestamp.
    pub creation_time: FileTime,
    /// Last content modification.
    pub last_modified_time: FileTime,
    /// Last content read.
    pub last_access_time: FileTime,
    /// Identity of the entry; equal keys mean the same file.
    pub file_key: u64,
}

impl BasicAttributes {
    /// Whether the entry is a regular file.
    pub fn is_regular_file(&self) -> bool {
        self.kind == FileKind::Regular
    }

    /// Whether the entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// Look up one attribute by name.
    ///
    /// Names may carry the `basic:` view prefix.
    pub fn get(&self, name: &str) -> FsResult<AttributeValue> {
        let attribute = name.strip_prefix("basic:").unwrap_or(name);
        let value = match attribute {
            "creationTime" => AttributeValue::Time(self.creation_time),
            "lastModifiedTime" => AttributeValue::Time(self.last_modified_time),
            "lastAccessTime" => AttributeValue::Time(self.last_access_time),
            "size" => AttributeValue::Size(self.size),
            "isRegularFile" => AttributeValue::Flag(self.is_regular_file()),
            "isDirectory" => AttributeValue::Flag(self.is_directory()),
            "fileKey" => AttributeValue::Key(self.file_key),
            _ => {
                return Err(FsError::UnsupportedAttribute {
                    name: name.to_owned(),
                });
            }
        };
        Ok(value)
    }
}

/// Value of a named attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    /// A timestamp.
    Time(FileTime),
    /// A byte count.
    Size(u64),
    /// A boolean flag.
    Flag(bool),
    /// An entry identity.
    Key(u64),
}

impl AttributeValue {
    /// The timestamp, if this is a time attribute.
    pub fn as_time(self) -> Option<FileTime> {
        match self {
            Self::Time(time) => Some(time),
            _ => None,
        }
    }
}

impl From<FileTime> for AttributeValue {
    fn from(time: FileTime) -> Self {
        Self::Time(time)
    }
}
