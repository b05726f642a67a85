//! Immutable filesystem paths.
//!
//! A [`VirtualPath`] is an optional root plus a list of names, tied to the
//! filesystem that produced it. All operations here are pure: nothing touches
//! the filesystem contents.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::{FsError, FsResult};

// =============================================================================
// Filesystem Identity
// =============================================================================

/// Source of filesystem identities.
static NEXT_FS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a filesystem instance.
///
/// Paths from different instances never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsId(u64);

impl FsId {
    pub(crate) fn next() -> Self {
        Self(NEXT_FS_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identity value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Naming rules shared by every path of one filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathSyntax {
    pub(crate) fs: FsId,
    pub(crate) separator: char,
    pub(crate) case_sensitive: bool,
}

impl PathSyntax {
    /// Parse a path string.
    ///
    /// Both `/` and the configured separator split names. Empty names are
    /// dropped, so `//a///b/` parses as `/a/b`. The empty string parses as
    /// the empty path, a relative path of one empty name.
    pub(crate) fn parse(self, text: &str) -> VirtualPath {
        let is_separator = |c: char| c == '/' || c == self.separator;
        VirtualPath::assemble(
            self,
            text.starts_with(is_separator),
            text.split(is_separator).map(str::to_owned).collect(),
        )
    }

    /// Parse and join several path strings.
    pub(crate) fn join<'a>(self, first: &str, more: impl IntoIterator<Item = &'a str>) -> VirtualPath {
        more.into_iter()
            .fold(self.parse(first), |path, part| path.append(&self.parse(part)))
    }
}

// =============================================================================
// PathLike
// =============================================================================

/// Values accepted wherever a path argument is expected.
///
/// Strings are parsed with the rules of the path they are combined with.
pub trait PathLike {
    /// Convert into a path using the naming rules of `base`.
    fn into_path(self, base: &VirtualPath) -> VirtualPath;
}

impl PathLike for &str {
    fn into_path(self, base: &VirtualPath) -> VirtualPath {
        base.syntax.parse(self)
    }
}

impl PathLike for &String {
    fn into_path(self, base: &VirtualPath) -> VirtualPath {
        base.syntax.parse(self)
    }
}

impl PathLike for String {
    fn into_path(self, base: &VirtualPath) -> VirtualPath {
        base.syntax.parse(&self)
    }
}

impl PathLike for VirtualPath {
    fn into_path(self, _base: &VirtualPath) -> VirtualPath {
        self
    }
}

impl PathLike for &VirtualPath {
    fn into_path(self, _base: &VirtualPath) -> VirtualPath {
        self.clone()
    }
}

// =============================================================================
// VirtualPath
// =============================================================================

/// A path on a [`MemoryFs`](super::MemoryFs).
///
/// # Example
///
/// ```
/// use stdlib_tour::vfs::{Configuration, MemoryFs};
///
/// let fs = MemoryFs::new(Configuration::unix());
/// let path = fs.path("/partOne/partTwo/../partThree");
///
/// assert_eq!(path.normalize(), fs.path("/partOne/partThree"));
/// assert_eq!(path.name_count(), 4);
/// ```
#[derive(Clone)]
pub struct VirtualPath {
    syntax: PathSyntax,
    root: bool,
    names: Vec<String>,
}

impl VirtualPath {
    /// Canonical form: no empty names, except the single one of the empty
    /// path.
    fn assemble(syntax: PathSyntax, root: bool, mut names: Vec<String>) -> Self {
        names.retain(|name| !name.is_empty());
        if !root && names.is_empty() {
            names.push(String::new());
        }
        Self { syntax, root, names }
    }

    fn with(&self, root: bool, names: Vec<String>) -> Self {
        Self::assemble(self.syntax, root, names)
    }

    /// Names without the placeholder of the empty path.
    fn parts(&self) -> &[String] {
        if self.is_empty() { &[] } else { self.names.as_slice() }
    }

    /// Identity of the filesystem this path belongs to.
    pub fn fs_id(&self) -> FsId {
        self.syntax.fs
    }

    /// Whether the path starts at the root.
    pub fn is_absolute(&self) -> bool {
        self.root
    }

    /// Whether this is the empty path.
    pub fn is_empty(&self) -> bool {
        !self.root && self.names.len() == 1 && self.names[0].is_empty()
    }

    /// The root component, or `None` for a relative path.
    pub fn root(&self) -> Option<Self> {
        self.root.then(|| self.with(true, Vec::new()))
    }

    /// The last name as a relative path.
    pub fn file_name(&self) -> Option<Self> {
        self.names.last().map(|name| self.with(false, vec![name.clone()]))
    }

    /// The last name as a string.
    pub fn file_name_str(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// Everything but the last name.
    ///
    /// The parent of `/a` is `/`; `a`, `/` and the empty path have none.
    pub fn parent(&self) -> Option<Self> {
        match self.names.len() {
            0 => None,
            1 => self.root(),
            len => Some(self.with(self.root, self.names[..len - 1].to_vec())),
        }
    }

    /// Number of names, not counting the root.
    ///
    /// The empty path has one empty name.
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// The name at `index` (0 is closest to the root) as a relative path.
    pub fn name(&self, index: usize) -> Option<Self> {
        self.names.get(index).map(|name| self.with(false, vec![name.clone()]))
    }

    /// Iterate over the names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The relative path of names `[begin, end)`.
    ///
    /// Returns `None` for an empty or out-of-range interval.
    pub fn subpath(&self, begin: usize, end: usize) -> Option<Self> {
        (begin < end && end <= self.names.len())
            .then(|| self.with(false, self.names[begin..end].to_vec()))
    }

    /// Remove `.` names and fold each `..` into the name before it.
    ///
    /// `..` directly under the root is dropped; leading `..` of a relative
    /// path is kept.
    pub fn normalize(&self) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(self.names.len());
        for name in &self.names {
            match name.as_str() {
                "." => {}
                ".." => {
                    if names.last().is_some_and(|last| last != "..") {
                        names.pop();
                    } else if !self.root {
                        names.push(name.clone());
                    }
                }
                _ => names.push(name.clone()),
            }
        }
        self.with(self.root, names)
    }

    /// Join `other` onto this path.
    ///
    /// An absolute `other` replaces this path; an empty one leaves it as is.
    pub fn resolve(&self, other: impl PathLike) -> Self {
        let other = other.into_path(self);
        if other.root {
            self.with(true, other.names)
        } else {
            self.append(&other)
        }
    }

    /// Resolve `other` against the parent of this path.
    pub fn resolve_sibling(&self, other: impl PathLike) -> Self {
        let other = other.into_path(self);
        match self.parent() {
            Some(parent) => parent.resolve(other),
            None => self.with(other.root, other.names),
        }
    }

    /// The path that leads from this path to `other`.
    ///
    /// Both operands are normalized first, and must be both absolute or both
    /// relative. The result `r` satisfies
    /// `self.resolve(r).normalize() == other.normalize()`.
    pub fn relativize(&self, other: impl PathLike) -> FsResult<Self> {
        let other = other.into_path(self);
        let invalid = || FsError::InvalidRelativize {
            from: self.to_string(),
            to: other.to_string(),
        };
        if self.root != other.root {
            return Err(invalid());
        }

        let from = self.normalize();
        let to = other.normalize();
        let (from, to) = (from.parts(), to.parts());
        let common = from
            .iter()
            .zip(to)
            .take_while(|(a, b)| self.same_name(a, b))
            .count();

        // Cannot climb out of a name we don't know.
        if from[common..].iter().any(|name| name == "..") {
            return Err(invalid());
        }

        let mut names = vec!["..".to_owned(); from.len() - common];
        names.extend(to[common..].iter().cloned());
        Ok(self.with(false, names))
    }

    /// Component-wise prefix test.
    ///
    /// `/a/bc` does not start with `/a/b`.
    pub fn starts_with(&self, other: impl PathLike) -> bool {
        let other = other.into_path(self);
        other.syntax.fs == self.syntax.fs
            && other.root == self.root
            && other.names.len() <= self.names.len()
            && self
                .names
                .iter()
                .zip(&other.names)
                .all(|(a, b)| self.same_name(a, b))
    }

    /// Component-wise suffix test.
    ///
    /// An absolute `other` must match this path entirely.
    pub fn ends_with(&self, other: impl PathLike) -> bool {
        let other = other.into_path(self);
        if other.syntax.fs != self.syntax.fs || other.is_empty() {
            return false;
        }
        if other.root {
            return self == &other;
        }
        other.names.len() <= self.names.len()
            && self
                .names
                .iter()
                .rev()
                .zip(other.names.iter().rev())
                .all(|(a, b)| self.same_name(a, b))
    }

    /// This path anchored at the root and normalized.
    ///
    /// The working directory of a [`MemoryFs`](super::MemoryFs) is the root.
    pub(crate) fn to_absolute(&self) -> Self {
        self.with(true, self.names.clone()).normalize()
    }

    pub(crate) fn append(&self, other: &VirtualPath) -> Self {
        let mut names = self.names.clone();
        names.extend(other.names.iter().cloned());
        self.with(self.root, names)
    }

    pub(crate) fn child(&self, name: &str) -> Self {
        let mut names = self.names.clone();
        names.push(name.to_owned());
        self.with(self.root, names)
    }

    fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.syntax.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }

    fn same_name(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

impl PartialEq for VirtualPath {
    fn eq(&self, other: &Self) -> bool {
        self.syntax.fs == other.syntax.fs
            && self.root == other.root
            && self.names.len() == other.names.len()
            && self
                .names
                .iter()
                .zip(&other.names)
                .all(|(a, b)| self.same_name(a, b))
    }
}

impl Eq for VirtualPath {}

impl Hash for VirtualPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.syntax.fs.hash(state);
        self.root.hash(state);
        self.names.len().hash(state);
        for name in &self.names {
            self.key(name).hash(state);
        }
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root {
            write!(f, "{}", self.syntax.separator)?;
        }
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.syntax.separator)?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtualPath({:?})", self.to_string())
    }
}
