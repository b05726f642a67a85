//! Lazy directory listings and tree walks.

use std::fmt;

use super::attr::BasicAttributes;
use super::error::{FsError, FsResult};
use super::fs::MemoryFs;
use super::path::VirtualPath;

/// Immediate children of a directory, in name order.
///
/// The listing is taken when the stream is opened. If the filesystem is
/// closed before the stream is drained, the next item is
/// [`FsError::Closed`] and the stream ends.
#[derive(Debug)]
pub struct DirStream {
    fs: MemoryFs,
    entries: std::vec::IntoIter<VirtualPath>,
    done: bool,
}

impl DirStream {
    pub(crate) fn new(fs: MemoryFs, entries: Vec<VirtualPath>) -> Self {
        Self {
            fs,
            entries: entries.into_iter(),
            done: false,
        }
    }
}

impl Iterator for DirStream {
    type Item = FsResult<VirtualPath>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Err(err) = self.fs.ensure_open() {
            self.done = true;
            return Some(Err(err));
        }
        self.entries.next().map(Ok)
    }
}

/// Depth-first walk yielding the entries accepted by a predicate.
///
/// Depth 0 is the start path itself; directories at `max_depth` are
/// reported but not entered. Entries removed while the walk is in progress
/// are skipped.
pub struct Find<P> {
    fs: MemoryFs,
    pending: Vec<(VirtualPath, usize)>,
    max_depth: usize,
    predicate: P,
    done: bool,
}

impl<P> Find<P>
where
    P: FnMut(&VirtualPath, &BasicAttributes) -> bool,
{
    pub(crate) fn new(fs: MemoryFs, start: VirtualPath, max_depth: usize, predicate: P) -> Self {
        Self {
            fs,
            pending: vec![(start, 0)],
            max_depth,
            predicate,
            done: false,
        }
    }

    fn step(&mut self) -> FsResult<Option<VirtualPath>> {
        while let Some((path, depth)) = self.pending.pop() {
            let attrs = match self.fs.attributes(&path) {
                Ok(attrs) => attrs,
                Err(FsError::NoSuchFile { .. }) => continue,
                Err(err) => return Err(err),
            };
            if attrs.is_directory() && depth < self.max_depth {
                let children = self.fs.child_paths(&path)?;
                self.pending
                    .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
            if (self.predicate)(&path, &attrs) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl<P> Iterator for Find<P>
where
    P: FnMut(&VirtualPath, &BasicAttributes) -> bool,
{
    type Item = FsResult<VirtualPath>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(found) => {
                self.done = found.is_none();
                found.map(Ok)
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<P> fmt::Debug for Find<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Find")
            .field("pending", &self.pending)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
