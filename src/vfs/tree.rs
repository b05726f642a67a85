//! Inode storage behind a [`MemoryFs`](super::MemoryFs).
//!
//! Entries live in a flat table keyed by inode id. Directories map folded
//! names to links, so case-insensitive lookups need no scan and listings
//! come out sorted.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::attr::{BasicAttributes, FileKind, FileTime, FileTimes, Permissions};
use super::error::{FsError, FsResult};
use super::path::VirtualPath;

/// Inode id of the root directory.
pub(crate) const ROOT: u64 = 0;

/// A named reference from a directory to an inode.
#[derive(Debug, Clone)]
pub(crate) struct Link {
    /// Name as it was created, before case folding.
    pub(crate) name: String,
    pub(crate) id: u64,
}

#[derive(Debug, Clone)]
pub(crate) enum Content {
    File(Vec<u8>),
    Directory(BTreeMap<String, Link>),
}

#[derive(Debug, Clone)]
pub(crate) struct Inode {
    pub(crate) content: Content,
    pub(crate) times: FileTimes,
    pub(crate) permissions: Permissions,
}

impl Inode {
    pub(crate) fn file(now: FileTime) -> Self {
        Self {
            content: Content::File(Vec::new()),
            times: FileTimes::at(now),
            permissions: Permissions::default(),
        }
    }

    pub(crate) fn directory(now: FileTime) -> Self {
        Self {
            content: Content::Directory(BTreeMap::new()),
            times: FileTimes::at(now),
            permissions: Permissions::default(),
        }
    }

    pub(crate) fn kind(&self) -> FileKind {
        match self.content {
            Content::File(_) => FileKind::Regular,
            Content::Directory(_) => FileKind::Directory,
        }
    }

    pub(crate) fn size(&self) -> u64 {
        match &self.content {
            Content::File(bytes) => bytes.len() as u64,
            Content::Directory(_) => 0,
        }
    }

    pub(crate) fn children(&self) -> Option<&BTreeMap<String, Link>> {
        match &self.content {
            Content::Directory(children) => Some(children),
            Content::File(_) => None,
        }
    }

    pub(crate) fn attributes(&self, id: u64) -> BasicAttributes {
        BasicAttributes {
            kind: self.kind(),
            size: self.size(),
            creation_time: self.times.creation,
            last_modified_time: self.times.last_modified,
            last_access_time: self.times.last_access,
            file_key: id,
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: FxHashMap<u64, Inode>,
    next_id: u64,
    case_sensitive: bool,
}

impl Tree {
    pub(crate) fn new(case_sensitive: bool, now: FileTime) -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(ROOT, Inode::directory(now));
        Self {
            nodes,
            next_id: ROOT + 1,
            case_sensitive,
        }
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_owned()
        } else {
            name.to_lowercase()
        }
    }

    pub(crate) fn node(&self, id: u64) -> Option<&Inode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: u64) -> Option<&mut Inode> {
        self.nodes.get_mut(&id)
    }

    fn child(&self, dir: u64, name: &str) -> Option<&Link> {
        self.node(dir)?.children()?.get(&self.key(name))
    }

    /// Inode of an absolute, normalized path.
    pub(crate) fn lookup(&self, path: &VirtualPath) -> FsResult<u64> {
        path.names().try_fold(ROOT, |dir, name| {
            self.child(dir, name)
                .map(|link| link.id)
                .ok_or_else(|| FsError::no_such_file(path))
        })
    }

    /// Parent directory inode and last name of an absolute, normalized path.
    pub(crate) fn lookup_parent(&self, path: &VirtualPath) -> FsResult<(u64, String)> {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name_str()) else {
            return Err(FsError::RootDirectory {
                path: path.to_string(),
            });
        };
        let dir = self.lookup(&parent).map_err(|_| FsError::no_such_file(path))?;
        match self.node(dir) {
            Some(inode) if inode.children().is_some() => Ok((dir, name.to_owned())),
            _ => Err(FsError::not_directory(&parent)),
        }
    }

    /// Store `inode` under `name` in directory `parent`.
    pub(crate) fn insert(&mut self, parent: u64, name: &str, inode: Inode) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, inode);
        self.link(parent, name, id);
        id
    }

    pub(crate) fn link(&mut self, parent: u64, name: &str, id: u64) {
        let key = self.key(name);
        if let Some(Inode {
            content: Content::Directory(children),
            ..
        }) = self.nodes.get_mut(&parent)
        {
            children.insert(
                key,
                Link {
                    name: name.to_owned(),
                    id,
                },
            );
        }
    }

    pub(crate) fn unlink(&mut self, parent: u64, name: &str) -> Option<u64> {
        let key = self.key(name);
        match self.nodes.get_mut(&parent) {
            Some(Inode {
                content: Content::Directory(children),
                ..
            }) => children.remove(&key).map(|link| link.id),
            _ => None,
        }
    }

    /// Drop an unlinked inode and everything below it.
    pub(crate) fn release(&mut self, id: u64) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(Inode {
                content: Content::Directory(children),
                ..
            }) = self.nodes.remove(&id)
            {
                pending.extend(children.into_values().map(|link| link.id));
            }
        }
    }

    /// Names of an absolute, normalized path as they were created.
    pub(crate) fn real_names(&self, path: &VirtualPath) -> FsResult<Vec<String>> {
        let mut dir = ROOT;
        let mut names = Vec::with_capacity(path.name_count());
        for name in path.names() {
            let link = self
                .child(dir, name)
                .ok_or_else(|| FsError::no_such_file(path))?;
            names.push(link.name.clone());
            dir = link.id;
        }
        Ok(names)
    }
}
