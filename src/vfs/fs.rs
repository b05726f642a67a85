//! The in-memory filesystem.

use std::fmt;
use std::hash::Hasher;
use std::io::{BufReader, BufWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHasher;
use tracing::{debug, trace};

use super::attr::{AttributeValue, BasicAttributes, FileKind, FileTime, Permissions};
use super::configuration::Configuration;
use super::error::{FsError, FsResult};
use super::io::{CopyOption, FileReader, FileWriter, Lines, OpenMode, OpenOption, LINE_SEPARATOR};
use super::path::{FsId, PathSyntax, VirtualPath};
use super::tree::{Content, Inode, ROOT, Tree};
use super::walk::{DirStream, Find};

/// Suffix of temporary files created without one.
const DEFAULT_TEMP_SUFFIX: &str = ".tmp";

/// A filesystem held entirely in memory.
///
/// Starts with an empty root directory. Clones share the same contents.
/// Relative paths are resolved against the root.
///
/// # Example
///
/// ```
/// use stdlib_tour::vfs::{Configuration, MemoryFs};
///
/// let fs = MemoryFs::new(Configuration::unix());
/// let dir = fs.path("/dirOne");
/// fs.create_directory(&dir).unwrap();
/// fs.write(&dir.resolve("fileTwo.txt"), b"hello", &[]).unwrap();
///
/// assert!(fs.is_regular_file(&fs.path("/dirOne/fileTwo.txt")));
/// assert_eq!(fs.read_to_string(&fs.path("/dirOne/fileTwo.txt")).unwrap(), "hello");
/// ```
#[derive(Clone)]
pub struct MemoryFs {
    shared: Arc<Shared>,
}

struct Shared {
    syntax: PathSyntax,
    config: Configuration,
    tree: RwLock<Tree>,
    open: AtomicBool,
    temp_counter: AtomicU64,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new(config: Configuration) -> Self {
        let syntax = PathSyntax {
            fs: FsId::next(),
            separator: config.separator,
            case_sensitive: config.case_sensitive,
        };
        let now = FileTime::from_instant(config.clock.instant());
        debug!(fs = syntax.fs.get(), separator = %config.separator, "created in-memory filesystem");
        Self {
            shared: Arc::new(Shared {
                syntax,
                tree: RwLock::new(Tree::new(config.case_sensitive, now)),
                config,
                open: AtomicBool::new(true),
                temp_counter: AtomicU64::new(0),
            }),
        }
    }

    /// Identity shared by every path of this filesystem.
    pub fn id(&self) -> FsId {
        self.shared.syntax.fs
    }

    /// Settings this filesystem was created with.
    pub fn configuration(&self) -> &Configuration {
        &self.shared.config
    }

    /// Parse a path.
    pub fn path(&self, text: &str) -> VirtualPath {
        self.shared.syntax.parse(text)
    }

    /// Parse and join several parts into one path.
    pub fn path_of<'a>(&self, first: &str, more: impl IntoIterator<Item = &'a str>) -> VirtualPath {
        self.shared.syntax.join(first, more)
    }

    /// The root directory.
    pub fn root(&self) -> VirtualPath {
        self.path("/")
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the filesystem. Every later operation fails with
    /// [`FsError::Closed`], including on streams opened before.
    pub fn close(&self) {
        if self.shared.open.swap(false, Ordering::AcqRel) {
            debug!(fs = self.id().get(), "closed in-memory filesystem");
        }
    }

    /// Whether [`close`](Self::close) has not been called yet.
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> FsResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(FsError::Closed)
        }
    }

    fn read_tree(&self) -> FsResult<RwLockReadGuard<'_, Tree>> {
        self.ensure_open()?;
        Ok(self.shared.tree.read())
    }

    fn write_tree(&self) -> FsResult<RwLockWriteGuard<'_, Tree>> {
        self.ensure_open()?;
        Ok(self.shared.tree.write())
    }

    fn now(&self) -> FileTime {
        FileTime::from_instant(self.shared.config.clock.instant())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn inspect<T>(&self, path: &VirtualPath, f: impl FnOnce(&Inode) -> T) -> Option<T> {
        let tree = self.read_tree().ok()?;
        let id = tree.lookup(&path.to_absolute()).ok()?;
        tree.node(id).map(f)
    }

    /// Whether the path names an entry.
    pub fn exists(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |_| ()).is_some()
    }

    /// Whether the path is known not to exist. False on a closed filesystem.
    pub fn not_exists(&self, path: &VirtualPath) -> bool {
        self.is_open() && !self.exists(path)
    }

    /// Whether the path names a regular file.
    pub fn is_regular_file(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |inode| inode.kind() == FileKind::Regular)
            .unwrap_or(false)
    }

    /// Whether the path names a directory.
    pub fn is_directory(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |inode| inode.kind() == FileKind::Directory)
            .unwrap_or(false)
    }

    /// Whether the entry exists and may be read.
    pub fn is_readable(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |inode| inode.permissions.readable)
            .unwrap_or(false)
    }

    /// Whether the entry exists and may be written.
    pub fn is_writable(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |inode| inode.permissions.writable)
            .unwrap_or(false)
    }

    /// Whether the entry exists and may be executed.
    pub fn is_executable(&self, path: &VirtualPath) -> bool {
        self.inspect(path, |inode| inode.permissions.executable)
            .unwrap_or(false)
    }

    /// Whether both paths locate the same entry.
    ///
    /// Equal paths are the same file without touching the filesystem.
    pub fn is_same_file(&self, a: &VirtualPath, b: &VirtualPath) -> FsResult<bool> {
        self.ensure_open()?;
        if a == b {
            return Ok(true);
        }
        let tree = self.read_tree()?;
        Ok(tree.lookup(&a.to_absolute())? == tree.lookup(&b.to_absolute())?)
    }

    /// Absolute, normalized form of an existing path, with names spelled as
    /// they were created.
    pub fn to_real_path(&self, path: &VirtualPath) -> FsResult<VirtualPath> {
        let names = self.read_tree()?.real_names(&path.to_absolute())?;
        Ok(names.iter().fold(self.root(), |real, name| real.child(name)))
    }

    /// Snapshot of the basic attributes.
    pub fn attributes(&self, path: &VirtualPath) -> FsResult<BasicAttributes> {
        let tree = self.read_tree()?;
        let id = tree.lookup(&path.to_absolute())?;
        let inode = tree.node(id).ok_or_else(|| FsError::no_such_file(path))?;
        Ok(inode.attributes(id))
    }

    /// Look up one basic attribute by name, e.g. `"creationTime"`.
    pub fn get_attribute(&self, path: &VirtualPath, name: &str) -> FsResult<AttributeValue> {
        self.attributes(path)?.get(name)
    }

    /// Content length in bytes.
    pub fn size(&self, path: &VirtualPath) -> FsResult<u64> {
        Ok(self.attributes(path)?.size)
    }

    /// Last content modification.
    pub fn last_modified_time(&self, path: &VirtualPath) -> FsResult<FileTime> {
        Ok(self.attributes(path)?.last_modified_time)
    }

    /// Accessibility flags.
    pub fn permissions(&self, path: &VirtualPath) -> FsResult<Permissions> {
        let tree = self.read_tree()?;
        let id = tree.lookup(&path.to_absolute())?;
        tree.node(id)
            .map(|inode| inode.permissions)
            .ok_or_else(|| FsError::no_such_file(path))
    }

    // =========================================================================
    // Attribute Updates
    // =========================================================================

    fn update(&self, path: &VirtualPath, f: impl FnOnce(&mut Inode)) -> FsResult<()> {
        let mut tree = self.write_tree()?;
        let id = tree.lookup(&path.to_absolute())?;
        let inode = tree.node_mut(id).ok_or_else(|| FsError::no_such_file(path))?;
        f(inode);
        Ok(())
    }

    /// Set any of the three timestamps; `None` leaves one unchanged.
    pub fn set_times(
        &self,
        path: &VirtualPath,
        last_modified: Option<FileTime>,
        last_access: Option<FileTime>,
        creation: Option<FileTime>,
    ) -> FsResult<()> {
        self.update(path, |inode| {
            let times = &mut inode.times;
            times.last_modified = last_modified.unwrap_or(times.last_modified);
            times.last_access = last_access.unwrap_or(times.last_access);
            times.creation = creation.unwrap_or(times.creation);
        })
    }

    /// Set the last modification time.
    pub fn set_last_modified_time(&self, path: &VirtualPath, time: FileTime) -> FsResult<()> {
        self.set_times(path, Some(time), None, None)
    }

    /// Replace the accessibility flags.
    pub fn set_permissions(&self, path: &VirtualPath, permissions: Permissions) -> FsResult<()> {
        self.update(path, |inode| inode.permissions = permissions)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn create(&self, path: &VirtualPath, inode: Inode) -> FsResult<VirtualPath> {
        let target = path.to_absolute();
        let now = inode.times.creation;
        let kind = inode.kind();
        let mut tree = self.write_tree()?;
        if tree.lookup(&target).is_ok() {
            return Err(FsError::already_exists(path));
        }
        let (parent, name) = tree.lookup_parent(&target)?;
        tree.insert(parent, &name, inode);
        touch_directory(&mut tree, parent, now);
        debug!(path = %target, ?kind, "created entry");
        Ok(path.clone())
    }

    /// Create an empty regular file. The parent directory must exist.
    pub fn create_file(&self, path: &VirtualPath) -> FsResult<VirtualPath> {
        self.create(path, Inode::file(self.now()))
    }

    /// Create a directory. The parent directory must exist.
    pub fn create_directory(&self, path: &VirtualPath) -> FsResult<VirtualPath> {
        self.create(path, Inode::directory(self.now()))
    }

    /// Create a directory and any missing parents.
    ///
    /// Succeeds if the directory already exists; fails if some prefix of the
    /// path is a regular file.
    pub fn create_directories(&self, path: &VirtualPath) -> FsResult<VirtualPath> {
        let target = path.to_absolute();
        let now = self.now();
        let mut tree = self.write_tree()?;
        let mut dir = ROOT;
        let mut current = self.root();
        for name in target.names() {
            current = current.child(name);
            dir = match tree.lookup(&current) {
                Ok(id) if tree.node(id).is_some_and(|inode| inode.children().is_some()) => id,
                Ok(_) => return Err(FsError::already_exists(&current)),
                Err(_) => {
                    debug!(path = %current, "created directory");
                    let id = tree.insert(dir, name, Inode::directory(now));
                    touch_directory(&mut tree, dir, now);
                    id
                }
            };
        }
        Ok(path.clone())
    }

    /// Create a new empty file in `dir` named `<prefix><token><suffix>`.
    ///
    /// A missing prefix is empty and a missing suffix is `.tmp`.
    pub fn create_temp_file(
        &self,
        dir: &VirtualPath,
        prefix: Option<&str>,
        suffix: Option<&str>,
    ) -> FsResult<VirtualPath> {
        let prefix = prefix.unwrap_or_default();
        let suffix = suffix.unwrap_or(DEFAULT_TEMP_SUFFIX);
        loop {
            let candidate = dir.child(&format!("{prefix}{}{suffix}", self.temp_token()));
            match self.create_file(&candidate) {
                Err(FsError::FileAlreadyExists { .. }) => continue,
                result => return result,
            }
        }
    }

    fn temp_token(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.id().get());
        hasher.write_u64(self.shared.temp_counter.fetch_add(1, Ordering::Relaxed));
        hasher.finish()
    }

    // =========================================================================
    // Removal, Copy, Move
    // =========================================================================

    /// Delete a file or an empty directory.
    pub fn delete(&self, path: &VirtualPath) -> FsResult<()> {
        let target = path.to_absolute();
        let now = self.now();
        let mut tree = self.write_tree()?;
        let id = tree.lookup(&target)?;
        if id == ROOT {
            return Err(FsError::RootDirectory {
                path: path.to_string(),
            });
        }
        if tree
            .node(id)
            .and_then(Inode::children)
            .is_some_and(|children| !children.is_empty())
        {
            return Err(FsError::not_empty(path));
        }
        let (parent, name) = tree.lookup_parent(&target)?;
        tree.unlink(parent, &name);
        tree.release(id);
        touch_directory(&mut tree, parent, now);
        debug!(path = %target, "deleted entry");
        Ok(())
    }

    /// Delete the entry if it exists. Returns whether it did.
    pub fn delete_if_exists(&self, path: &VirtualPath) -> FsResult<bool> {
        match self.delete(path) {
            Ok(()) => Ok(true),
            Err(FsError::NoSuchFile { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Copy an entry.
    ///
    /// Directories are copied without their children. An existing target
    /// is only replaced with [`CopyOption::ReplaceExisting`], and never if
    /// it is a non-empty directory.
    pub fn copy(&self, source: &VirtualPath, target: &VirtualPath, options: &[CopyOption]) -> FsResult<()> {
        let (from, to) = (source.to_absolute(), target.to_absolute());
        let now = self.now();
        let mut tree = self.write_tree()?;
        let source_id = tree.lookup(&from)?;
        let (parent, name) = tree.lookup_parent(&to)?;
        if let Ok(existing) = tree.lookup(&to) {
            if existing == source_id {
                return Ok(());
            }
            clear_target(&mut tree, &to, existing, options)?;
        }

        let original = tree.node(source_id).ok_or_else(|| FsError::no_such_file(source))?;
        let mut copy = match &original.content {
            Content::File(bytes) => Inode {
                content: Content::File(bytes.clone()),
                ..Inode::file(now)
            },
            Content::Directory(_) => Inode::directory(now),
        };
        copy.permissions = original.permissions;
        if options.contains(&CopyOption::CopyAttributes) {
            copy.times = original.times;
        }

        tree.insert(parent, &name, copy);
        touch_directory(&mut tree, parent, now);
        debug!(source = %from, target = %to, "copied entry");
        Ok(())
    }

    /// Move an entry, keeping its identity and timestamps.
    ///
    /// Directories move with everything below them.
    pub fn move_entry(
        &self,
        source: &VirtualPath,
        target: &VirtualPath,
        options: &[CopyOption],
    ) -> FsResult<()> {
        let (from, to) = (source.to_absolute(), target.to_absolute());
        let now = self.now();
        let mut tree = self.write_tree()?;
        let source_id = tree.lookup(&from)?;
        if source_id == ROOT {
            return Err(FsError::RootDirectory {
                path: source.to_string(),
            });
        }
        if let Ok(existing) = tree.lookup(&to) {
            if existing == source_id {
                return Ok(());
            }
        }
        if to.starts_with(&from) {
            return Err(FsError::InvalidMove {
                source_path: source.to_string(),
                target: target.to_string(),
            });
        }
        let (target_parent, target_name) = tree.lookup_parent(&to)?;
        if let Ok(existing) = tree.lookup(&to) {
            clear_target(&mut tree, &to, existing, options)?;
        }

        let (source_parent, source_name) = tree.lookup_parent(&from)?;
        tree.unlink(source_parent, &source_name);
        tree.link(target_parent, &target_name, source_id);
        touch_directory(&mut tree, source_parent, now);
        touch_directory(&mut tree, target_parent, now);
        debug!(source = %from, target = %to, "moved entry");
        Ok(())
    }

    // =========================================================================
    // Directory Traversal
    // =========================================================================

    pub(crate) fn child_paths(&self, dir: &VirtualPath) -> FsResult<Vec<VirtualPath>> {
        let tree = self.read_tree()?;
        let id = tree.lookup(&dir.to_absolute())?;
        let children = tree
            .node(id)
            .and_then(Inode::children)
            .ok_or_else(|| FsError::not_directory(dir))?;
        Ok(children.values().map(|link| dir.child(&link.name)).collect())
    }

    /// Stream the immediate children of a directory.
    pub fn list(&self, dir: &VirtualPath) -> FsResult<DirStream> {
        let entries = self.child_paths(dir)?;
        trace!(dir = %dir, count = entries.len(), "listed directory");
        Ok(DirStream::new(self.clone(), entries))
    }

    /// Walk the tree below `start` up to `max_depth` levels, yielding the
    /// entries for which `predicate` holds.
    pub fn find<P>(&self, start: &VirtualPath, max_depth: usize, predicate: P) -> FsResult<Find<P>>
    where
        P: FnMut(&VirtualPath, &BasicAttributes) -> bool,
    {
        self.attributes(start)?;
        Ok(Find::new(self.clone(), start.clone(), max_depth, predicate))
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Whole content of a regular file.
    pub fn read_all_bytes(&self, path: &VirtualPath) -> FsResult<Vec<u8>> {
        let target = path.to_absolute();
        let now = self.now();
        let mut tree = self.write_tree()?;
        let id = tree.lookup(&target)?;
        let inode = tree.node_mut(id).ok_or_else(|| FsError::no_such_file(path))?;
        if !inode.permissions.readable {
            return Err(FsError::access_denied(path));
        }
        let bytes = match &inode.content {
            Content::File(bytes) => bytes.clone(),
            Content::Directory(_) => return Err(FsError::is_directory(path)),
        };
        inode.times.last_access = now;
        trace!(path = %target, len = bytes.len(), "read file");
        Ok(bytes)
    }

    /// Whole content of a regular file as UTF-8 text.
    pub fn read_to_string(&self, path: &VirtualPath) -> FsResult<String> {
        String::from_utf8(self.read_all_bytes(path)?).map_err(|_| FsError::InvalidUtf8 {
            path: path.to_string(),
        })
    }

    /// Lines of a UTF-8 file with terminators removed.
    ///
    /// Splits like [`lines`](Self::lines): `\n`, `\r\n` and a lone `\r`.
    pub fn read_all_lines(&self, path: &VirtualPath) -> FsResult<Vec<String>> {
        self.lines(path)?.collect()
    }

    /// Write `bytes` to a file.
    ///
    /// With no options the file is created if missing and truncated
    /// otherwise.
    pub fn write(&self, path: &VirtualPath, bytes: &[u8], options: &[OpenOption]) -> FsResult<()> {
        let target = path.to_absolute();
        let mode = OpenMode::from_options(options);
        let now = self.now();
        let mut tree = self.write_tree()?;
        let id = open_file(&mut tree, &target, mode, now)?;
        let position = if mode.append { None } else { Some(0) };
        write_bytes(&mut tree, id, &target, position, bytes, now)?;
        trace!(path = %target, len = bytes.len(), "wrote file");
        Ok(())
    }

    /// Write each line followed by [`LINE_SEPARATOR`], replacing the content.
    pub fn write_lines<I>(&self, path: &VirtualPath, lines: I) -> FsResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut bytes = Vec::new();
        for line in lines {
            bytes.extend_from_slice(line.as_ref().as_bytes());
            bytes.extend_from_slice(LINE_SEPARATOR.as_bytes());
        }
        self.write(path, &bytes, &[])
    }

    /// Buffered reader over the current content of a file.
    pub fn new_buffered_reader(&self, path: &VirtualPath) -> FsResult<BufReader<FileReader>> {
        let bytes = self.read_all_bytes(path)?;
        Ok(BufReader::new(FileReader::new(self.clone(), bytes)))
    }

    /// Buffered writer into a file, opened like [`write`](Self::write).
    pub fn new_buffered_writer(
        &self,
        path: &VirtualPath,
        options: &[OpenOption],
    ) -> FsResult<BufWriter<FileWriter>> {
        let target = path.to_absolute();
        let mode = OpenMode::from_options(options);
        let now = self.now();
        let id = open_file(&mut *self.write_tree()?, &target, mode, now)?;
        Ok(BufWriter::new(FileWriter::new(self.clone(), target, id, mode.append)))
    }

    /// Lazily read the lines of a file.
    pub fn lines(&self, path: &VirtualPath) -> FsResult<Lines> {
        Ok(Lines::new(path.clone(), self.new_buffered_reader(path)?))
    }

    /// Write `buf` into inode `id` at `position`, or at the end for `None`.
    /// Returns the position after the written bytes.
    pub(crate) fn write_at(
        &self,
        id: u64,
        path: &VirtualPath,
        position: Option<usize>,
        buf: &[u8],
    ) -> FsResult<usize> {
        let now = self.now();
        write_bytes(&mut *self.write_tree()?, id, path, position, buf, now)
    }
}

impl fmt::Debug for MemoryFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFs")
            .field("id", &self.id().get())
            .field("separator", &self.shared.syntax.separator)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tree Helpers
// =============================================================================

fn touch_directory(tree: &mut Tree, dir: u64, now: FileTime) {
    if let Some(inode) = tree.node_mut(dir) {
        inode.times.last_modified = now;
    }
}

/// Remove an existing copy or move target, if the options allow it.
fn clear_target(tree: &mut Tree, target: &VirtualPath, existing: u64, options: &[CopyOption]) -> FsResult<()> {
    if !options.contains(&CopyOption::ReplaceExisting) {
        return Err(FsError::already_exists(target));
    }
    if existing == ROOT {
        return Err(FsError::RootDirectory {
            path: target.to_string(),
        });
    }
    if tree
        .node(existing)
        .and_then(Inode::children)
        .is_some_and(|children| !children.is_empty())
    {
        return Err(FsError::not_empty(target));
    }
    let (parent, name) = tree.lookup_parent(target)?;
    tree.unlink(parent, &name);
    tree.release(existing);
    Ok(())
}

/// Resolve the file a write goes to, creating or truncating it per `mode`.
fn open_file(tree: &mut Tree, target: &VirtualPath, mode: OpenMode, now: FileTime) -> FsResult<u64> {
    match tree.lookup(target) {
        Ok(_) if mode.create_new => Err(FsError::already_exists(target)),
        Ok(id) => {
            let inode = tree.node_mut(id).ok_or_else(|| FsError::no_such_file(target))?;
            if !inode.permissions.writable {
                return Err(FsError::access_denied(target));
            }
            match &mut inode.content {
                Content::Directory(_) => Err(FsError::is_directory(target)),
                Content::File(bytes) => {
                    if mode.truncate {
                        bytes.clear();
                        inode.times.last_modified = now;
                    }
                    Ok(id)
                }
            }
        }
        Err(_) if mode.create || mode.create_new => {
            let (parent, name) = tree.lookup_parent(target)?;
            let id = tree.insert(parent, &name, Inode::file(now));
            touch_directory(tree, parent, now);
            debug!(path = %target, "created file for writing");
            Ok(id)
        }
        Err(err) => Err(err),
    }
}

fn write_bytes(
    tree: &mut Tree,
    id: u64,
    path: &VirtualPath,
    position: Option<usize>,
    buf: &[u8],
    now: FileTime,
) -> FsResult<usize> {
    let inode = tree.node_mut(id).ok_or_else(|| FsError::no_such_file(path))?;
    let Content::File(bytes) = &mut inode.content else {
        return Err(FsError::is_directory(path));
    };
    let start = position.unwrap_or(bytes.len());
    let end = start + buf.len();
    if bytes.len() < end {
        bytes.resize(end, 0);
    }
    bytes[start..end].copy_from_slice(buf);
    inode.times.last_modified = now;
    inode.times.last_access = now;
    Ok(end)
}
