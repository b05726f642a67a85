//! Byte and line streams over in-memory files.

use std::io::{self, BufRead, BufReader, Cursor, Read, Write};

use super::error::{FsError, FsResult};
use super::fs::MemoryFs;
use super::path::VirtualPath;

/// Line terminator emitted by line-oriented writes on this host.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Line terminator emitted by line-oriented writes on this host.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

// =============================================================================
// Options
// =============================================================================

/// How a file is opened for writing.
///
/// An empty option list means `[Create, TruncateExisting]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenOption {
    /// Create the file if it is missing.
    Create,
    /// Create the file, failing if it exists.
    CreateNew,
    /// Discard existing content.
    TruncateExisting,
    /// Write after existing content.
    Append,
}

/// Resolved form of an [`OpenOption`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenMode {
    pub(crate) create: bool,
    pub(crate) create_new: bool,
    pub(crate) truncate: bool,
    pub(crate) append: bool,
}

impl OpenMode {
    pub(crate) fn from_options(options: &[OpenOption]) -> Self {
        if options.is_empty() {
            return Self {
                create: true,
                create_new: false,
                truncate: true,
                append: false,
            };
        }
        let has = |option| options.contains(&option);
        Self {
            create: has(OpenOption::Create),
            create_new: has(OpenOption::CreateNew),
            truncate: has(OpenOption::TruncateExisting) && !has(OpenOption::Append),
            append: has(OpenOption::Append),
        }
    }
}

/// How [`MemoryFs::copy`] and [`MemoryFs::move_entry`] treat their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyOption {
    /// Replace an existing target (an empty directory or a file).
    ReplaceExisting,
    /// Carry the timestamps over to the copy.
    CopyAttributes,
}

// =============================================================================
// Streams
// =============================================================================

/// Reader over the content a file had when it was opened.
#[derive(Debug)]
pub struct FileReader {
    fs: MemoryFs,
    content: Cursor<Vec<u8>>,
}

impl FileReader {
    pub(crate) fn new(fs: MemoryFs, content: Vec<u8>) -> Self {
        Self {
            fs,
            content: Cursor::new(content),
        }
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fs.ensure_open()?;
        self.content.read(buf)
    }
}

/// Writer that stores into a file on every call.
///
/// In append mode every write lands at the current end of the file;
/// otherwise writes continue from where the previous one stopped.
#[derive(Debug)]
pub struct FileWriter {
    fs: MemoryFs,
    path: VirtualPath,
    id: u64,
    append: bool,
    position: usize,
}

impl FileWriter {
    pub(crate) fn new(fs: MemoryFs, path: VirtualPath, id: u64, append: bool) -> Self {
        Self {
            fs,
            path,
            id,
            append,
            position: 0,
        }
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let position = (!self.append).then_some(self.position);
        self.position = self.fs.write_at(self.id, &self.path, position, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.fs.ensure_open()?;
        Ok(())
    }
}

/// Lines of a file, terminators stripped.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A terminator at the very
/// end of the file does not start another line.
#[derive(Debug)]
pub struct Lines {
    path: VirtualPath,
    reader: BufReader<FileReader>,
}

impl Lines {
    pub(crate) fn new(path: VirtualPath, reader: BufReader<FileReader>) -> Self {
        Self { path, reader }
    }
}

impl Iterator for Lines {
    type Item = FsResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match next_line(&mut self.reader) {
            Ok(Some(bytes)) => Some(String::from_utf8(bytes).map_err(|_| FsError::InvalidUtf8 {
                path: self.path.to_string(),
            })),
            Ok(None) => None,
            Err(err) => Some(Err(fs_error(err, &self.path))),
        }
    }
}

/// Read up to the next terminator, consuming it.
fn next_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    let mut started = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(started.then_some(line));
        }
        started = true;

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                let carriage_return = available[end] == b'\r';
                line.extend_from_slice(&available[..end]);
                reader.consume(end + 1);
                if carriage_return && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(Some(line));
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

/// Recover the filesystem error behind an I/O error from one of our streams.
fn fs_error(err: io::Error, path: &VirtualPath) -> FsError {
    match err.get_ref().and_then(|inner| inner.downcast_ref::<FsError>()) {
        Some(inner) => inner.clone(),
        None => FsError::InvalidUtf8 {
            path: path.to_string(),
        },
    }
}
