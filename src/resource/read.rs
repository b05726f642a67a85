//! Stream reading helpers.
//!
//! Two families of readers are provided:
//!
//! - **Byte readers** ([`read_to_string`], [`transfer_to`]) copy the stream
//!   verbatim, so line terminators survive exactly as stored.
//! - **Line readers** ([`read_lines`]) split on `\n` and strip the terminator
//!   (including a preceding `\r`). Re-joining the lines cannot tell which
//!   terminator the source used.

use std::io::{self, BufRead, BufReader, Read, Write};

use super::error::{ResourceError, ResourceResult};

/// Size of the intermediate buffer used by [`read_to_string`].
const CHUNK_SIZE: usize = 1024;

/// Read a stream to the end through a fixed-size buffer and decode it as UTF-8.
///
/// The text keeps every byte of the stream, a leading byte order mark
/// included.
pub fn read_to_string<R: Read>(mut reader: R) -> ResourceResult<String> {
    let mut out = Vec::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(len) => out.extend_from_slice(&buffer[..len]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    String::from_utf8(out).map_err(|_| ResourceError::InvalidUtf8)
}

/// Copy a whole stream into `sink` in one call.
///
/// Returns the number of bytes transferred.
pub fn transfer_to<R: Read, W: Write + ?Sized>(mut reader: R, sink: &mut W) -> io::Result<u64> {
    io::copy(&mut reader, sink)
}

/// Read a stream as lines with terminators stripped.
///
/// The iterator owns the reader; dropping it releases the stream.
pub fn read_lines<R: Read>(reader: R) -> io::Lines<BufReader<R>> {
    BufReader::new(reader).lines()
}
