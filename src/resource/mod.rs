//! Classpath resources: files bundled with the program.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Resource Lookup Flow                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Anchor::resource("/x.txt")  ──► "x.txt"                    │
//! │  Anchor::resource("a/x.txt") ──► "<package>/a/x.txt"        │
//! │                    │                                        │
//! │                    ▼                                        │
//! │  ResourceLoader::resource(name)                             │
//! │                    │                                        │
//! │                    ├─► leading "/" ──► None                 │
//! │                    │                                        │
//! │                    ├─► Directory entry                      │
//! │                    │   └─► file:/…/x.txt                    │
//! │                    │                                        │
//! │                    └─► Archive entry                        │
//! │                        └─► jar:file:/…/lib.jar!/x.txt       │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every located resource can be opened as a stream. Only `file:` resources
//! can be turned into host paths; see [`uri_to_path`].

mod archive;
mod error;
mod loader;
mod read;
mod uri;

pub use archive::clear_archive_cache;
pub use error::{ResourceError, ResourceResult};
pub use loader::{Anchor, Origin, Resource, ResourceLoader, ResourceStream};
pub use read::{read_lines, read_to_string, transfer_to};
pub use uri::{read_uri_bytes, uri_to_path, FILE_SCHEME, JAR_SCHEME};
