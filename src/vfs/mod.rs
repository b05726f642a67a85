//! In-memory filesystem and path algebra.
//!
//! [`MemoryFs`] holds a tree of directories and regular files. [`VirtualPath`]
//! values are produced by a filesystem and carry its identity and naming
//! rules; all path arithmetic is pure and never consults the tree.
//!
//! ```text
//! MemoryFs ──path()──► VirtualPath ──normalize / resolve / relativize──► VirtualPath
//!    │                                                                      │
//!    └────────── exists / create_* / copy / write / find ◄──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use stdlib_tour::vfs::{Configuration, MemoryFs};
//!
//! let fs = MemoryFs::new(Configuration::unix());
//! fs.create_directories(&fs.path("/dirOne/dirTwo")).unwrap();
//! fs.create_file(&fs.path("/dirOne/dirTwo/file.txt")).unwrap();
//!
//! let found: Vec<_> = fs
//!     .find(&fs.root(), 3, |_, attrs| attrs.is_regular_file())
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(found, vec![fs.path("/dirOne/dirTwo/file.txt")]);
//! ```

mod attr;
mod configuration;
mod error;
mod fs;
mod io;
mod path;
mod tree;
mod walk;

pub use attr::{AttributeValue, BasicAttributes, FileKind, FileTime, Permissions};
pub use configuration::Configuration;
pub use error::{FsError, FsResult};
pub use fs::MemoryFs;
pub use io::{CopyOption, FileReader, FileWriter, LINE_SEPARATOR, Lines, OpenOption};
pub use path::{FsId, PathLike, VirtualPath};
pub use walk::{DirStream, Find};
