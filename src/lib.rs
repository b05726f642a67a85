//! # stdlib-tour
//!
//! Executable demonstrations of everyday standard-library behaviour:
//! reading bundled resources, path algebra and file operations on an
//! in-memory filesystem, map construction idioms, and duration and clock
//! arithmetic.
//!
//! Each area is a module with a small API and a test suite. The tests are
//! the demonstrations: every one exercises a single call and checks its
//! observable result.
//!
//! ## Quick Start
//!
//! ```
//! use stdlib_tour::prelude::*;
//!
//! // Bundled resources
//! let loader = ResourceLoader::system();
//! let stream = loader.open("classpath-file.txt").unwrap().unwrap();
//! assert_eq!(read_to_string(stream).unwrap(), "classpathLine1\nclasspathLine2");
//!
//! // In-memory filesystem
//! let fs = MemoryFs::new(Configuration::unix());
//! fs.write_lines(&fs.path("/notes.txt"), ["one", "two"]).unwrap();
//! assert_eq!(fs.read_all_lines(&fs.path("/notes.txt")).unwrap(), ["one", "two"]);
//!
//! // Durations
//! assert_eq!(Duration::parse("PT24H").unwrap(), Duration::of_days(1));
//! ```
//!
//! ## Modules
//!
//! - [`resource`]: classpath lookup over directories and zip archives
//! - [`vfs`]: [`MemoryFs`] and [`VirtualPath`]
//! - [`collection`]: map construction idioms and [`FrozenMap`]
//! - [`time`]: [`Duration`], temporal arithmetic and [`Clock`]s
//! - [`config`]: the process-wide classpath

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
pub mod config;
pub mod resource;
pub mod time;
pub mod vfs;

// =============================================================================
// Prelude - import commonly used items with a single `use`
// =============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use stdlib_tour::prelude::*;
/// ```
pub mod prelude {
    // Resources
    pub use crate::{read_lines, read_to_string, Anchor, ResourceLoader};

    // Filesystem
    pub use crate::{Configuration, CopyOption, FileTime, MemoryFs, OpenOption, VirtualPath};

    // Collections
    pub use crate::{FrozenMap, MapIdiom};

    // Time
    pub use crate::{Adjust, Clock, Duration, FixedClock, SystemClock};
}

// =============================================================================
// Resources
// =============================================================================

pub use resource::{
    read_lines, read_to_string, transfer_to, uri_to_path, Anchor, Resource, ResourceError,
    ResourceLoader, ResourceResult,
};

// =============================================================================
// Filesystem
// =============================================================================

pub use vfs::{
    BasicAttributes, Configuration, CopyOption, FileTime, FsError, FsResult, MemoryFs,
    OpenOption, VirtualPath,
};

// =============================================================================
// Collections and Time
// =============================================================================

pub use collection::{FrozenMap, MapIdiom};
pub use time::{Adjust, Clock, Duration, FixedClock, SystemClock, TimeError, TimeResult};

// =============================================================================
// Infrastructure
// =============================================================================

pub use config::{ClasspathEntry, Config, ConfigBuilder};

#[cfg(test)]
pub(crate) mod test_support {
    use tracing_subscriber::EnvFilter;

    /// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
    pub(crate) fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}
