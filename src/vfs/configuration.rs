//! Naming rules and time source of a [`MemoryFs`](super::MemoryFs).

use std::sync::Arc;

use crate::time::{Clock, SystemClock};

/// Settings fixed when a filesystem is created.
///
/// # Example
///
/// ```
/// use stdlib_tour::vfs::{Configuration, MemoryFs};
///
/// let fs = MemoryFs::new(Configuration::windows().case_sensitive(true));
/// assert_eq!(fs.path("/a/b").to_string(), "\\a\\b");
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) separator: char,
    pub(crate) case_sensitive: bool,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Configuration {
    /// `/` separator, case-sensitive names.
    pub fn unix() -> Self {
        Self {
            separator: '/',
            case_sensitive: true,
            clock: Arc::new(SystemClock::utc()),
        }
    }

    /// `\` separator, case-insensitive names. `/` is accepted when parsing.
    pub fn windows() -> Self {
        Self {
            separator: '\\',
            case_sensitive: false,
            ..Self::unix()
        }
    }

    /// Rules of the host operating system.
    pub fn native() -> Self {
        if cfg!(windows) { Self::windows() } else { Self::unix() }
    }

    /// Override case sensitivity of names.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Clock used to stamp creation, modification and access times.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Name separator used when rendering paths.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Whether names differing only in case are distinct.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::native()
    }
}
