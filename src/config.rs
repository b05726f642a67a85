//! Configuration for stdlib-tour.
//!
//! This module holds the process-wide classpath used by
//! [`ResourceLoader::system`](crate::resource::ResourceLoader::system).
//! Use [`ConfigBuilder`] at startup to replace the bundled classpath.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global configuration, initialized via [`ConfigBuilder::init`].
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Directory of loose resources shipped with the crate.
pub const BUNDLED_RESOURCES_DIR: &str = "resources";

/// Archive of resources shipped with the crate.
pub const BUNDLED_ARCHIVE: &str = "lib/bundled.jar";

/// One element of the classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// A directory whose files are resources, addressed by their relative path.
    Directory(PathBuf),
    /// A zip archive whose entries are resources.
    Archive(PathBuf),
}

impl ClasspathEntry {
    /// The host path of this entry.
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }
}

/// Runtime configuration for stdlib-tour.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered classpath. Earlier entries shadow later ones.
    pub classpath: Vec<ClasspathEntry>,
}

impl Default for Config {
    fn default() -> Self {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        Self {
            classpath: vec![
                ClasspathEntry::Directory(manifest_dir.join(BUNDLED_RESOURCES_DIR)),
                ClasspathEntry::Archive(manifest_dir.join(BUNDLED_ARCHIVE)),
            ],
        }
    }
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    classpath: Vec<ClasspathEntry>,
}

impl ConfigBuilder {
    /// Create a new configuration builder with an empty classpath.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory of loose resources to the classpath.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.classpath.push(ClasspathEntry::Directory(dir.into()));
        self
    }

    /// Append a zip archive to the classpath.
    ///
    /// # Example
    ///
    /// ```
    /// use stdlib_tour::config::ConfigBuilder;
    ///
    /// let config = ConfigBuilder::new()
    ///     .directory("target/classes")
    ///     .archive("lib/deps.jar")
    ///     .build();
    /// assert_eq!(config.classpath.len(), 2);
    /// ```
    pub fn archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.classpath.push(ClasspathEntry::Archive(archive.into()));
        self
    }

    /// Build the configuration without installing it.
    ///
    /// An empty builder yields the bundled classpath.
    pub fn build(self) -> Config {
        if self.classpath.is_empty() {
            Config::default()
        } else {
            Config {
                classpath: self.classpath,
            }
        }
    }

    /// Build and initialize the global configuration.
    ///
    /// This can only be called once. Subsequent calls are ignored.
    /// Returns `true` if configuration was set, `false` if already initialized.
    pub fn init(self) -> bool {
        CONFIG.set(self.build()).is_ok()
    }
}

/// Initialize stdlib-tour with the bundled classpath.
///
/// This is equivalent to `ConfigBuilder::new().init()`.
pub fn init_default() -> bool {
    ConfigBuilder::new().init()
}

/// Get the current configuration, or default if not initialized.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
