//! Raw configuration for bob
//!
//! Configuration comes from two layers, merged into a single [`RawConfig`]:
//!
//! 1. the project file `bob.toml` in the project root (optional)
//! 2. overrides derived from the command line (`config`, `target`,
//!    `use_container`), inserted on top
//!
//! The raw document is deliberately untyped: project files mix tables and
//! plain values under the same keys (e.g. `dependencies.folder` next to the
//! dependency tables), and every task only picks the parts it understands.
//! All nested lookups go through [`RawConfig::lookup`] and friends, which
//! return `None` for any missing level instead of failing.
//!
//! # Example `bob.toml`
//!
//! ```toml
//! [targets.linux]
//! toolchain = "linux"
//! additional_options.configuration = "-DENABLE_TESTS=ON"
//!
//! # The container is looked up under the toolchain named after the target
//! [toolchains.linux]
//! container = "renemoll/builder_clang"
//! toolchain_file = "cmake/clang.cmake"
//! additional_options.configuration = "-G Ninja"
//!
//! [dependencies.fmt]
//! repository = "https://github.com/fmtlib/fmt.git"
//! tag = "10.1.1"
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "bob.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content is not a valid TOML document
    #[error("Error parsing `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The project directory does not exist or cannot be accessed
    #[error("Invalid project directory `{}`: {source}", path.display())]
    ProjectRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The merged, unvalidated configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    table: Table,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    /// Parses a TOML document
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let table = toml::from_str::<Table>(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { table })
    }

    /// Loads `bob.toml` from the given project root
    ///
    /// A missing file yields an empty configuration.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_file(&root.join(CONFIG_FILE_NAME))
    }

    /// Loads a specific configuration file; a missing file yields an empty configuration
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("Loading settings: {}", path.display());
                Self::parse(&content, path)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No configuration file at {}", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Inserts or replaces a top-level value
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.table.insert(key.to_string(), value.into());
    }

    /// Builder-style variant of [`RawConfig::set`]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn as_table(&self) -> &Table {
        &self.table
    }

    /// Follows a path of keys through nested tables
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.table.get(*first)?;
        for key in rest {
            current = current.as_table()?.get(*key)?;
        }
        Some(current)
    }

    pub fn lookup_str(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path)?.as_str()
    }

    pub fn lookup_table(&self, path: &[&str]) -> Option<&Table> {
        self.lookup(path)?.as_table()
    }

    pub fn lookup_bool(&self, path: &[&str]) -> Option<bool> {
        self.lookup(path)?.as_bool()
    }

    /// Requested build configuration (`config`)
    pub fn config(&self) -> Option<&str> {
        self.lookup_str(&["config"])
    }

    /// Requested build target (`target`)
    pub fn target(&self) -> Option<&str> {
        self.lookup_str(&["target"])
    }

    /// Project-defined targets (`[targets]`)
    pub fn targets(&self) -> Option<&Table> {
        self.lookup_table(&["targets"])
    }

    /// Toolchain definitions (`[toolchains]`)
    pub fn toolchains(&self) -> Option<&Table> {
        self.lookup_table(&["toolchains"])
    }

    /// External dependencies (`[dependencies]`)
    pub fn dependencies(&self) -> Option<&Table> {
        self.lookup_table(&["dependencies"])
    }
}

impl fmt::Display for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[targets.linux]
toolchain = "clang"

[toolchains.clang]
container = "renemoll/builder_clang"

[dependencies]
folder = "third_party"

[dependencies.fmt]
repository = "https://github.com/fmtlib/fmt.git"
tag = "10.1.1"
"#;

    #[test]
    fn test_parse_and_lookup() {
        let config = RawConfig::parse(SAMPLE, Path::new("bob.toml")).unwrap();

        assert_eq!(
            config.lookup_str(&["targets", "linux", "toolchain"]),
            Some("clang")
        );
        assert_eq!(
            config.lookup_str(&["toolchains", "clang", "container"]),
            Some("renemoll/builder_clang")
        );
        assert_eq!(config.lookup_str(&["dependencies", "folder"]), Some("third_party"));
        assert!(config.targets().unwrap().contains_key("linux"));
    }

    #[test]
    fn test_lookup_tolerates_missing_levels() {
        let config = RawConfig::parse(SAMPLE, Path::new("bob.toml")).unwrap();

        assert!(config.lookup(&[]).is_none());
        assert!(config.lookup(&["nope"]).is_none());
        assert!(config.lookup(&["targets", "stm32", "toolchain"]).is_none());
        // Walking through a non-table value
        assert!(config.lookup(&["dependencies", "folder", "x"]).is_none());
        assert!(config.lookup_table(&["dependencies", "folder"]).is_none());
    }

    #[test]
    fn test_overrides() {
        let config = RawConfig::new().with("config", "debug").with("target", "linux");

        assert_eq!(config.config(), Some("debug"));
        assert_eq!(config.target(), Some("linux"));
        assert!(config.toolchains().is_none());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = RawConfig::load(temp_dir.path()).unwrap();
        assert!(config.as_table().is_empty());
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), SAMPLE).unwrap();

        let config = RawConfig::load(temp_dir.path()).unwrap();
        assert!(config.dependencies().unwrap().contains_key("fmt"));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "[targets\nlinux = ").unwrap();

        let result = RawConfig::load(temp_dir.path());
        match result {
            Err(ConfigError::Parse { path, .. }) => {
                assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_message_names_file() {
        let err = RawConfig::parse("= 1", Path::new("project/bob.toml")).unwrap_err();
        assert!(err.to_string().contains("project/bob.toml"));
    }
}
