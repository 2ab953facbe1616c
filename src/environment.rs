//! Filesystem locations threaded through the tasks alongside the settings

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A location some task was expected to provide but did not
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Location `{0}` has not been set by any task")]
pub struct MissingLocation(pub &'static str);

/// Locations in the codebase, created fresh for every run
///
/// Only `root_path` is known up front; every other location is owned by the
/// task that sets it. Setting a location twice keeps the first value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub root_path: PathBuf,
    dependencies_path: Option<PathBuf>,
    toolchains_path: Option<PathBuf>,
    build_path: Option<PathBuf>,
    source_path: Option<PathBuf>,
}

macro_rules! location {
    ($field:ident, $setter:ident, $key:literal) => {
        pub fn $field(&self) -> Result<&Path, MissingLocation> {
            self.$field.as_deref().ok_or(MissingLocation($key))
        }

        pub fn $setter(&mut self, path: impl Into<PathBuf>) {
            let path = path.into();
            if let Some(existing) = &self.$field {
                if *existing != path {
                    debug!(
                        "Keeping {} = {} (ignoring {})",
                        $key,
                        existing.display(),
                        path.display()
                    );
                }
                return;
            }
            debug!("Setting {} = {}", $key, path.display());
            self.$field = Some(path);
        }
    };
}

impl Environment {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            dependencies_path: None,
            toolchains_path: None,
            build_path: None,
            source_path: None,
        }
    }

    location!(dependencies_path, set_dependencies_path, "dependencies_path");
    location!(toolchains_path, set_toolchains_path, "toolchains_path");
    location!(build_path, set_build_path, "build_path");
    location!(source_path, set_source_path, "source_path");

    /// Resolves a configured folder: relative paths are taken from the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_path.join(path)
        }
    }
}
