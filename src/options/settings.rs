//! Resolved settings threaded through every task

use super::target::BuildTarget;
use crate::api::BuildConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An external source repository to clone and check out
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencySpec {
    pub repository: String,
    pub tag: String,
}

/// A toolchain archive to download for the current OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSpec {
    pub url: String,
}

/// Settings contributed by the bootstrap task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapSettings {
    pub dependencies: BTreeMap<String, DependencySpec>,
    pub toolchains: BTreeMap<String, ToolchainSpec>,
    /// `dependencies.folder`, when configured
    pub dependencies_folder: Option<PathBuf>,
    /// `toolchains.folder`, when configured
    pub toolchains_folder: Option<PathBuf>,
}

/// Settings contributed by the configure task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureSettings {
    /// Extra tokens appended to the configure command, target ones first
    pub additional_options: Vec<String>,
    pub toolchain_file: Option<String>,
}

/// Settings for a single run
///
/// Built once by [`parse_options`](super::parse_options) and then refined by
/// each task in resolver order. A task only fills its own section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub build_config: BuildConfig,
    pub build_target: BuildTarget,
    /// Container image for the selected target, when its toolchain has one
    pub container: Option<String>,
    /// Whether commands may be wrapped in a container at all
    pub use_container: bool,
    pub bootstrap: Option<BootstrapSettings>,
    pub configure: Option<ConfigureSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            build_config: BuildConfig::default(),
            build_target: BuildTarget::native(),
            container: None,
            use_container: true,
            bootstrap: None,
            configure: None,
        }
    }
}

impl Settings {
    /// Name of the build output folder, e.g. `native-release`
    pub fn output_folder(&self) -> String {
        format!("{}-{}", self.build_target.key(), self.build_config).to_lowercase()
    }

    /// The container image to run commands in, if any
    pub fn active_container(&self) -> Option<&str> {
        if self.use_container {
            self.container.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_folder() {
        assert_eq!(Settings::default().output_folder(), "native-release");
    }

    #[test]
    fn test_debug_output_folder() {
        let settings = Settings {
            build_config: BuildConfig::Debug,
            ..Default::default()
        };
        assert_eq!(settings.output_folder(), "native-debug");
    }

    #[test]
    fn test_active_container_respects_flag() {
        let mut settings = Settings {
            container: Some("renemoll/builder_clang".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.active_container(), Some("renemoll/builder_clang"));

        settings.use_container = false;
        assert_eq!(settings.active_container(), None);
    }
}
