//! Option pipeline
//!
//! Turns the merged [`RawConfig`] into [`Settings`]. Only the options every
//! task needs are resolved here: build configuration, build target and the
//! container image. Task-specific options are added later by each task's
//! [`refine_options`](crate::tasks::Task::refine_options) hook.

pub mod settings;
pub mod target;

pub use settings::{BootstrapSettings, ConfigureSettings, DependencySpec, Settings, ToolchainSpec};
pub use target::{BuildTarget, TargetRegistry};

use crate::api::BuildConfig;
use crate::config::RawConfig;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Invalid target specified: {0}")]
    InvalidTarget(String),
}

/// Resolves the settings shared by every task
pub fn parse_options(raw: &RawConfig) -> Result<Settings, OptionsError> {
    let build_config = determine_config(raw);
    let build_target = determine_target(raw)?;
    let container = determine_container(raw, &build_target);
    let use_container = raw.lookup_bool(&["use_container"]).unwrap_or(true);

    let settings = Settings {
        build_config,
        build_target,
        container,
        use_container,
        ..Default::default()
    };
    debug!("Resolved settings: {:?}", settings);

    Ok(settings)
}

fn determine_config(raw: &RawConfig) -> BuildConfig {
    match raw.config() {
        Some(config) if config.eq_ignore_ascii_case("debug") => BuildConfig::Debug,
        Some(_) => BuildConfig::Release,
        None => {
            info!("No build config selected, defaulting to release build config");
            BuildConfig::Release
        }
    }
}

fn determine_target(raw: &RawConfig) -> Result<BuildTarget, OptionsError> {
    let registry = TargetRegistry::from_table(raw.targets());

    match raw.target() {
        Some(name) => registry
            .get(name)
            .cloned()
            .ok_or_else(|| OptionsError::InvalidTarget(name.to_string())),
        None => {
            info!("No build target selected, defaulting to native build target");
            Ok(BuildTarget::native())
        }
    }
}

/// The container image is looked up under the toolchain named after the target
fn determine_container(raw: &RawConfig, target: &BuildTarget) -> Option<String> {
    raw.lookup_str(&["toolchains", target.key(), "container"])
        .map(str::to_string)
}
