//! The bootstrap task prepares the codebase for building
//!
//! Bootstrapping makes sure the CMake helper module, all source dependencies
//! and all toolchains are available. Building the dependencies themselves is
//! left to the project's build system.
//!
//! Unlike the other tasks, generating the bootstrap commands has side effects:
//! folders are created, the bundled `FindBob.cmake` is written out, and
//! toolchain archives are downloaded and unpacked right away. Every one of
//! these steps is skipped when its result already exists, so re-running
//! bootstrap after a failure picks up where the previous run stopped.

use super::{Task, TaskError};
use crate::api::{Action, CommandVector};
use crate::config::RawConfig;
use crate::environment::Environment;
use crate::fetch::{self, Fetcher};
use crate::options::{BootstrapSettings, DependencySpec, Settings, ToolchainSpec};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toml::Value;
use tracing::{debug, info, warn};

/// File name of the bundled CMake module
pub const TEMPLATE_NAME: &str = "FindBob.cmake";

const TEMPLATE: &str = include_str!("../../templates/FindBob.cmake");

const DEFAULT_DEPENDENCIES_FOLDER: &str = "external";
const DEFAULT_TOOLCHAINS_FOLDER: &str = "toolchains";
const DOWNLOAD_FOLDER: &str = "download";

pub struct BootstrapTask {
    fetcher: Arc<dyn Fetcher>,
}

impl BootstrapTask {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

impl Task for BootstrapTask {
    fn action(&self) -> Action {
        Action::Bootstrap
    }

    fn refine_options(&self, raw: &RawConfig, settings: &mut Settings) -> Result<(), TaskError> {
        if settings.bootstrap.is_some() {
            debug!("Bootstrap settings already present, keeping them");
            return Ok(());
        }

        let bootstrap = BootstrapSettings {
            dependencies: parse_dependencies(raw),
            toolchains: parse_toolchains(raw)?,
            dependencies_folder: raw.lookup_str(&["dependencies", "folder"]).map(PathBuf::from),
            toolchains_folder: raw.lookup_str(&["toolchains", "folder"]).map(PathBuf::from),
        };
        debug!("Bootstrap settings: {:?}", bootstrap);

        settings.bootstrap = Some(bootstrap);
        Ok(())
    }

    fn extend_environment(&self, env: &mut Environment, settings: &Settings) {
        let bootstrap = settings.bootstrap.as_ref();

        let dependencies_path = match bootstrap.and_then(|b| b.dependencies_folder.as_deref()) {
            Some(folder) => env.resolve(folder),
            None => env.root_path.join(DEFAULT_DEPENDENCIES_FOLDER),
        };
        env.set_dependencies_path(dependencies_path);

        let toolchains_path = match bootstrap.and_then(|b| b.toolchains_folder.as_deref()) {
            Some(folder) => env.resolve(folder),
            None => env.root_path.join(DEFAULT_TOOLCHAINS_FOLDER),
        };
        env.set_toolchains_path(toolchains_path);
    }

    fn generate_commands(
        &self,
        settings: &Settings,
        env: &Environment,
    ) -> Result<Vec<CommandVector>, TaskError> {
        let mut result = setup_bob(&env.root_path)?;

        if let Some(bootstrap) = &settings.bootstrap {
            result.extend(gather_dependencies(
                &bootstrap.dependencies,
                env.dependencies_path()?,
            )?);
            gather_toolchains(
                self.fetcher.as_ref(),
                &bootstrap.toolchains,
                env.toolchains_path()?,
            )?;
        }

        Ok(result)
    }
}

/// Keys under which the download URL for the running OS may be listed
fn os_keys() -> Vec<&'static str> {
    match std::env::consts::OS {
        "macos" => vec!["macos", "darwin"],
        os => vec![os],
    }
}

fn parse_dependencies(raw: &RawConfig) -> BTreeMap<String, DependencySpec> {
    let mut deps = BTreeMap::new();

    for (name, value) in raw.dependencies().into_iter().flatten() {
        if !value.is_table() {
            continue;
        }

        match value.clone().try_into::<DependencySpec>() {
            Ok(spec) => {
                deps.insert(name.clone(), spec);
            }
            Err(e) => warn!("Skipping dependency `{}`: {}", name, e.message()),
        }
    }

    deps
}

fn parse_toolchains(raw: &RawConfig) -> Result<BTreeMap<String, ToolchainSpec>, TaskError> {
    let mut tools = BTreeMap::new();
    let keys = os_keys();

    for (name, value) in raw.toolchains().into_iter().flatten() {
        let Value::Table(entry) = value else {
            continue;
        };
        let Some(url) = keys
            .iter()
            .find_map(|key| entry.get(*key).and_then(Value::as_str))
        else {
            continue;
        };

        fetch::validate_url(url)?;
        fetch::strip_archive_suffix(fetch::archive_name(url)?)?;

        tools.insert(
            name.clone(),
            ToolchainSpec {
                url: url.to_string(),
            },
        );
    }

    Ok(tools)
}

/// Creates `<root>/cmake` and provides the bundled CMake module
fn setup_bob(root_path: &Path) -> Result<Vec<CommandVector>, TaskError> {
    let output_folder = root_path.join("cmake");
    debug!("Determined cmake folder: {}", output_folder.display());
    fs::create_dir_all(&output_folder).map_err(TaskError::io("create", &output_folder))?;

    let template = materialize_template()?;

    Ok(vec![
        CommandVector::new([
            "cmake".to_string(),
            "-E".to_string(),
            "make_directory".to_string(),
            path_arg(&output_folder),
        ]),
        CommandVector::new([
            "cmake".to_string(),
            "-E".to_string(),
            "copy".to_string(),
            path_arg(&template),
            path_arg(&output_folder),
        ]),
    ])
}

/// Path the bundled module is staged at before being copied into a project
///
/// Lives in a versioned folder under the system temp dir.
pub fn template_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("{}-{}", crate::NAME, crate::VERSION))
        .join(TEMPLATE_NAME)
}

fn materialize_template() -> Result<PathBuf, TaskError> {
    let path = template_path();
    if fs::read_to_string(&path).ok().as_deref() == Some(TEMPLATE) {
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(TaskError::io("create", parent))?;
    }
    // Concurrent runs each write their own file; the rename is atomic
    let staging = path.with_extension(format!("cmake.{}.tmp", std::process::id()));
    fs::write(&staging, TEMPLATE).map_err(TaskError::io("write", &staging))?;
    fs::rename(&staging, &path).map_err(TaskError::io("write", &path))?;
    debug!("Staged {}", path.display());

    Ok(path)
}

fn gather_dependencies(
    deps: &BTreeMap<String, DependencySpec>,
    output_path: &Path,
) -> Result<Vec<CommandVector>, TaskError> {
    if deps.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Ensure external folder: {}", output_path.display());
    fs::create_dir_all(output_path).map_err(TaskError::io("create", output_path))?;

    let mut result = Vec::new();
    for (name, spec) in deps {
        info!("Found external dependency: {}", name);
        let rep_path = output_path.join(name);

        if !rep_path.exists() {
            result.push(CommandVector::new([
                "git".to_string(),
                "clone".to_string(),
                spec.repository.clone(),
                path_arg(&rep_path),
            ]));
        }

        result.push(CommandVector::new([
            "cmake".to_string(),
            "-E".to_string(),
            "chdir".to_string(),
            path_arg(&rep_path),
            "git".to_string(),
            "checkout".to_string(),
            spec.tag.clone(),
        ]));
    }

    Ok(result)
}

fn gather_toolchains(
    fetcher: &dyn Fetcher,
    toolchains: &BTreeMap<String, ToolchainSpec>,
    output_path: &Path,
) -> Result<(), TaskError> {
    if toolchains.is_empty() {
        return Ok(());
    }

    debug!("Ensure toolchain folder: {}", output_path.display());
    let archive_path = output_path.join(DOWNLOAD_FOLDER);
    fs::create_dir_all(&archive_path).map_err(TaskError::io("create", &archive_path))?;

    for (name, spec) in toolchains {
        info!("Found toolchain dependency: {}", name);
        let archive = fetch::ensure_archive(fetcher, &spec.url, &archive_path)?;
        fetch::ensure_extracted(&archive, output_path)?;
    }

    Ok(())
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
