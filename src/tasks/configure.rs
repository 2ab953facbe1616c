//! Configure the build system for the selected target and build configuration

use super::container::wrap;
use super::{Task, TaskError};
use crate::api::{Action, CommandVector};
use crate::config::RawConfig;
use crate::environment::Environment;
use crate::options::{ConfigureSettings, Settings};
use std::path::Path;
use toml::Value;
use tracing::debug;

pub struct ConfigureTask;

impl Task for ConfigureTask {
    fn action(&self) -> Action {
        Action::Configure
    }

    fn depends_on(&self) -> Vec<Action> {
        vec![Action::Bootstrap]
    }

    fn extend_environment(&self, env: &mut Environment, settings: &Settings) {
        env.set_build_path(Path::new("build").join(settings.output_folder()));
        env.set_source_path(".");
    }

    fn refine_options(&self, raw: &RawConfig, settings: &mut Settings) -> Result<(), TaskError> {
        if settings.configure.is_some() {
            debug!("Configure settings already present, keeping them");
            return Ok(());
        }

        let target = settings.build_target.key();
        let toolchain = raw.lookup_str(&["targets", target, "toolchain"]);

        let mut additional_options =
            option_tokens(raw.lookup(&["targets", target, "additional_options", "configuration"]));
        if let Some(toolchain) = toolchain {
            additional_options.extend(option_tokens(raw.lookup(&[
                "toolchains",
                toolchain,
                "additional_options",
                "configuration",
            ])));
        }

        let toolchain_file = toolchain
            .and_then(|t| raw.lookup_str(&["toolchains", t, "toolchain_file"]))
            .map(str::to_string);

        settings.configure = Some(ConfigureSettings {
            additional_options,
            toolchain_file,
        });
        debug!("Configure settings: {:?}", settings.configure);
        Ok(())
    }

    fn generate_commands(
        &self,
        settings: &Settings,
        env: &Environment,
    ) -> Result<Vec<CommandVector>, TaskError> {
        let mut cmake = vec![
            "cmake".to_string(),
            "-B".to_string(),
            env.build_path()?.to_string_lossy().into_owned(),
            "-S".to_string(),
            env.source_path()?.to_string_lossy().into_owned(),
            format!("-DCMAKE_BUILD_TYPE={}", settings.build_config),
        ];

        if let Some(configure) = &settings.configure {
            if let Some(file) = &configure.toolchain_file {
                cmake.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", file));
            }
            cmake.extend(configure.additional_options.iter().cloned());
        }

        Ok(vec![CommandVector::new(wrap(
            settings,
            &env.root_path,
            cmake,
        ))])
    }
}

/// Whitespace-separated tokens from a string, or from each string in an array
fn option_tokens(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BuildConfig;
    use crate::options::parse_options;

    fn raw(content: &str) -> RawConfig {
        RawConfig::parse(content, Path::new("bob.toml")).unwrap()
    }

    fn commands(raw: &RawConfig) -> Vec<CommandVector> {
        let task = ConfigureTask;
        let mut settings = parse_options(raw).unwrap();
        task.refine_options(raw, &mut settings).unwrap();
        let mut env = Environment::new("/src");
        task.extend_environment(&mut env, &settings);
        task.generate_commands(&settings, &env).unwrap()
    }

    #[test]
    fn test_dependency() {
        assert_eq!(ConfigureTask.depends_on(), vec![Action::Bootstrap]);
    }

    #[test]
    fn test_configure_default_options() {
        let result = commands(&RawConfig::new());
        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0],
            ["cmake", "-B", "build/native-release", "-S", ".", "-DCMAKE_BUILD_TYPE=Release"]
        );
    }

    #[test]
    fn test_configure_debug() {
        let result = commands(&RawConfig::new().with("config", "debug"));
        assert_eq!(
            result[0],
            ["cmake", "-B", "build/native-debug", "-S", ".", "-DCMAKE_BUILD_TYPE=Debug"]
        );
    }

    #[test]
    fn test_configure_in_container() {
        let config = raw(
            r#"
target = "linux"

[targets.linux]
toolchain = "linux"

[toolchains.linux]
container = "renemoll/builder_clang"
"#,
        );

        let result = commands(&config);
        assert_eq!(
            result[0],
            [
                "docker",
                "run",
                "--rm",
                "-v",
                "/src:/work/",
                "renemoll/builder_clang",
                "cmake",
                "-B",
                "build/linux-release",
                "-S",
                ".",
                "-DCMAKE_BUILD_TYPE=Release"
            ]
        );
    }

    #[test]
    fn test_configure_without_container() {
        let config = raw(
            r#"
target = "linux"
use_container = false

[targets.linux]
[toolchains.linux]
container = "renemoll/builder_clang"
"#,
        );

        let result = commands(&config);
        assert_eq!(result[0].program(), Some("cmake"));
    }

    #[test]
    fn test_toolchain_file_precedes_additional_options() {
        let config = raw(
            r#"
target = "stm32"

[targets.stm32]
toolchain = "arm"
additional_options.configuration = "-DBOARD=nucleo  -DUSE_HAL=ON"

[toolchains.arm]
toolchain_file = "cmake/arm-none-eabi.cmake"
additional_options.configuration = "-DCMAKE_EXPORT_COMPILE_COMMANDS=ON"
"#,
        );

        let result = commands(&config);
        assert_eq!(
            result[0],
            [
                "cmake",
                "-B",
                "build/stm32-release",
                "-S",
                ".",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DCMAKE_TOOLCHAIN_FILE=cmake/arm-none-eabi.cmake",
                "-DBOARD=nucleo",
                "-DUSE_HAL=ON",
                "-DCMAKE_EXPORT_COMPILE_COMMANDS=ON"
            ]
        );
    }

    #[test]
    fn test_missing_toolchain_section_is_ignored() {
        let config = raw(
            r#"
target = "stm32"

[targets.stm32]
toolchain = "arm"
"#,
        );

        let task = ConfigureTask;
        let mut settings = parse_options(&config).unwrap();
        task.refine_options(&config, &mut settings).unwrap();

        assert_eq!(settings.configure, Some(ConfigureSettings::default()));
    }

    #[test]
    fn test_option_tokens_from_array() {
        let value = Value::Array(vec![
            Value::String("-DA=1 -DB=2".to_string()),
            Value::Integer(3),
            Value::String("-DC=3".to_string()),
        ]);
        assert_eq!(option_tokens(Some(&value)), vec!["-DA=1", "-DB=2", "-DC=3"]);
        assert!(option_tokens(None).is_empty());
    }

    #[test]
    fn test_missing_build_path() {
        let settings = Settings {
            build_config: BuildConfig::Debug,
            ..Default::default()
        };
        let result = ConfigureTask.generate_commands(&settings, &Environment::new("/src"));
        assert!(matches!(result, Err(TaskError::MissingLocation(_))));
    }
}
