//! Turns parsed arguments into a run and a process exit code

use super::commands::{CliArgs, Commands};
use crate::config::{ConfigError, RawConfig};
use crate::error::{BobError, EX_OK};
use crate::pipeline::bob;
use crate::util::logging::parse_level;
use crate::util::LoggingConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Logging setup selected by the global flags, falling back to the environment
pub fn logging_config(args: &CliArgs) -> LoggingConfig {
    let from_env = LoggingConfig::from_env();

    let mut config = if let Some(level) = &args.log_level {
        LoggingConfig::with_level(parse_level(level))
    } else if args.verbose {
        LoggingConfig::verbose()
    } else if args.quiet {
        LoggingConfig::quiet()
    } else {
        return from_env;
    };
    config.use_json = from_env.use_json;
    config
}

/// Absolute project root selected by `-C`, or the current directory
pub fn project_root(directory: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match directory {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    };

    fs::canonicalize(&path).map_err(|source| ConfigError::ProjectRoot { path, source })
}

/// Loads `bob.toml` from `root` and layers the command-line overrides on top
pub fn load_config(command: &Commands, root: &Path) -> Result<RawConfig, ConfigError> {
    let mut raw = RawConfig::load(root)?;

    if let Some(args) = command.target_args() {
        if let Some(target) = &args.target {
            raw.set("target", target.as_str());
        }
        if let Some(config) = args.build_config() {
            raw.set("config", config.name());
        }
        if args.no_container {
            raw.set("use_container", false);
        }
    }

    Ok(raw)
}

fn run(args: &CliArgs) -> Result<(), BobError> {
    let root = project_root(args.directory.as_deref())?;
    let raw = load_config(&args.command, &root)?;
    debug!("Raw configuration: {}", raw);

    bob(args.command.action(), &raw, &root)
}

/// Runs the selected command and maps the outcome to an exit code
pub fn handle(args: &CliArgs) -> i32 {
    debug!("Working directory: {:?}", env::current_dir().ok());

    match run(args) {
        Ok(()) => EX_OK,
        Err(e) => {
            error!("{}", e.chain());
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_replace_file_values() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("bob.toml"),
            "config = \"release\"\ntarget = \"native\"\n",
        )
        .unwrap();
        let args = CliArgs::parse_from(["bob", "build", "linux", "--debug", "--no-container"]);

        let raw = load_config(&args.command, temp_dir.path()).unwrap();

        assert_eq!(raw.target(), Some("linux"));
        assert_eq!(raw.config(), Some("Debug"));
        assert_eq!(raw.lookup_bool(&["use_container"]), Some(false));
    }

    #[test]
    fn test_file_values_without_overrides() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bob.toml"), "config = \"debug\"\n").unwrap();
        let args = CliArgs::parse_from(["bob", "bootstrap"]);

        let raw = load_config(&args.command, temp_dir.path()).unwrap();

        assert_eq!(raw.config(), Some("debug"));
        assert_eq!(raw.target(), None);
    }

    #[test]
    fn test_malformed_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bob.toml"), "[targets\n").unwrap();
        let args = CliArgs::parse_from(["bob", "build"]);

        let err = load_config(&args.command, temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = project_root(Some(temp_dir.path())).unwrap();
        assert!(root.is_absolute());

        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            project_root(Some(&missing)),
            Err(ConfigError::ProjectRoot { .. })
        ));
    }

    #[test]
    fn test_logging_config_from_flags() {
        let args = CliArgs::parse_from(["bob", "-v", "bootstrap"]);
        assert_eq!(logging_config(&args).level, tracing::Level::DEBUG);

        let args = CliArgs::parse_from(["bob", "-q", "bootstrap"]);
        assert_eq!(logging_config(&args).level, tracing::Level::ERROR);

        let args = CliArgs::parse_from(["bob", "--log-level", "warn", "bootstrap"]);
        assert_eq!(logging_config(&args).level, tracing::Level::WARN);
    }

    #[test]
    fn test_handle_reports_invalid_target() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();
        let args = CliArgs::parse_from(["bob", "-C", dir, "configure", "mars"]);

        assert_eq!(handle(&args), crate::error::EX_DATAERR);
    }
}
