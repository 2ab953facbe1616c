use crate::api::{Action, BuildConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build orchestrator for CMake projects
#[derive(Parser, Debug)]
#[command(
    name = "bob",
    about = "Build orchestrator for CMake projects",
    version,
    author,
    long_about = "bob turns a build action into the git, cmake and docker invocations it \
                  needs, driven by the project's bob.toml. Requesting an action runs all \
                  of its prerequisites first: install builds, build configures, and \
                  configure bootstraps."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        help = "Project root (defaults to the current directory)"
    )]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Fetch dependencies and toolchains",
        long_about = "Installs the bob CMake module into ./cmake, clones or updates every \
                      dependency listed in bob.toml and downloads the toolchains for the \
                      current OS.\n\n\
                      Examples:\n  \
                      bob bootstrap"
    )]
    Bootstrap,

    #[command(
        about = "Configure the build system",
        long_about = "Runs cmake for the selected target and build configuration.\n\n\
                      Examples:\n  \
                      bob configure\n  \
                      bob configure linux --debug"
    )]
    Configure(TargetArgs),

    #[command(
        about = "Build the project",
        long_about = "Configures (if needed) and builds the selected target.\n\n\
                      Examples:\n  \
                      bob build\n  \
                      bob build stm32 --release\n  \
                      bob build linux --no-container"
    )]
    Build(TargetArgs),

    #[command(about = "Build and install the project")]
    Install(TargetArgs),
}

impl Commands {
    pub fn action(&self) -> Action {
        match self {
            Self::Bootstrap => Action::Bootstrap,
            Self::Configure(_) => Action::Configure,
            Self::Build(_) => Action::Build,
            Self::Install(_) => Action::Install,
        }
    }

    pub fn target_args(&self) -> Option<&TargetArgs> {
        match self {
            Self::Bootstrap => None,
            Self::Configure(args) | Self::Build(args) | Self::Install(args) => Some(args),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    #[arg(value_name = "TARGET", help = "Build target (defaults to native)")]
    pub target: Option<String>,

    #[arg(long, conflicts_with = "release", help = "Debug build configuration")]
    pub debug: bool,

    #[arg(long, help = "Release build configuration (default)")]
    pub release: bool,

    #[arg(long, help = "Run commands on the host even if the target has a container")]
    pub no_container: bool,
}

impl TargetArgs {
    /// The configuration requested on the command line, if any
    pub fn build_config(&self) -> Option<BuildConfig> {
        if self.debug {
            Some(BuildConfig::Debug)
        } else if self.release {
            Some(BuildConfig::Release)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_bootstrap() {
        let args = CliArgs::parse_from(["bob", "bootstrap"]);
        assert_eq!(args.command.action(), Action::Bootstrap);
        assert!(args.command.target_args().is_none());
        assert!(args.directory.is_none());
    }

    #[test]
    fn test_bootstrap_takes_no_target() {
        assert!(CliArgs::try_parse_from(["bob", "bootstrap", "linux"]).is_err());
    }

    #[test]
    fn test_default_build_args() {
        let args = CliArgs::parse_from(["bob", "build"]);
        match args.command {
            Commands::Build(target_args) => {
                assert!(target_args.target.is_none());
                assert_eq!(target_args.build_config(), None);
                assert!(!target_args.no_container);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_configure_with_options() {
        let args = CliArgs::parse_from(["bob", "configure", "linux", "--debug", "--no-container"]);
        assert_eq!(args.command.action(), Action::Configure);

        let target_args = args.command.target_args().unwrap();
        assert_eq!(target_args.target.as_deref(), Some("linux"));
        assert_eq!(target_args.build_config(), Some(BuildConfig::Debug));
        assert!(target_args.no_container);
    }

    #[test]
    fn test_release_flag() {
        let args = CliArgs::parse_from(["bob", "install", "--release"]);
        assert_eq!(
            args.command.target_args().unwrap().build_config(),
            Some(BuildConfig::Release)
        );
    }

    #[test]
    fn test_debug_conflicts_with_release() {
        assert!(CliArgs::try_parse_from(["bob", "build", "--debug", "--release"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["bob", "build", "-v", "-C", "/tmp/project"]);
        assert!(args.verbose);
        assert!(!args.quiet);
        assert_eq!(args.directory, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["bob", "-q", "-v", "build"]).is_err());
    }

    #[test]
    fn test_log_level_flag() {
        let args = CliArgs::parse_from(["bob", "--log-level", "debug", "bootstrap"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_unknown_command() {
        assert!(CliArgs::try_parse_from(["bob", "format"]).is_err());
    }
}
