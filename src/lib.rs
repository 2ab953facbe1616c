//! bob - build orchestrator for CMake projects
//!
//! bob turns a requested build action into the sequence of external
//! commands (git, cmake, docker) that carries it out, driven by the
//! project's `bob.toml` and command-line overrides.
//!
//! # Core Concepts
//!
//! - **Actions and tasks**: every [`Action`] is implemented by one
//!   [`Task`](tasks::Task). Tasks declare the actions they depend on and the
//!   [`resolver`](pipeline::resolver) orders them.
//! - **Settings**: the typed result of the option pipeline. Each task refines
//!   its own section during the planning pass.
//! - **Environment**: filesystem locations (build folder, dependency folder,
//!   ...) owned by the task that sets them.
//! - **Command vectors**: the literal argument lists handed to the
//!   [`Executor`](exec::Executor), optionally wrapped in a `docker run`.
//!
//! # Example Usage
//!
//! ```no_run
//! use bob::{bob, Action, RawConfig};
//! use std::path::Path;
//!
//! let root = Path::new("/path/to/project");
//! let raw = RawConfig::load(root)?.with("config", "debug");
//!
//! bob(Action::Build, &raw, root)?;
//! # Ok::<(), bob::BobError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`options`]: resolution of the settings shared by every task
//! - [`tasks`]: the bootstrap, configure, build and install tasks
//! - [`pipeline`]: dependency resolution and the planning/execution passes
//! - [`fetch`]: toolchain download and extraction
//! - [`exec`]: sequential command execution

pub mod api;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod tasks;
pub mod util;

pub use api::{Action, BuildConfig, CommandVector};
pub use config::{ConfigError, RawConfig};
pub use environment::Environment;
pub use error::{BobError, EX_DATAERR, EX_OK, EX_SOFTWARE};
pub use exec::{CommandRunner, ExecutionError, Executor, ProcessRunner, RecordingRunner};
pub use options::{parse_options, BuildTarget, OptionsError, Settings};
pub use pipeline::{bob, resolve, Orchestrator, Plan, ResolveError};
pub use tasks::{Task, TaskError, TaskRegistry};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
