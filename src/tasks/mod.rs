//! Tasks
//!
//! Every [`Action`] is implemented by one task. Tasks never call each other:
//! the [`resolver`](crate::pipeline::resolver) orders them through
//! [`Task::depends_on`], and they communicate only through the shared
//! [`Settings`] and [`Environment`].

pub mod bootstrap;
pub mod build;
pub mod configure;
pub mod container;
pub mod install;
pub mod registry;

pub use bootstrap::BootstrapTask;
pub use build::BuildTask;
pub use configure::ConfigureTask;
pub use install::InstallTask;
pub use registry::{RegistryError, TaskRegistry};

use crate::api::{Action, CommandVector};
use crate::config::RawConfig;
use crate::environment::{Environment, MissingLocation};
use crate::fetch::FetchError;
use crate::options::Settings;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    MissingLocation(#[from] MissingLocation),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TaskError {
    /// Whether the error stems from invalid configuration
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_validation(),
            Self::MissingLocation(_) | Self::Io { .. } => false,
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// A build step bound to one [`Action`]
pub trait Task: Send + Sync {
    fn action(&self) -> Action;

    /// Actions that have to run before this one
    fn depends_on(&self) -> Vec<Action> {
        Vec::new()
    }

    /// Adds the locations this task owns
    fn extend_environment(&self, env: &mut Environment, settings: &Settings) {
        let _ = (env, settings);
    }

    /// Adds task-specific settings derived from the raw configuration
    ///
    /// This is where configuration is validated: it runs for every task in
    /// the sequence before any command is generated.
    fn refine_options(&self, raw: &RawConfig, settings: &mut Settings) -> Result<(), TaskError> {
        let _ = (raw, settings);
        Ok(())
    }

    /// Produces the commands to run, in order
    fn generate_commands(
        &self,
        settings: &Settings,
        env: &Environment,
    ) -> Result<Vec<CommandVector>, TaskError>;
}
