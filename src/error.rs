//! Top-level error type and exit-code mapping

use crate::api::Action;
use crate::config::ConfigError;
use crate::exec::ExecutionError;
use crate::options::OptionsError;
use crate::pipeline::ResolveError;
use crate::tasks::{RegistryError, TaskError};
use thiserror::Error;

/// Successful termination
pub const EX_OK: i32 = 0;
/// The input data was incorrect in some way (sysexits.h)
pub const EX_DATAERR: i32 = 65;
/// An internal software error has been detected (sysexits.h)
pub const EX_SOFTWARE: i32 = 70;

#[derive(Debug, Error)]
pub enum BobError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{action} task failed")]
    Task {
        action: Action,
        #[source]
        source: TaskError,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl BobError {
    pub(crate) fn task(action: Action) -> impl FnOnce(TaskError) -> Self {
        move |source| Self::Task { action, source }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Options(_) => EX_DATAERR,
            Self::Task { source, .. } if source.is_validation() => EX_DATAERR,
            Self::Resolve(ResolveError::Cycle { .. }) => EX_DATAERR,
            Self::Task { .. } | Self::Resolve(_) | Self::Registry(_) | Self::Execution(_) => {
                EX_SOFTWARE
            }
        }
    }

    /// The error followed by its causes, joined with `: `
    ///
    /// Causes already spelled out by an outer message are not repeated.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}
