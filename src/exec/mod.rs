//! Sequential execution of command vectors
//!
//! The [`Executor`] owns the sequencing rules (strict order, stop at the
//! first failure, timing and progress events). Spawning the process is left
//! to a [`CommandRunner`], so tests can record the vectors instead.

use crate::api::CommandVector;
use crate::progress::{ProgressEvent, ProgressHandler};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Command `{command}` failed with {}", describe_code(.code))]
    CommandFailed {
        command: CommandVector,
        code: Option<i32>,
    },

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: CommandVector,
        #[source]
        source: io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Runs a single command to completion
pub trait CommandRunner: Send + Sync {
    /// Returns the exit code, or `None` when the process was killed by a signal
    fn run(&self, command: &CommandVector) -> io::Result<Option<i32>>;
}

/// Spawns real processes from the project root, inheriting stdio
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandVector) -> io::Result<Option<i32>> {
        let program = command
            .program()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let status = Command::new(program)
            .args(command.args())
            .current_dir(&self.working_dir)
            .status()?;

        Ok(status.code())
    }
}

/// Records commands instead of running them
///
/// Every command succeeds unless a failure was requested for its position.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<CommandVector>>,
    failure: Option<(usize, Option<i32>)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the command at `index` (zero-based, across the whole run) exit with `code`
    pub fn failing_at(index: usize, code: Option<i32>) -> Self {
        Self {
            commands: Mutex::default(),
            failure: Some((index, code)),
        }
    }

    pub fn commands(&self) -> Vec<CommandVector> {
        self.commands
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandVector) -> io::Result<Option<i32>> {
        let mut commands = self
            .commands
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "recording runner poisoned"))?;
        let index = commands.len();
        commands.push(command.clone());

        match self.failure {
            Some((at, code)) if at == index => Ok(code),
            _ => Ok(Some(0)),
        }
    }
}

/// Runs command vectors in order, stopping at the first failure
pub struct Executor<'a> {
    runner: &'a dyn CommandRunner,
    progress: &'a dyn ProgressHandler,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, progress: &'a dyn ProgressHandler) -> Self {
        Self { runner, progress }
    }

    pub fn run(&self, command: &CommandVector) -> Result<(), ExecutionError> {
        let rendered = command.to_string();
        self.progress.on_progress(&ProgressEvent::CommandStarted {
            command: rendered.clone(),
        });

        let start = Instant::now();
        let result = self.runner.run(command);
        let duration = start.elapsed();
        debug!("`{}` finished in {:?}", rendered, duration);

        let code = match result {
            Ok(code) => code,
            Err(source) => {
                self.progress.on_progress(&ProgressEvent::CommandComplete {
                    command: rendered,
                    duration,
                    success: false,
                });
                return Err(ExecutionError::Spawn {
                    command: command.clone(),
                    source,
                });
            }
        };

        let success = code == Some(0);
        self.progress.on_progress(&ProgressEvent::CommandComplete {
            command: rendered,
            duration,
            success,
        });

        if success {
            Ok(())
        } else {
            Err(ExecutionError::CommandFailed {
                command: command.clone(),
                code,
            })
        }
    }

    pub fn run_all(&self, commands: &[CommandVector]) -> Result<(), ExecutionError> {
        commands.iter().try_for_each(|command| self.run(command))
    }
}
